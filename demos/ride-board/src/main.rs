//! End-to-end walkthrough of the Ridemesh booking workflow.
//!
//! Two actors share one in-memory relay: a driver publishes an offer, a
//! rider publishes a request, each accepts the other's ride, and the
//! driver finally cancels. Run with `RUST_LOG=debug` to watch the
//! structured log of every event and courtesy message.

use ridemesh::prelude::*;

fn offer_draft() -> RideOfferDraft {
    RideOfferDraft {
        title: "Berlin to Hamburg".to_string(),
        pickup_location: "Berlin Hbf".to_string(),
        pickup_lat: 52.525,
        pickup_lng: 13.369,
        destination_location: "Hamburg Hbf".to_string(),
        destination_lat: 53.553,
        destination_lng: 10.006,
        departure_time: "2026-09-01T08:00:00Z".to_string(),
        seats_available: 3,
        price: 5000,
        description: "Direct trip, one coffee stop halfway.".to_string(),
    }
}

fn request_draft() -> RideRequestDraft {
    RideRequestDraft {
        pickup_location: "Leipzig".to_string(),
        pickup_lat: 51.340,
        pickup_lng: 12.374,
        destination_location: "Dresden".to_string(),
        destination_lat: 51.050,
        destination_lng: 13.737,
        departure_time: "2026-09-02T17:30:00Z".to_string(),
        seats_needed: 1,
        max_price: 2000,
        description: "Flexible on the exact departure time.".to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<(), RidemeshError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let driver = PubKey::from("driver-pk");
    let rider = PubKey::from("rider-pk");

    // One shared store, two signing identities.
    let relay = MemoryRelay::new(driver.clone());
    let messenger = MemoryMessenger::new();

    let mut driver_board =
        RideBoard::new(relay.clone(), messenger.clone());
    driver_board.sign_in(driver.clone());

    let mut rider_board = RideBoard::new(
        relay.as_author(rider.clone()),
        messenger.clone(),
    );
    rider_board.sign_in(rider.clone());

    // The driver offers a ride; the rider asks for one.
    let offer = driver_board.create_offer(&offer_draft()).await?;
    println!(
        "driver published offer {}: {} ({} seats, {} sats/seat)",
        offer.id,
        offer.title,
        offer.seats_available,
        offer.price / 1000
    );

    let request = rider_board.create_request(&request_draft()).await?;
    println!(
        "rider published request {}: {} to {}",
        request.id, request.pickup_location, request.destination_location
    );

    // Both listings are now visible to everyone.
    let offers = rider_board.list_active_offers().await?;
    let requests = driver_board.list_requests().await?;
    println!(
        "board shows {} active offer(s), {} request(s)",
        offers.len(),
        requests.len()
    );

    // The rider books a seat on the driver's offer.
    let booking = rider_board
        .accept_offer(&offer, 1, Some("Picking up near the station?"), None)
        .await?;
    println!(
        "rider accepted offer via event {} (notification delivered: {})",
        booking.acceptance.id,
        booking.notification.is_ok()
    );

    // The driver agrees to serve the rider's request too.
    let agreement = driver_board
        .accept_request(&request, None, Some("+49 151 0000"))
        .await?;
    println!(
        "driver accepted request via event {}",
        agreement.acceptance.id
    );

    // Plans change: the driver cancels the offer and tells the rider.
    let cancellation = driver_board
        .cancel_ride(
            &Ride::Offer(offer),
            Some("car trouble"),
            &[rider.clone()],
        )
        .await?;
    let delivered = cancellation
        .notifications
        .iter()
        .filter(|n| n.delivered())
        .count();
    println!(
        "driver cancelled the offer ({} of {} notifications delivered)",
        delivered,
        cancellation.notifications.len()
    );

    let still_active = rider_board.list_active_offers().await?;
    println!(
        "board now shows {} active offer(s)",
        still_active.len()
    );

    let sent = messenger.sent().await;
    println!("{} private message(s) were delivered in total:", sent.len());
    for message in &sent {
        println!(
            "  to {}: {}",
            message.recipient,
            message.subject.as_deref().unwrap_or("(no subject)")
        );
    }

    Ok(())
}
