//! Notification text builders and the best-effort fan-out helper.
//!
//! Notifications are courtesy messages: their failure never rolls back a
//! published event, and one undeliverable recipient never blocks the rest.

use ridemesh_protocol::{EventId, PubKey, Ride, RideOffer, RideRequest};
use ridemesh_relay::{with_timeout, Messenger, RelayError, PUBLISH_TIMEOUT};

/// Minor units per display unit, for price lines in message bodies.
const MINOR_UNITS: u64 = 1000;

// ---------------------------------------------------------------------------
// Message bodies
// ---------------------------------------------------------------------------

/// Joins the non-empty lines of a message body.
fn join_lines(lines: &[String]) -> String {
    lines
        .iter()
        .filter(|l| !l.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

/// Body of the booking notification sent to a driver whose offer was
/// accepted.
pub(crate) fn offer_acceptance_notice(
    offer: &RideOffer,
    seats_requested: u32,
    message: Option<&str>,
    contact: Option<&str>,
) -> String {
    join_lines(&[
        "Ride booking received".to_string(),
        format!("Ride: {}", offer.title),
        format!(
            "Route: {} → {}",
            offer.pickup_location, offer.destination_location
        ),
        format!("Departure: {}", offer.departure_time),
        format!("Seats requested: {seats_requested}"),
        format!(
            "Price: {} sats per seat",
            offer.price / MINOR_UNITS
        ),
        message.map(|m| format!("Message: {m}")).unwrap_or_default(),
        contact.map(|c| format!("Contact: {c}")).unwrap_or_default(),
        "Please confirm this booking and share pickup details.".to_string(),
    ])
}

/// Body of the notification sent to a rider whose request was accepted.
pub(crate) fn request_acceptance_notice(
    request: &RideRequest,
    message: Option<&str>,
    contact: Option<&str>,
) -> String {
    join_lines(&[
        "Ride available".to_string(),
        format!(
            "Route: {} → {}",
            request.pickup_location, request.destination_location
        ),
        format!("Departure: {}", request.departure_time),
        format!("Seats needed: {}", request.seats_needed),
        format!(
            "Your max price: {} sats per seat",
            request.max_price / MINOR_UNITS
        ),
        message.map(|m| format!("Message: {m}")).unwrap_or_default(),
        contact.map(|c| format!("Contact: {c}")).unwrap_or_default(),
        "I can provide this ride. Please confirm if you're still interested."
            .to_string(),
    ])
}

/// Body of the cancellation notification fanned out to interested users.
pub(crate) fn cancellation_notice(
    ride: &Ride,
    reason: Option<&str>,
) -> String {
    let description = match ride {
        Ride::Offer(o) => format!("{} ({})", o.title, ride.route()),
        Ride::Request(_) => ride.route(),
    };
    let base = format!(
        "The {} \"{description}\" has been cancelled.",
        ride_family(ride)
    );
    match reason {
        Some(r) => format!("{base}\n\nReason: {r}"),
        None => base,
    }
}

/// "ride offer" or "ride request", for subjects and bodies.
pub(crate) fn ride_family(ride: &Ride) -> &'static str {
    match ride {
        Ride::Offer(_) => "ride offer",
        Ride::Request(_) => "ride request",
    }
}

// ---------------------------------------------------------------------------
// Fan-out
// ---------------------------------------------------------------------------

/// The result of one notification attempt in a fan-out.
#[derive(Debug)]
pub struct NotifyOutcome {
    /// Who was being notified.
    pub recipient: PubKey,
    /// Whether delivery succeeded.
    pub result: Result<EventId, RelayError>,
}

impl NotifyOutcome {
    /// Returns `true` if this recipient was notified.
    pub fn delivered(&self) -> bool {
        self.result.is_ok()
    }
}

/// Sends one private message per recipient, independently.
///
/// Failures are warn-logged and collected; one failing recipient never
/// aborts notification of the remainder. No batching, no retry.
pub async fn fan_out<M: Messenger>(
    messenger: &M,
    recipients: &[PubKey],
    content: &str,
    subject: Option<&str>,
) -> Vec<NotifyOutcome> {
    let mut outcomes = Vec::with_capacity(recipients.len());
    for recipient in recipients {
        let result = with_timeout(
            PUBLISH_TIMEOUT,
            messenger.send_private(recipient, content, subject),
        )
        .await;
        if let Err(err) = &result {
            tracing::warn!(%recipient, %err, "notification failed, skipping");
        }
        outcomes.push(NotifyOutcome {
            recipient: recipient.clone(),
            result,
        });
    }
    outcomes
}

// =========================================================================
// Tests
// =========================================================================
