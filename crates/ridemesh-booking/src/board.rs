//! The ride board: the workflow service behind every user action.
//!
//! A [`RideBoard`] wraps the two external seams (relay, messenger) and an
//! optional signed-in actor. All ownership and state preconditions are
//! checked synchronously before any network effect, so a rejected
//! operation has published nothing.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::distr::Alphanumeric;
use rand::Rng;
use ridemesh_protocol::{
    decode_offer_listing, decode_request_listing, decode_ride_offer,
    decode_ride_request, encode_ride_offer, encode_ride_offer_draft,
    encode_ride_request_draft, Event, EventDraft, EventId, Filter, PubKey,
    Ride, RideOffer, RideOfferDraft, RideRequest, RideRequestDraft,
    RideStatus, Tag, KIND_DELETION, KIND_DM_RELAY_LIST,
    KIND_OFFER_ACCEPTANCE, KIND_REQUEST_ACCEPTANCE, KIND_RIDE_OFFER,
    KIND_RIDE_REQUEST, TOPIC_RIDESHARE,
};
use ridemesh_relay::{
    with_timeout, Messenger, RelayClient, RelayError, PUBLISH_TIMEOUT,
    QUERY_TIMEOUT,
};

use crate::error::BookingError;
use crate::notify::{
    self, cancellation_notice, fan_out, offer_acceptance_notice,
    request_acceptance_notice, NotifyOutcome,
};

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// What an acceptance produced.
///
/// The acceptance event is the durable source of truth; the notification
/// is best-effort courtesy. A failed notification never rolls the event
/// back, so its outcome is carried here for the caller to inspect instead
/// of being hidden in a log line.
#[derive(Debug)]
pub struct AcceptOutcome {
    /// The published acceptance event.
    pub acceptance: Event,
    /// Whether the counterparty notification was delivered.
    pub notification: Result<EventId, RelayError>,
}

/// What a cancellation produced.
#[derive(Debug)]
pub struct CancelOutcome {
    /// The republished offer, or the deletion-intent event for a request.
    pub event: Event,
    /// One delivery outcome per requested recipient, in order.
    pub notifications: Vec<NotifyOutcome>,
}

// ---------------------------------------------------------------------------
// RideBoard
// ---------------------------------------------------------------------------

/// The booking workflow service.
pub struct RideBoard<R: RelayClient, M: Messenger> {
    relay: R,
    messenger: M,
    actor: Option<PubKey>,
}

impl<R: RelayClient, M: Messenger> RideBoard<R, M> {
    /// Creates a board with no signed-in actor.
    pub fn new(relay: R, messenger: M) -> Self {
        Self {
            relay,
            messenger,
            actor: None,
        }
    }

    /// Signs the given actor in. Replaces any previous actor.
    pub fn sign_in(&mut self, actor: PubKey) {
        tracing::info!(%actor, "actor signed in");
        self.actor = Some(actor);
    }

    /// Signs the actor out.
    pub fn sign_out(&mut self) {
        self.actor = None;
    }

    /// The signed-in actor, or `SignedOutActor`.
    fn actor(&self) -> Result<&PubKey, BookingError> {
        self.actor.as_ref().ok_or(BookingError::SignedOutActor)
    }

    // -- Publishing ---------------------------------------------------------

    /// Publishes a new ride offer under a freshly generated slot id.
    pub async fn create_offer(
        &self,
        draft: &RideOfferDraft,
    ) -> Result<RideOffer, BookingError> {
        self.actor()?;
        let id = new_offer_id();
        let event = self
            .publish(encode_ride_offer_draft(&id, draft))
            .await?;
        tracing::info!(slot = %id, event = %event.id, "ride offer published");
        Ok(decode_ride_offer(&event)?)
    }

    /// Publishes a new ride request. Identity is assigned by the network.
    pub async fn create_request(
        &self,
        draft: &RideRequestDraft,
    ) -> Result<RideRequest, BookingError> {
        self.actor()?;
        let event =
            self.publish(encode_ride_request_draft(draft)).await?;
        tracing::info!(event = %event.id, "ride request published");
        Ok(decode_ride_request(&event)?)
    }

    // -- Listing ------------------------------------------------------------

    /// All decodable ride offers on the network, ascending by departure
    /// time. Malformed records are silently dropped.
    pub async fn list_offers(
        &self,
    ) -> Result<Vec<RideOffer>, BookingError> {
        let events = self
            .query(Filter::rideshare_listing(KIND_RIDE_OFFER))
            .await?;
        Ok(decode_offer_listing(&events))
    }

    /// Offers with status `active` only.
    pub async fn list_active_offers(
        &self,
    ) -> Result<Vec<RideOffer>, BookingError> {
        Ok(ridemesh_protocol::active_offers(self.list_offers().await?))
    }

    /// All decodable ride requests, ascending by departure time.
    pub async fn list_requests(
        &self,
    ) -> Result<Vec<RideRequest>, BookingError> {
        let events = self
            .query(Filter::rideshare_listing(KIND_RIDE_REQUEST))
            .await?;
        Ok(decode_request_listing(&events))
    }

    // -- Acceptance ---------------------------------------------------------

    /// Accepts a ride offer (the rider's side of the exchange).
    ///
    /// # Errors
    /// `InvalidOperation` if the actor authored the offer, asked for more
    /// seats than are available, or the offer is no longer active — all
    /// checked before anything is published.
    pub async fn accept_offer(
        &self,
        offer: &RideOffer,
        seats_requested: u32,
        message: Option<&str>,
        contact: Option<&str>,
    ) -> Result<AcceptOutcome, BookingError> {
        let actor = self.actor()?;
        if *actor == offer.pubkey {
            return Err(BookingError::invalid(
                "you cannot accept your own ride offer",
            ));
        }
        if seats_requested > offer.seats_available {
            return Err(BookingError::invalid(
                "not enough seats available",
            ));
        }
        if offer.status != RideStatus::Active {
            return Err(BookingError::invalid(
                "this ride offer is no longer active",
            ));
        }

        let mut tags = vec![
            Tag::pair("e", &offer.id),
            Tag::pair("p", offer.pubkey.as_str()),
            Tag::pair("k", KIND_RIDE_OFFER.to_string()),
            Tag::pair("seats_requested", seats_requested.to_string()),
            Tag::pair("t", TOPIC_RIDESHARE),
            Tag::pair("t", "acceptance"),
            Tag::pair(
                "alt",
                format!("Ride acceptance for {}", offer.title),
            ),
        ];
        if let Some(contact) = contact {
            tags.push(Tag::pair("contact", contact));
        }
        let content = message.map(str::to_string).unwrap_or_else(|| {
            format!(
                "I would like to accept your ride offer: {}",
                offer.title
            )
        });

        let acceptance = self
            .publish(EventDraft {
                kind: KIND_OFFER_ACCEPTANCE,
                content,
                tags,
            })
            .await?;
        tracing::info!(
            offer = %offer.id,
            event = %acceptance.id,
            seats = seats_requested,
            "offer acceptance published"
        );

        // Best-effort courtesy: the acceptance above is already durable.
        let body = offer_acceptance_notice(
            offer,
            seats_requested,
            message,
            contact,
        );
        let subject = format!("Ride Booking - {}", offer.title);
        let notification = self
            .notify(&offer.pubkey, &body, Some(&subject))
            .await;

        Ok(AcceptOutcome {
            acceptance,
            notification,
        })
    }

    /// Accepts a ride request (the driver's side of the exchange).
    ///
    /// # Errors
    /// `InvalidOperation` if the actor authored the request.
    pub async fn accept_request(
        &self,
        request: &RideRequest,
        message: Option<&str>,
        contact: Option<&str>,
    ) -> Result<AcceptOutcome, BookingError> {
        let actor = self.actor()?;
        if *actor == request.pubkey {
            return Err(BookingError::invalid(
                "you cannot accept your own ride request",
            ));
        }

        let mut tags = vec![
            Tag::pair("e", request.id.as_str()),
            Tag::pair("p", request.pubkey.as_str()),
            Tag::pair("k", KIND_RIDE_REQUEST.to_string()),
            Tag::pair("t", TOPIC_RIDESHARE),
            Tag::pair("t", "acceptance"),
            Tag::pair("alt", "Ride request acceptance"),
        ];
        if let Some(contact) = contact {
            tags.push(Tag::pair("contact", contact));
        }
        let content = message
            .map(str::to_string)
            .unwrap_or_else(|| {
                "I can provide the ride you requested.".to_string()
            });

        let acceptance = self
            .publish(EventDraft {
                kind: KIND_REQUEST_ACCEPTANCE,
                content,
                tags,
            })
            .await?;
        tracing::info!(
            request = %request.id,
            event = %acceptance.id,
            "request acceptance published"
        );

        let body = request_acceptance_notice(request, message, contact);
        let subject = format!(
            "Ride Available - {} to {}",
            request.pickup_location, request.destination_location
        );
        let notification = self
            .notify(&request.pubkey, &body, Some(&subject))
            .await;

        Ok(AcceptOutcome {
            acceptance,
            notification,
        })
    }

    // -- Cancellation ---------------------------------------------------------

    /// Cancels a ride the actor owns, then fans out best-effort
    /// notifications to `notify_users`.
    ///
    /// Offers are republished under the same slot id with status forced to
    /// cancelled — the only supported mutation path. Requests get a
    /// standalone deletion-intent event; the original record is untouched.
    ///
    /// # Errors
    /// `InvalidOperation` if the actor does not own the ride (nothing is
    /// published in that case).
    pub async fn cancel_ride(
        &self,
        ride: &Ride,
        reason: Option<&str>,
        notify_users: &[PubKey],
    ) -> Result<CancelOutcome, BookingError> {
        let actor = self.actor()?;
        if actor != ride.pubkey() {
            return Err(BookingError::invalid(
                "you can only cancel your own rides",
            ));
        }

        let event = match ride {
            Ride::Offer(offer) => {
                let mut cancelled = offer.clone();
                cancelled.status = RideStatus::Cancelled;
                cancelled.content = match reason {
                    Some(r) => {
                        format!("CANCELLED: {r}\n\n{}", offer.content)
                    }
                    None => format!("CANCELLED\n\n{}", offer.content),
                };
                let mut draft = encode_ride_offer(&cancelled);
                if let Some(r) = reason {
                    draft.tags.push(Tag::pair("cancellation_reason", r));
                }
                let event = self.publish(draft).await?;
                tracing::info!(
                    slot = %offer.id,
                    event = %event.id,
                    "offer republished as cancelled"
                );
                event
            }
            Ride::Request(request) => {
                let mut tags = vec![
                    Tag::pair("e", request.id.as_str()),
                    Tag::pair("k", KIND_RIDE_REQUEST.to_string()),
                    Tag::pair("t", TOPIC_RIDESHARE),
                    Tag::pair("t", "cancellation"),
                    Tag::pair("alt", "Ride request cancellation"),
                ];
                if let Some(r) = reason {
                    tags.push(Tag::pair("reason", r));
                }
                let event = self
                    .publish(EventDraft {
                        kind: KIND_DELETION,
                        content: reason
                            .unwrap_or("Ride request cancelled")
                            .to_string(),
                        tags,
                    })
                    .await?;
                tracing::info!(
                    request = %request.id,
                    event = %event.id,
                    "request deletion intent published"
                );
                event
            }
        };

        let body = cancellation_notice(ride, reason);
        let subject =
            format!("Ride Cancellation - {}", notify::ride_family(ride));
        let notifications =
            fan_out(&self.messenger, notify_users, &body, Some(&subject))
                .await;

        Ok(CancelOutcome {
            event,
            notifications,
        })
    }

    // -- Private-message relay preferences ------------------------------------

    /// Publishes the actor's preferred relays for receiving private
    /// messages.
    pub async fn publish_dm_relays(
        &self,
        relays: &[String],
    ) -> Result<Event, BookingError> {
        self.actor()?;
        let tags = relays
            .iter()
            .map(|r| Tag::pair("relay", r))
            .collect();
        Ok(self
            .publish(EventDraft {
                kind: KIND_DM_RELAY_LIST,
                content: String::new(),
                tags,
            })
            .await?)
    }

    /// The actor's published private-message relay list, latest record.
    pub async fn dm_relays(&self) -> Result<Vec<String>, BookingError> {
        let actor = self.actor()?;
        let events = self
            .query(Filter {
                kinds: vec![KIND_DM_RELAY_LIST],
                authors: vec![actor.clone()],
                limit: Some(1),
                ..Filter::default()
            })
            .await?;

        Ok(events
            .first()
            .map(|event| {
                event
                    .tags
                    .iter()
                    .filter(|t| t.name() == Some("relay"))
                    .filter_map(|t| t.value().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default())
    }

    // -- Seam wrappers --------------------------------------------------------

    async fn publish(
        &self,
        draft: EventDraft,
    ) -> Result<Event, RelayError> {
        with_timeout(PUBLISH_TIMEOUT, self.relay.publish(draft)).await
    }

    async fn query(
        &self,
        filter: Filter,
    ) -> Result<Vec<Event>, RelayError> {
        with_timeout(QUERY_TIMEOUT, self.relay.query(filter)).await
    }

    async fn notify(
        &self,
        recipient: &PubKey,
        body: &str,
        subject: Option<&str>,
    ) -> Result<EventId, RelayError> {
        let result = with_timeout(
            PUBLISH_TIMEOUT,
            self.messenger.send_private(recipient, body, subject),
        )
        .await;
        if let Err(err) = &result {
            tracing::warn!(%recipient, %err, "courtesy notification failed");
        }
        result
    }
}

/// Generates an author-chosen offer slot id: `ride-{millis}-{9 alnum}`.
fn new_offer_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(char::from)
        .collect::<String>()
        .to_lowercase();
    format!("ride-{millis}-{suffix}")
}

// =========================================================================
// Tests
// =========================================================================
