//! Typed ride records: the domain view of ride events.
//!
//! These are what the rest of the application works with. They only come
//! into existence through the codec's validation gate — a `RideOffer` in
//! hand is always a complete, range-checked record.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{EventId, PubKey};

// ---------------------------------------------------------------------------
// RideStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a ride offer.
///
/// Offers are never deleted in place — they are superseded under the same
/// slot id, or marked `Cancelled`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum RideStatus {
    /// Accepting riders.
    #[default]
    Active,
    /// All seats taken.
    Full,
    /// The ride happened.
    Completed,
    /// Withdrawn by the driver.
    Cancelled,
}

impl RideStatus {
    /// Parses one of the four enumerated literals.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "full" => Some(Self::Full),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// The wire literal for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Full => "full",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RideOffer
// ---------------------------------------------------------------------------

/// A driver's published ride offer.
///
/// Identity is the author-chosen `id` — an (author, kind, id) replaceable
/// slot on the network, so republishing under the same id supersedes the
/// prior record. Prices are integer minor units (millisats).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideOffer {
    /// Author-chosen slot id (the `d` tag value).
    pub id: String,
    /// The driver.
    pub pubkey: PubKey,
    /// Short human-readable title.
    pub title: String,
    /// Pickup point, as entered by the driver.
    pub pickup_location: String,
    /// Pickup latitude, within [-90, 90].
    pub pickup_lat: f64,
    /// Pickup longitude, within [-180, 180].
    pub pickup_lng: f64,
    /// Destination, as entered by the driver.
    pub destination_location: String,
    /// Destination latitude, within [-90, 90].
    pub destination_lat: f64,
    /// Destination longitude, within [-180, 180].
    pub destination_lng: f64,
    /// Opaque date-time string. Presence-checked only; parsed solely for
    /// listing order.
    pub departure_time: String,
    /// Seats still available, at least 1.
    pub seats_available: u32,
    /// Price per seat in minor units.
    pub price: u64,
    /// Lifecycle status.
    pub status: RideStatus,
    /// Free-text description.
    pub content: String,
    /// Unix timestamp (seconds) the event was created.
    pub created_at: u64,
}

// ---------------------------------------------------------------------------
// RideRequest
// ---------------------------------------------------------------------------

/// A rider's published ride request.
///
/// Created once and immutable; "cancellation" is a separate deletion-intent
/// event referencing [`RideRequest::id`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideRequest {
    /// Protocol-assigned event id (not author-chosen).
    pub id: EventId,
    /// The rider.
    pub pubkey: PubKey,
    /// Pickup point.
    pub pickup_location: String,
    /// Pickup latitude, within [-90, 90].
    pub pickup_lat: f64,
    /// Pickup longitude, within [-180, 180].
    pub pickup_lng: f64,
    /// Destination.
    pub destination_location: String,
    /// Destination latitude, within [-90, 90].
    pub destination_lat: f64,
    /// Destination longitude, within [-180, 180].
    pub destination_lng: f64,
    /// Opaque date-time string.
    pub departure_time: String,
    /// Seats needed, at least 1.
    pub seats_needed: u32,
    /// Maximum acceptable price per seat in minor units.
    pub max_price: u64,
    /// Free-text description.
    pub content: String,
    /// Unix timestamp (seconds) the event was created.
    pub created_at: u64,
}

// ---------------------------------------------------------------------------
// Ride
// ---------------------------------------------------------------------------

/// Either ride family, matched exhaustively wherever behavior differs
/// (cancellation, acceptance, display).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Ride {
    /// A driver's offer.
    Offer(RideOffer),
    /// A rider's request.
    Request(RideRequest),
}

impl Ride {
    /// The author of the ride.
    pub fn pubkey(&self) -> &PubKey {
        match self {
            Self::Offer(o) => &o.pubkey,
            Self::Request(r) => &r.pubkey,
        }
    }

    /// One-line route summary used in notifications.
    pub fn route(&self) -> String {
        match self {
            Self::Offer(o) => format!(
                "{} → {}",
                o.pickup_location, o.destination_location
            ),
            Self::Request(r) => format!(
                "{} → {}",
                r.pickup_location, r.destination_location
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Drafts
// ---------------------------------------------------------------------------

/// Form input for a new ride offer. `price` is in display units and is
/// converted to minor units (×1000) at encode time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideOfferDraft {
    pub title: String,
    pub pickup_location: String,
    pub pickup_lat: f64,
    pub pickup_lng: f64,
    pub destination_location: String,
    pub destination_lat: f64,
    pub destination_lng: f64,
    pub departure_time: String,
    pub seats_available: u32,
    /// Price per seat in display units (sats).
    pub price: u64,
    pub description: String,
}

/// Form input for a new ride request. `max_price` is in display units and
/// is converted to minor units (×1000) at encode time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideRequestDraft {
    pub pickup_location: String,
    pub pickup_lat: f64,
    pub pickup_lng: f64,
    pub destination_location: String,
    pub destination_lat: f64,
    pub destination_lng: f64,
    pub departure_time: String,
    pub seats_needed: u32,
    /// Maximum price per seat in display units (sats).
    pub max_price: u64,
    pub description: String,
}

// =========================================================================
// Tests
// =========================================================================
