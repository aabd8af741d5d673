//! The ride-event codec: generic events ↔ typed ride records.
//!
//! Decoding is an all-or-nothing gate. Every required tag must be present
//! with a non-empty first value, every numeric field must parse and sit in
//! range, and (for offers) the status must be one of the four enumerated
//! literals — otherwise the whole record is rejected. There are no partial
//! objects: a malformed event yields a [`CodecError`], and listing code
//! silently drops it.
//!
//! Encoding re-derives the tag list from typed fields. Drafts carry prices
//! in display units and are multiplied by 1000 into minor units here; a
//! full [`RideOffer`] (the republish path) already holds minor units and is
//! written verbatim.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDateTime};

use crate::error::CodecError;
use crate::rides::{
    RideOffer, RideOfferDraft, RideRequest, RideRequestDraft, RideStatus,
};
use crate::types::{
    Event, EventDraft, Tag, KIND_PROFILE, KIND_RIDE_OFFER,
    KIND_RIDE_REQUEST, TOPIC_RIDESHARE, TOPIC_TRANSPORT,
};

/// Display units → minor units (the network stores millisats).
const MINOR_UNITS_PER_DISPLAY: u64 = 1000;

// ---------------------------------------------------------------------------
// Field-level parsers
// ---------------------------------------------------------------------------

/// Requires a tag to exist with a non-empty first value.
fn require_tag<'e>(
    event: &'e Event,
    name: &'static str,
) -> Result<&'e str, CodecError> {
    match event.tag_value(name) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(CodecError::MissingTag(name)),
    }
}

/// Parses a coordinate tag: finite number within ±`max_abs`.
fn parse_coord(
    event: &Event,
    name: &'static str,
    max_abs: f64,
) -> Result<f64, CodecError> {
    let raw = require_tag(event, name)?;
    let value: f64 = raw
        .parse()
        .map_err(|_| CodecError::InvalidValue(name))?;
    if !value.is_finite() || value.abs() > max_abs {
        return Err(CodecError::InvalidValue(name));
    }
    Ok(value)
}

/// Parses a seat-count tag (≥ 1).
fn parse_seats(
    event: &Event,
    name: &'static str,
) -> Result<u32, CodecError> {
    let raw = require_tag(event, name)?;
    let seats: u32 = raw
        .parse()
        .map_err(|_| CodecError::InvalidValue(name))?;
    if seats < 1 {
        return Err(CodecError::InvalidValue(name));
    }
    Ok(seats)
}

/// Parses a minor-unit price tag (≥ 0; unsignedness enforces the floor).
fn parse_price(
    event: &Event,
    name: &'static str,
) -> Result<u64, CodecError> {
    let raw = require_tag(event, name)?;
    raw.parse().map_err(|_| CodecError::InvalidValue(name))
}

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

/// Decodes and validates a ride offer event.
///
/// # Errors
/// Any missing tag, out-of-range coordinate, unparseable number, or
/// non-enumerated status rejects the whole record.
pub fn decode_ride_offer(event: &Event) -> Result<RideOffer, CodecError> {
    if event.kind != KIND_RIDE_OFFER {
        return Err(CodecError::WrongKind {
            expected: KIND_RIDE_OFFER,
            got: event.kind,
        });
    }

    // Presence gate for the string-valued required tags the numeric
    // parsers below don't touch.
    for name in [
        "d",
        "title",
        "pickup_location",
        "destination_location",
        "departure_time",
    ] {
        require_tag(event, name)?;
    }

    let pickup_lat = parse_coord(event, "pickup_lat", 90.0)?;
    let pickup_lng = parse_coord(event, "pickup_lng", 180.0)?;
    let destination_lat = parse_coord(event, "destination_lat", 90.0)?;
    let destination_lng = parse_coord(event, "destination_lng", 180.0)?;
    let seats_available = parse_seats(event, "seats_available")?;
    let price = parse_price(event, "price")?;

    let status_raw = require_tag(event, "status")?;
    let status = RideStatus::parse(status_raw)
        .ok_or_else(|| CodecError::UnknownStatus(status_raw.to_string()))?;

    // Validation passed — construct. Absent tags resolve to empty string,
    // which at this point is unreachable for required fields.
    Ok(RideOffer {
        id: event.tag_value_or_empty("d").to_string(),
        pubkey: event.pubkey.clone(),
        title: event.tag_value_or_empty("title").to_string(),
        pickup_location: event
            .tag_value_or_empty("pickup_location")
            .to_string(),
        pickup_lat,
        pickup_lng,
        destination_location: event
            .tag_value_or_empty("destination_location")
            .to_string(),
        destination_lat,
        destination_lng,
        departure_time: event
            .tag_value_or_empty("departure_time")
            .to_string(),
        seats_available,
        price,
        status,
        content: event.content.clone(),
        created_at: event.created_at,
    })
}

/// Decodes and validates a ride request event.
///
/// # Errors
/// Same all-or-nothing gate as [`decode_ride_offer`], minus title/status
/// (requests carry neither).
pub fn decode_ride_request(
    event: &Event,
) -> Result<RideRequest, CodecError> {
    if event.kind != KIND_RIDE_REQUEST {
        return Err(CodecError::WrongKind {
            expected: KIND_RIDE_REQUEST,
            got: event.kind,
        });
    }

    for name in ["pickup_location", "destination_location", "departure_time"]
    {
        require_tag(event, name)?;
    }

    let pickup_lat = parse_coord(event, "pickup_lat", 90.0)?;
    let pickup_lng = parse_coord(event, "pickup_lng", 180.0)?;
    let destination_lat = parse_coord(event, "destination_lat", 90.0)?;
    let destination_lng = parse_coord(event, "destination_lng", 180.0)?;
    let seats_needed = parse_seats(event, "seats_needed")?;
    let max_price = parse_price(event, "max_price")?;

    Ok(RideRequest {
        id: event.id.clone(),
        pubkey: event.pubkey.clone(),
        pickup_location: event
            .tag_value_or_empty("pickup_location")
            .to_string(),
        pickup_lat,
        pickup_lng,
        destination_location: event
            .tag_value_or_empty("destination_location")
            .to_string(),
        destination_lat,
        destination_lng,
        departure_time: event
            .tag_value_or_empty("departure_time")
            .to_string(),
        seats_needed,
        max_price,
        content: event.content.clone(),
        created_at: event.created_at,
    })
}

// ---------------------------------------------------------------------------
// Encode
// ---------------------------------------------------------------------------

/// Encodes a full ride offer for (re)publication under its slot id.
///
/// Always emits the `d` tag — republishing under the same id supersedes the
/// prior record on the network. Numeric fields are written verbatim (the
/// record already holds minor units).
pub fn encode_ride_offer(offer: &RideOffer) -> EventDraft {
    let alt = match offer.status {
        RideStatus::Cancelled => {
            format!("Cancelled ride offer: {}", offer.title)
        }
        _ => format!("Ride offer: {}", offer.title),
    };

    EventDraft {
        kind: KIND_RIDE_OFFER,
        content: offer.content.clone(),
        tags: vec![
            Tag::pair("d", &offer.id),
            Tag::pair("title", &offer.title),
            Tag::pair("pickup_location", &offer.pickup_location),
            Tag::pair("pickup_lat", offer.pickup_lat.to_string()),
            Tag::pair("pickup_lng", offer.pickup_lng.to_string()),
            Tag::pair(
                "destination_location",
                &offer.destination_location,
            ),
            Tag::pair(
                "destination_lat",
                offer.destination_lat.to_string(),
            ),
            Tag::pair(
                "destination_lng",
                offer.destination_lng.to_string(),
            ),
            Tag::pair("departure_time", &offer.departure_time),
            Tag::pair(
                "seats_available",
                offer.seats_available.to_string(),
            ),
            Tag::pair("price", offer.price.to_string()),
            Tag::pair("status", offer.status.as_str()),
            Tag::pair("t", TOPIC_RIDESHARE),
            Tag::pair("t", TOPIC_TRANSPORT),
            Tag::pair("alt", alt),
        ],
    }
}

/// Encodes a brand-new offer from form input under the given slot id.
///
/// The draft's display-unit price is converted to minor units, and the
/// status is forced to `active`.
pub fn encode_ride_offer_draft(
    id: &str,
    draft: &RideOfferDraft,
) -> EventDraft {
    EventDraft {
        kind: KIND_RIDE_OFFER,
        content: draft.description.clone(),
        tags: vec![
            Tag::pair("d", id),
            Tag::pair("title", &draft.title),
            Tag::pair("pickup_location", &draft.pickup_location),
            Tag::pair("pickup_lat", draft.pickup_lat.to_string()),
            Tag::pair("pickup_lng", draft.pickup_lng.to_string()),
            Tag::pair(
                "destination_location",
                &draft.destination_location,
            ),
            Tag::pair(
                "destination_lat",
                draft.destination_lat.to_string(),
            ),
            Tag::pair(
                "destination_lng",
                draft.destination_lng.to_string(),
            ),
            Tag::pair("departure_time", &draft.departure_time),
            Tag::pair(
                "seats_available",
                draft.seats_available.to_string(),
            ),
            Tag::pair(
                "price",
                (draft.price * MINOR_UNITS_PER_DISPLAY).to_string(),
            ),
            Tag::pair("status", RideStatus::Active.as_str()),
            Tag::pair("t", TOPIC_RIDESHARE),
            Tag::pair("t", TOPIC_TRANSPORT),
            Tag::pair("alt", format!("Ride offer: {}", draft.title)),
        ],
    }
}

/// Encodes a brand-new ride request from form input.
///
/// Requests are not replaceable, so no id tag is ever emitted — identity is
/// assigned by the network on publication. The draft's display-unit max
/// price is converted to minor units.
pub fn encode_ride_request_draft(draft: &RideRequestDraft) -> EventDraft {
    EventDraft {
        kind: KIND_RIDE_REQUEST,
        content: draft.description.clone(),
        tags: vec![
            Tag::pair("pickup_location", &draft.pickup_location),
            Tag::pair("pickup_lat", draft.pickup_lat.to_string()),
            Tag::pair("pickup_lng", draft.pickup_lng.to_string()),
            Tag::pair(
                "destination_location",
                &draft.destination_location,
            ),
            Tag::pair(
                "destination_lat",
                draft.destination_lat.to_string(),
            ),
            Tag::pair(
                "destination_lng",
                draft.destination_lng.to_string(),
            ),
            Tag::pair("departure_time", &draft.departure_time),
            Tag::pair("seats_needed", draft.seats_needed.to_string()),
            Tag::pair(
                "max_price",
                (draft.max_price * MINOR_UNITS_PER_DISPLAY).to_string(),
            ),
            Tag::pair("t", TOPIC_RIDESHARE),
            Tag::pair("t", TOPIC_TRANSPORT),
            Tag::pair(
                "alt",
                format!(
                    "Ride request from {} to {}",
                    draft.pickup_location, draft.destination_location
                ),
            ),
        ],
    }
}

/// Encodes a whole-record profile replace carrying the user's payment
/// address under the `lud16` field.
pub fn encode_profile_update(payment_address: &str) -> EventDraft {
    let content =
        serde_json::json!({ "lud16": payment_address }).to_string();
    EventDraft {
        kind: KIND_PROFILE,
        content,
        tags: Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Listing helpers
// ---------------------------------------------------------------------------

/// Sort key for a departure-time string.
///
/// The string is opaque at the data-model level, but listings order by the
/// parsed instant. RFC3339 and the HTML `datetime-local` shapes are
/// recognized; anything else falls back to lexical order after all
/// parseable entries, keeping the sort total and deterministic.
fn departure_instant(s: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc().timestamp());
        }
    }
    None
}

fn compare_departures(a: &str, b: &str) -> Ordering {
    match (departure_instant(a), departure_instant(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Sorts offers ascending by departure time.
pub fn sort_offers_by_departure(offers: &mut [RideOffer]) {
    offers.sort_by(|a, b| {
        compare_departures(&a.departure_time, &b.departure_time)
    });
}

/// Sorts requests ascending by departure time.
pub fn sort_requests_by_departure(requests: &mut [RideRequest]) {
    requests.sort_by(|a, b| {
        compare_departures(&a.departure_time, &b.departure_time)
    });
}

/// Keeps only offers whose status is `active`.
pub fn active_offers(offers: Vec<RideOffer>) -> Vec<RideOffer> {
    offers
        .into_iter()
        .filter(|o| o.status == RideStatus::Active)
        .collect()
}

/// Decodes a mixed event list into offers, silently dropping rejects.
pub fn decode_offer_listing(events: &[Event]) -> Vec<RideOffer> {
    let mut offers: Vec<RideOffer> = events
        .iter()
        .filter_map(|e| decode_ride_offer(e).ok())
        .collect();
    sort_offers_by_departure(&mut offers);
    offers
}

/// Decodes a mixed event list into requests, silently dropping rejects.
pub fn decode_request_listing(events: &[Event]) -> Vec<RideRequest> {
    let mut requests: Vec<RideRequest> = events
        .iter()
        .filter_map(|e| decode_ride_request(e).ok())
        .collect();
    sort_requests_by_departure(&mut requests);
    requests
}

// =========================================================================
// Tests
// =========================================================================
