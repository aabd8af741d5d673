//! Event model and ride codec for Ridemesh.
//!
//! This crate defines the "language" spoken on the event network:
//!
//! - **Types** ([`Event`], [`Tag`], [`EventDraft`], [`Filter`], the kind
//!   constants) — the generic records that travel over the relay network.
//! - **Ride records** ([`RideOffer`], [`RideRequest`], [`Ride`]) — the
//!   strongly-typed domain view of those records.
//! - **Codec** ([`decode_ride_offer`], [`encode_ride_offer`], etc.) — the
//!   bidirectional mapping between the two, with all-or-nothing validation.
//! - **Errors** ([`CodecError`]) — what can go wrong while decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between the relay seam (generic events in and
//! out) and the booking workflow (typed rides). It doesn't know about
//! relays, signers, or wallets — it only knows how to validate and convert
//! records.
//!
//! ```text
//! Relay (Event) → Protocol (RideOffer / RideRequest) → Booking (workflow)
//! ```

mod codec;
mod error;
mod rides;
mod types;

pub use codec::{
    active_offers, decode_offer_listing, decode_request_listing,
    decode_ride_offer, decode_ride_request, encode_profile_update,
    encode_ride_offer, encode_ride_offer_draft, encode_ride_request_draft,
    sort_offers_by_departure, sort_requests_by_departure,
};
pub use error::CodecError;
pub use rides::{
    Ride, RideOffer, RideOfferDraft, RideRequest, RideRequestDraft,
    RideStatus,
};
pub use types::{
    Event, EventDraft, EventId, Filter, PubKey, Tag, KIND_DELETION,
    KIND_DM_RELAY_LIST, KIND_OFFER_ACCEPTANCE, KIND_PRIVATE_MESSAGE,
    KIND_PROFILE, KIND_REQUEST_ACCEPTANCE, KIND_RIDE_OFFER,
    KIND_RIDE_REQUEST, TOPIC_RIDESHARE, TOPIC_TRANSPORT,
};
