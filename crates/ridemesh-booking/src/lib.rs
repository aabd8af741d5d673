//! Ride booking workflow for Ridemesh.
//!
//! This crate turns user intents into published events and best-effort
//! private notifications:
//!
//! 1. **Publishing** — new offers (under an author-chosen replaceable slot)
//!    and new requests.
//! 2. **Listing** — query, validate, and sort what's on the network.
//! 3. **Acceptance** — "I accept this ride", with preconditions checked
//!    before any network effect.
//! 4. **Cancellation** — an offer is republished with its status forced to
//!    cancelled; a request gets a separate deletion-intent event.
//!
//! Every action is a single request/response: no retries, no queuing, no
//! compensating transactions. The published event is the durable source of
//! truth; notifications are best-effort courtesy.

#![allow(async_fn_in_trait)]

mod board;
mod error;
mod notify;

pub use board::{AcceptOutcome, CancelOutcome, RideBoard};
pub use error::BookingError;
pub use notify::{fan_out, NotifyOutcome};
