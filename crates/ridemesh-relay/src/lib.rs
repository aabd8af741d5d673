//! Relay and messenger seams for Ridemesh.
//!
//! The event network and the private-message channel are pre-existing
//! external systems. This crate defines the two traits the rest of the
//! stack programs against, the timeout policy for calls through them, and
//! an in-memory implementation for tests and demos:
//!
//! 1. **Publish/query** — [`RelayClient`]: hand a draft to the external
//!    client (which signs and timestamps it), or query events by filter.
//! 2. **Private notification** — [`Messenger`]: one encrypted
//!    point-to-point message; encryption lives behind the seam.
//! 3. **Timeouts** — [`with_timeout`], [`QUERY_TIMEOUT`],
//!    [`PUBLISH_TIMEOUT`]: every outbound call is abandoned after a few
//!    seconds and treated as a failure. No call is ever retried.
//!
//! # How it fits in the stack
//!
//! ```text
//! Booking workflow (above)  ← publishes/queries through these traits
//!     ↕
//! Relay seam (this crate)
//!     ↕
//! External relay client / signer (outside the repository)
//! ```

#![allow(async_fn_in_trait)]

mod client;
mod error;
mod memory;

pub use client::{
    with_timeout, Messenger, RelayClient, PUBLISH_TIMEOUT, QUERY_TIMEOUT,
};
pub use error::RelayError;
pub use memory::{MemoryMessenger, MemoryRelay, SentMessage};
