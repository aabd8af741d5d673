//! # Ridemesh
//!
//! Decentralized ride sharing over a relay event network.
//!
//! Rides are plain events on shared relays: drivers publish offers,
//! riders publish requests, and either side accepts the other's by
//! publishing an acceptance event plus a private courtesy message.
//! Payments are arranged between the two parties through a Lightning
//! wallet session; nothing here moves money by itself.
//!
//! This meta-crate re-exports the whole stack:
//!
//! - [`ridemesh_protocol`] — the event model and the ride codec.
//! - [`ridemesh_relay`] — the relay/messenger seams, timeouts, and the
//!   in-memory implementations.
//! - [`ridemesh_booking`] — the [`RideBoard`] workflow: publish, list,
//!   accept, cancel.
//! - [`ridemesh_wallet`] — wallet configuration and session state.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ridemesh::prelude::*;
//!
//! # async fn run() -> Result<(), RidemeshError> {
//! let relay = MemoryRelay::new(PubKey::from("driver-pk"));
//! let mut board = RideBoard::new(relay, MemoryMessenger::new());
//! board.sign_in(PubKey::from("driver-pk"));
//!
//! let offers = board.list_active_offers().await?;
//! for offer in &offers {
//!     println!("{} — {} seats", offer.title, offer.seats_available);
//! }
//! # Ok(())
//! # }
//! ```

mod error;

pub use error::RidemeshError;

pub use ridemesh_booking::{
    AcceptOutcome, BookingError, CancelOutcome, NotifyOutcome, RideBoard,
};
pub use ridemesh_protocol::{
    CodecError, Event, EventDraft, EventId, Filter, PubKey, Ride,
    RideOffer, RideOfferDraft, RideRequest, RideRequestDraft, RideStatus,
};
pub use ridemesh_relay::{
    MemoryMessenger, MemoryRelay, Messenger, RelayClient, RelayError,
};
pub use ridemesh_wallet::{
    ConfigStore, ConnectorProvider, MemoryConfigStore, RemoteUri,
    WalletConfig, WalletConnector, WalletError, WalletMethod,
    WalletPhase, WalletSession,
};

/// Everything most applications need, importable in one line.
pub mod prelude {
    pub use crate::error::RidemeshError;
    pub use ridemesh_booking::{AcceptOutcome, CancelOutcome, RideBoard};
    pub use ridemesh_protocol::{
        Event, EventDraft, EventId, Filter, PubKey, Ride, RideOffer,
        RideOfferDraft, RideRequest, RideRequestDraft, RideStatus,
    };
    pub use ridemesh_relay::{
        MemoryMessenger, MemoryRelay, Messenger, RelayClient,
    };
    pub use ridemesh_wallet::{
        WalletConfig, WalletMethod, WalletPhase, WalletSession,
    };
}
