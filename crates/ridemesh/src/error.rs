//! Unified error type for the Ridemesh stack.

use ridemesh_booking::BookingError;
use ridemesh_protocol::CodecError;
use ridemesh_relay::RelayError;
use ridemesh_wallet::WalletError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `ridemesh` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate.
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum RidemeshError {
    /// An event decoding/encoding error.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// A relay or messenger error (query, publish, timeout).
    #[error(transparent)]
    Relay(#[from] RelayError),

    /// A booking workflow error (preconditions, ownership).
    #[error(transparent)]
    Booking(#[from] BookingError),

    /// A wallet configuration or session error.
    #[error(transparent)]
    Wallet(#[from] WalletError),
}
