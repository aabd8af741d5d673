//! Error types for the booking workflow.

use ridemesh_protocol::CodecError;
use ridemesh_relay::RelayError;

/// Errors from booking operations.
///
/// Precondition failures (`SignedOutActor`, `InvalidOperation`) are
/// evaluated synchronously before any network effect, so a rejected
/// operation has published nothing. Messages are written to be shown to
/// the user verbatim.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    /// No signed-in actor. Every booking operation requires one.
    #[error("you must be signed in to manage rides")]
    SignedOutActor,

    /// An ownership or state precondition failed.
    #[error("{0}")]
    InvalidOperation(String),

    /// A published event came back in a shape the codec rejects.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The relay or messenger call failed.
    #[error(transparent)]
    Relay(#[from] RelayError),
}

impl BookingError {
    pub(crate) fn invalid(msg: &str) -> Self {
        Self::InvalidOperation(msg.to_string())
    }
}
