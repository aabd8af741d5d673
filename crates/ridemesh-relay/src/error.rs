//! Error types for the relay seam.

/// Errors from calls through the relay or messenger seams.
///
/// Every variant is terminal for the call that produced it — there is no
/// retry policy anywhere in the stack, and callers surface the message
/// verbatim to the initiating user action.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The call did not complete within its timeout and was abandoned.
    #[error("relay call timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// A query could not be served.
    #[error("query failed: {0}")]
    Query(String),

    /// The external client refused or failed to publish the draft.
    #[error("publish failed: {0}")]
    Publish(String),

    /// The private notification could not be sent.
    #[error("message send failed: {0}")]
    Message(String),

    /// The connection to the external client is gone.
    #[error("relay connection closed: {0}")]
    Closed(String),
}
