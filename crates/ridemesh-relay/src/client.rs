//! The two trait seams to the outside world, plus the timeout policy.

use std::future::Future;
use std::time::Duration;

use ridemesh_protocol::{Event, EventDraft, EventId, Filter, PubKey};

use crate::RelayError;

/// How long a listing query may run before it is abandoned.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(3);

/// How long a publish or message send may run before it is abandoned.
pub const PUBLISH_TIMEOUT: Duration = Duration::from_secs(5);

/// Publish/query access to the event network.
///
/// The implementation owns the signer: [`RelayClient::publish`] takes an
/// unsigned draft and returns the finished event with id, author, and
/// timestamp assigned. Implementations must be shareable across tasks
/// (`Send + Sync`), which is why the in-memory variant keeps its state
/// behind a `tokio::sync::Mutex`.
pub trait RelayClient: Send + Sync {
    /// Returns events matching the filter.
    fn query(
        &self,
        filter: Filter,
    ) -> impl Future<Output = Result<Vec<Event>, RelayError>> + Send;

    /// Signs and publishes a draft, returning the finished event.
    fn publish(
        &self,
        draft: EventDraft,
    ) -> impl Future<Output = Result<Event, RelayError>> + Send;
}

/// The encrypted point-to-point notification channel.
///
/// On the wire each message is a
/// [`KIND_PRIVATE_MESSAGE`](ridemesh_protocol::KIND_PRIVATE_MESSAGE)
/// event carrying an optional `subject` tag. Encryption, wrapping, and
/// delivery all live behind this seam. The returned id identifies the
/// sent message for logging only.
pub trait Messenger: Send + Sync {
    /// Sends one private message to one recipient.
    fn send_private(
        &self,
        recipient: &PubKey,
        content: &str,
        subject: Option<&str>,
    ) -> impl Future<Output = Result<EventId, RelayError>> + Send;
}

/// Races a relay call against a deadline.
///
/// On elapse the call is abandoned (there is no cooperative cancellation of
/// whatever the external client is doing) and the caller sees
/// [`RelayError::Timeout`].
pub async fn with_timeout<T>(
    limit: Duration,
    fut: impl Future<Output = Result<T, RelayError>>,
) -> Result<T, RelayError> {
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_elapsed) => Err(RelayError::Timeout(limit)),
    }
}

// =========================================================================
// Tests
// =========================================================================
