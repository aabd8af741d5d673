//! In-memory relay and messenger.
//!
//! Deterministic local implementations of the two seams, used by the test
//! suites and the demo. Event ids and timestamps are sequential so
//! assertions stay stable, and both types support one-shot failure
//! injection for exercising error paths.

use std::collections::HashSet;
use std::sync::Arc;

use ridemesh_protocol::{
    Event, EventDraft, EventId, Filter, PubKey, KIND_RIDE_OFFER,
};
use tokio::sync::Mutex;

use crate::{Messenger, RelayClient, RelayError};

// ---------------------------------------------------------------------------
// MemoryRelay
// ---------------------------------------------------------------------------

struct RelayInner {
    events: Vec<Event>,
    next_seq: u64,
    fail_next_publish: Option<String>,
    fail_next_query: Option<String>,
}

/// An in-process event store implementing [`RelayClient`].
///
/// Cheap to clone — clones share the same store. The relay "signs" drafts
/// with the author pubkey it was created with, and honors replaceable-slot
/// semantics: publishing a ride offer under an (author, kind, `d`) triple
/// that already exists replaces the earlier event, and kinds in the
/// 10000-19999 preference-list range replace per (author, kind).
#[derive(Clone)]
pub struct MemoryRelay {
    author: PubKey,
    inner: Arc<Mutex<RelayInner>>,
}

impl MemoryRelay {
    /// Creates an empty relay signing as `author`.
    pub fn new(author: PubKey) -> Self {
        Self {
            author,
            inner: Arc::new(Mutex::new(RelayInner {
                events: Vec::new(),
                next_seq: 1,
                fail_next_publish: None,
                fail_next_query: None,
            })),
        }
    }

    /// A handle to the same store that signs as a different author.
    pub fn as_author(&self, author: PubKey) -> Self {
        Self {
            author,
            inner: Arc::clone(&self.inner),
        }
    }

    /// Fails the next `publish` call with the given message.
    pub async fn fail_next_publish(&self, reason: &str) {
        self.inner.lock().await.fail_next_publish =
            Some(reason.to_string());
    }

    /// Fails the next `query` call with the given message.
    pub async fn fail_next_query(&self, reason: &str) {
        self.inner.lock().await.fail_next_query = Some(reason.to_string());
    }

    /// Snapshot of every stored event, in publication order.
    pub async fn all_events(&self) -> Vec<Event> {
        self.inner.lock().await.events.clone()
    }

    /// Number of stored events.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.events.len()
    }

    /// Returns `true` if nothing has been published.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.events.is_empty()
    }
}

impl RelayClient for MemoryRelay {
    async fn query(
        &self,
        filter: Filter,
    ) -> Result<Vec<Event>, RelayError> {
        let mut inner = self.inner.lock().await;
        if let Some(reason) = inner.fail_next_query.take() {
            return Err(RelayError::Query(reason));
        }

        let mut hits: Vec<Event> = inner
            .events
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        if let Some(limit) = filter.limit {
            hits.truncate(limit);
        }
        Ok(hits)
    }

    async fn publish(
        &self,
        draft: EventDraft,
    ) -> Result<Event, RelayError> {
        let mut inner = self.inner.lock().await;
        if let Some(reason) = inner.fail_next_publish.take() {
            return Err(RelayError::Publish(reason));
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;

        let event = Event {
            id: EventId(format!("mem-{seq}")),
            pubkey: self.author.clone(),
            kind: draft.kind,
            created_at: 1_700_000_000 + seq,
            tags: draft.tags,
            content: draft.content,
        };

        // Replaceable slot: latest (author, kind, d) wins.
        if event.kind == KIND_RIDE_OFFER {
            if let Some(slot) = event.tag_value("d") {
                let slot = slot.to_string();
                inner.events.retain(|e| {
                    !(e.kind == event.kind
                        && e.pubkey == event.pubkey
                        && e.tag_value("d") == Some(slot.as_str()))
                });
            }
        }

        // Kinds 10000-19999 (relay/preference lists) are replaceable per
        // (author, kind): latest wins, no slot tag involved.
        if (10_000..20_000).contains(&event.kind) {
            inner.events.retain(|e| {
                !(e.kind == event.kind && e.pubkey == event.pubkey)
            });
        }

        tracing::debug!(id = %event.id, kind = event.kind, "event stored");
        inner.events.push(event.clone());
        Ok(event)
    }
}

// ---------------------------------------------------------------------------
// MemoryMessenger
// ---------------------------------------------------------------------------

/// A private message captured by [`MemoryMessenger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub recipient: PubKey,
    pub content: String,
    pub subject: Option<String>,
}

struct MessengerInner {
    sent: Vec<SentMessage>,
    next_seq: u64,
    failing_recipients: HashSet<PubKey>,
    fail_all: bool,
}

/// An in-process [`Messenger`] that records every message it "sends".
///
/// Individual recipients can be marked as failing to exercise the
/// best-effort fan-out paths.
#[derive(Clone)]
pub struct MemoryMessenger {
    inner: Arc<Mutex<MessengerInner>>,
}

impl Default for MemoryMessenger {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryMessenger {
    /// Creates a messenger that delivers everything.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MessengerInner {
                sent: Vec::new(),
                next_seq: 1,
                failing_recipients: HashSet::new(),
                fail_all: false,
            })),
        }
    }

    /// Every send to `recipient` will fail from now on.
    pub async fn fail_for(&self, recipient: PubKey) {
        self.inner
            .lock()
            .await
            .failing_recipients
            .insert(recipient);
    }

    /// Every send fails from now on.
    pub async fn fail_all(&self) {
        self.inner.lock().await.fail_all = true;
    }

    /// Everything successfully delivered so far, in send order.
    pub async fn sent(&self) -> Vec<SentMessage> {
        self.inner.lock().await.sent.clone()
    }
}

impl Messenger for MemoryMessenger {
    async fn send_private(
        &self,
        recipient: &PubKey,
        content: &str,
        subject: Option<&str>,
    ) -> Result<EventId, RelayError> {
        let mut inner = self.inner.lock().await;
        if inner.fail_all || inner.failing_recipients.contains(recipient) {
            return Err(RelayError::Message(format!(
                "delivery to {recipient} refused"
            )));
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.sent.push(SentMessage {
            recipient: recipient.clone(),
            content: content.to_string(),
            subject: subject.map(str::to_string),
        });
        Ok(EventId(format!("dm-{seq}")))
    }
}

// =========================================================================
// Tests
// =========================================================================
