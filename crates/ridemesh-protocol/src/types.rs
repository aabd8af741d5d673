//! Generic event types shared across the stack.
//!
//! Everything that travels over the relay network is one of these shapes:
//! an [`Event`] coming back from a query, or an [`EventDraft`] handed to
//! the external client for signing and publication.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Kind constants
// ---------------------------------------------------------------------------

/// Ride offer (replaceable via the author-chosen `d` tag).
pub const KIND_RIDE_OFFER: u32 = 30433;
/// Ride request (plain event; identified by its protocol-assigned id).
pub const KIND_RIDE_REQUEST: u32 = 3961;
/// Acceptance of a ride offer (rider accepting a driver's offer).
pub const KIND_OFFER_ACCEPTANCE: u32 = 9639;
/// Acceptance of a ride request (driver accepting a rider's request).
pub const KIND_REQUEST_ACCEPTANCE: u32 = 3561;
/// Deletion intent referencing an earlier event. Advisory by convention —
/// the referenced record is never physically removed.
pub const KIND_DELETION: u32 = 5;
/// Encrypted point-to-point message with an optional `subject` tag.
pub const KIND_PRIVATE_MESSAGE: u32 = 4;
/// Whole-record profile replace (JSON content).
pub const KIND_PROFILE: u32 = 0;
/// Preferred relays for receiving private messages.
pub const KIND_DM_RELAY_LIST: u32 = 10050;

/// Topical marker attached to every ride event for discoverability.
pub const TOPIC_RIDESHARE: &str = "rideshare";
/// Secondary topical marker attached to offers and requests.
pub const TOPIC_TRANSPORT: &str = "transport";

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// An author's public key (hex-encoded).
///
/// Newtype wrapper so a pubkey can't be confused with an event id or a
/// free-text tag value in a signature. `#[serde(transparent)]` keeps the
/// wire shape a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PubKey(pub String);

impl PubKey {
    /// Borrows the hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PubKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A protocol-assigned event identifier (hex-encoded hash).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub String);

impl EventId {
    /// Borrows the hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tag
// ---------------------------------------------------------------------------

/// A named, ordered list of string values attached to an event.
///
/// The first element is the tag name, the second (when present) is the
/// value this codec cares about. Further elements are preserved but never
/// interpreted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(pub Vec<String>);

impl Tag {
    /// Builds a `[name, value]` tag.
    pub fn pair(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self(vec![name.into(), value.into()])
    }

    /// The tag name, if the tag is non-empty.
    pub fn name(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// The tag's first value (the element after the name).
    pub fn value(&self) -> Option<&str> {
        self.0.get(1).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Event / EventDraft
// ---------------------------------------------------------------------------

/// An immutable, signed, timestamped record from the relay network.
///
/// The signature itself is validated by the external relay client before
/// events reach this layer, so it is not carried here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Protocol-assigned identifier.
    pub id: EventId,
    /// Author public key.
    pub pubkey: PubKey,
    /// Numeric kind discriminator selecting the event's schema.
    pub kind: u32,
    /// Unix timestamp (seconds) of creation.
    pub created_at: u64,
    /// Structured metadata.
    pub tags: Vec<Tag>,
    /// Free-text content body.
    pub content: String,
}

impl Event {
    /// First value of the first tag with the given name, if any.
    pub fn tag_value(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.name() == Some(name))
            .and_then(Tag::value)
    }

    /// First value of the named tag, or `""` when absent.
    ///
    /// Only used after validation has confirmed the tag is present, so the
    /// empty-string fallback is unreachable on accepted records.
    pub fn tag_value_or_empty(&self, name: &str) -> &str {
        self.tag_value(name).unwrap_or_default()
    }
}

/// An event before signing: what the application hands to the external
/// client for publication. The client assigns id, author, timestamp, and
/// signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    /// Numeric kind discriminator.
    pub kind: u32,
    /// Free-text content body.
    pub content: String,
    /// Structured metadata.
    pub tags: Vec<Tag>,
}

impl EventDraft {
    /// First value of the first tag with the given name, if any.
    pub fn tag_value(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.name() == Some(name))
            .and_then(Tag::value)
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// The query shape passed to the relay seam.
///
/// Empty vectors mean "no constraint on this dimension".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// Match any of these kinds.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kinds: Vec<u32>,
    /// Match any of these authors.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<PubKey>,
    /// Match events carrying any of these `t` (topic) tag values.
    #[serde(default, rename = "#t", skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<String>,
    /// Maximum number of events to return.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl Filter {
    /// Filter for a single kind under the rideshare topic, limit 100 —
    /// the listing query both ride families use.
    pub fn rideshare_listing(kind: u32) -> Self {
        Self {
            kinds: vec![kind],
            authors: Vec::new(),
            topics: vec![TOPIC_RIDESHARE.to_string()],
            limit: Some(100),
        }
    }

    /// Returns `true` if the event satisfies every constraint.
    pub fn matches(&self, event: &Event) -> bool {
        if !self.kinds.is_empty() && !self.kinds.contains(&event.kind) {
            return false;
        }
        if !self.authors.is_empty() && !self.authors.contains(&event.pubkey)
        {
            return false;
        }
        if !self.topics.is_empty() {
            let has_topic = event.tags.iter().any(|t| {
                t.name() == Some("t")
                    && t.value()
                        .is_some_and(|v| self.topics.iter().any(|w| w == v))
            });
            if !has_topic {
                return false;
            }
        }
        true
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! JSON-shape tests for the event model. The relay network defines the
    //! exact wire shapes; a mismatch means the external client can't parse
    //! what we hand it.

    use super::*;

    fn event_with_tags(tags: Vec<Tag>) -> Event {
        Event {
            id: EventId::from("e1"),
            pubkey: PubKey::from("pk1"),
            kind: KIND_RIDE_OFFER,
            created_at: 1_700_000_000,
            tags,
            content: String::new(),
        }
    }

    #[test]
    fn test_pubkey_serializes_as_plain_string() {
        let json = serde_json::to_string(&PubKey::from("abc123")).unwrap();
        assert_eq!(json, "\"abc123\"");
    }

    #[test]
    fn test_event_id_round_trip() {
        let id = EventId::from("deadbeef");
        let json = serde_json::to_string(&id).unwrap();
        let back: EventId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn test_tag_serializes_as_plain_array() {
        let tag = Tag::pair("status", "active");
        let json = serde_json::to_string(&tag).unwrap();
        assert_eq!(json, "[\"status\",\"active\"]");
    }

    #[test]
    fn test_tag_name_and_value_accessors() {
        let tag = Tag::pair("price", "5000");
        assert_eq!(tag.name(), Some("price"));
        assert_eq!(tag.value(), Some("5000"));
    }

    #[test]
    fn test_tag_empty_has_no_name() {
        let tag = Tag(vec![]);
        assert_eq!(tag.name(), None);
        assert_eq!(tag.value(), None);
    }

    #[test]
    fn test_event_tag_value_finds_first_match() {
        let event = event_with_tags(vec![
            Tag::pair("t", "rideshare"),
            Tag::pair("t", "transport"),
        ]);
        assert_eq!(event.tag_value("t"), Some("rideshare"));
    }

    #[test]
    fn test_event_tag_value_missing_returns_none() {
        let event = event_with_tags(vec![]);
        assert_eq!(event.tag_value("title"), None);
        assert_eq!(event.tag_value_or_empty("title"), "");
    }

    #[test]
    fn test_event_round_trip() {
        let event = event_with_tags(vec![Tag::pair("d", "ride-1")]);
        let bytes = serde_json::to_vec(&event).unwrap();
        let back: Event = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(event, back);
    }

    #[test]
    fn test_filter_topics_serialize_under_hash_t() {
        let filter = Filter::rideshare_listing(KIND_RIDE_OFFER);
        let json: serde_json::Value = serde_json::to_value(&filter).unwrap();
        assert_eq!(json["kinds"], serde_json::json!([30433]));
        assert_eq!(json["#t"], serde_json::json!(["rideshare"]));
        assert_eq!(json["limit"], 100);
    }

    #[test]
    fn test_filter_matches_kind_and_topic() {
        let filter = Filter::rideshare_listing(KIND_RIDE_OFFER);
        let hit = event_with_tags(vec![Tag::pair("t", "rideshare")]);
        assert!(filter.matches(&hit));

        let mut wrong_kind = hit.clone();
        wrong_kind.kind = KIND_RIDE_REQUEST;
        assert!(!filter.matches(&wrong_kind));

        let no_topic = event_with_tags(vec![Tag::pair("t", "other")]);
        assert!(!filter.matches(&no_topic));
    }

    #[test]
    fn test_filter_empty_matches_everything() {
        let filter = Filter::default();
        let event = event_with_tags(vec![]);
        assert!(filter.matches(&event));
    }
}
