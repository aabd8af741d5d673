//! Error types for the protocol layer.
//!
//! Each crate in Ridemesh defines its own error enum. A `CodecError` always
//! means a record failed the decode gate — not a network or workflow
//! problem.
//!
//! During listing, these errors are swallowed and the record is silently
//! excluded: partial or malformed data from an open network is expected and
//! never surfaces to the user. The variants exist so direct decode calls
//! (and tests) can see why a record was rejected.

/// Why an event was rejected by the decode gate.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The event's kind discriminator doesn't match the target type.
    #[error("wrong kind: expected {expected}, got {got}")]
    WrongKind { expected: u32, got: u32 },

    /// A required tag is absent or has an empty first value.
    #[error("missing required tag `{0}`")]
    MissingTag(&'static str),

    /// A numeric tag failed to parse or is out of its allowed range.
    #[error("invalid value for tag `{0}`")]
    InvalidValue(&'static str),

    /// An offer's status tag is not one of the enumerated literals.
    #[error("unknown status literal `{0}`")]
    UnknownStatus(String),
}
