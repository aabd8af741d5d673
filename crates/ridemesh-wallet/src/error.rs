//! Error types for wallet configuration and the wallet session.

/// Errors from wallet configuration and session operations.
///
/// Messages are written to be shown to the user verbatim.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// The operation needs configuration that has not been provided.
    #[error("{0}")]
    ConfigurationMissing(&'static str),

    /// A configured value failed validation.
    #[error("{0}")]
    InvalidConfig(String),

    /// No wallet backend is available to perform the operation.
    #[error("{0}")]
    ProviderUnavailable(String),

    /// The operation is not supported under the configured method.
    #[error("{0}")]
    UnsupportedOperation(&'static str),

    /// The wallet backend rejected or failed the call.
    #[error("wallet backend error: {0}")]
    Backend(String),
}
