//! Wallet configuration: the user's choice of payment backend.
//!
//! Three methods are supported:
//! - **Extension** — a wallet built into the user's client environment.
//! - **Remote** — a wallet reached over a `nostr+walletconnect://` URI.
//! - **Manual** — no live wallet at all, just a payment address other
//!   users can pay to directly.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::WalletError;

/// URI scheme a remote wallet connection string must carry.
pub const REMOTE_URI_SCHEME: &str = "nostr+walletconnect";

// ---------------------------------------------------------------------------
// WalletMethod / WalletConfig
// ---------------------------------------------------------------------------

/// How payments are handled for this user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum WalletMethod {
    /// Wallet provided by the client environment (may be absent).
    Extension,
    /// Wallet reached over a `nostr+walletconnect://` URI.
    Remote,
    /// No live wallet; payments go to a static payment address.
    Manual,
}

/// The persisted wallet configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Connection string for the remote method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_uri: Option<String>,
    /// Payment address (`user@domain.example`) for receiving directly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_address: Option<String>,
    /// Selected payment method.
    pub method: WalletMethod,
}

impl WalletConfig {
    /// Checks every populated field; the selected method's own
    /// requirements are enforced later, at connect time.
    pub fn validate(&self) -> Result<(), WalletError> {
        if let Some(uri) = &self.remote_uri {
            if !is_valid_remote_uri(uri) {
                return Err(WalletError::InvalidConfig(format!(
                    "invalid wallet connection URI, must start with \
                     {REMOTE_URI_SCHEME}://"
                )));
            }
        }
        if let Some(addr) = &self.payment_address {
            if !is_valid_payment_address(addr) {
                return Err(WalletError::InvalidConfig(
                    "invalid payment address, must be in the form \
                     user@domain.example"
                        .to_string(),
                ));
            }
        }
        Ok(())
    }

    /// The payment address, when present and non-empty.
    pub fn payment_address(&self) -> Option<&str> {
        self.payment_address.as_deref().filter(|a| !a.is_empty())
    }

    /// The remote URI, when present and non-empty.
    pub fn remote_uri(&self) -> Option<&str> {
        self.remote_uri.as_deref().filter(|u| !u.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// `true` if the string parses as a URL with the wallet-connect scheme.
pub fn is_valid_remote_uri(uri: &str) -> bool {
    Url::parse(uri).is_ok_and(|u| u.scheme() == REMOTE_URI_SCHEME)
}

/// `true` if the address is `local@domain` with a dotted domain and no
/// whitespace or extra `@`.
pub fn is_valid_payment_address(addr: &str) -> bool {
    if addr.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = addr.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((head, tail)) => !head.is_empty() && !tail.is_empty(),
        None => false,
    }
}

// ---------------------------------------------------------------------------
// RemoteUri
// ---------------------------------------------------------------------------

/// The parts of a `nostr+walletconnect://` connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUri {
    /// The wallet service's public key (the URI host).
    pub wallet_pubkey: String,
    /// Shared secret for the session, from the `secret` query param.
    pub secret: Option<String>,
    /// Relay the wallet listens on, from the `relay` query param.
    pub relay: Option<String>,
}

impl RemoteUri {
    /// Parses a wallet connection string into its parts.
    pub fn parse(uri: &str) -> Result<Self, WalletError> {
        let parsed = Url::parse(uri).map_err(|e| {
            WalletError::InvalidConfig(format!(
                "invalid wallet connection URI: {e}"
            ))
        })?;
        if parsed.scheme() != REMOTE_URI_SCHEME {
            return Err(WalletError::InvalidConfig(format!(
                "invalid wallet connection URI, must start with \
                 {REMOTE_URI_SCHEME}://"
            )));
        }
        let wallet_pubkey = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| {
                WalletError::InvalidConfig(
                    "wallet connection URI has no wallet pubkey"
                        .to_string(),
                )
            })?
            .to_string();

        let mut secret = None;
        let mut relay = None;
        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                "secret" => secret = Some(value.into_owned()),
                "relay" => relay = Some(value.into_owned()),
                _ => {}
            }
        }

        Ok(Self {
            wallet_pubkey,
            secret,
            relay,
        })
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn manual_config(addr: &str) -> WalletConfig {
        WalletConfig {
            remote_uri: None,
            payment_address: Some(addr.to_string()),
            method: WalletMethod::Manual,
        }
    }

    #[test]
    fn test_method_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&WalletMethod::Extension).unwrap(),
            "\"extension\""
        );
        assert_eq!(
            serde_json::to_string(&WalletMethod::Manual).unwrap(),
            "\"manual\""
        );
    }

    #[test]
    fn test_validate_accepts_wallet_connect_uri() {
        let config = WalletConfig {
            remote_uri: Some(
                "nostr+walletconnect://b889?relay=wss%3A%2F%2Frelay.example&secret=71a8"
                    .to_string(),
            ),
            payment_address: None,
            method: WalletMethod::Remote,
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_wrong_scheme() {
        let config = WalletConfig {
            remote_uri: Some("https://wallet.example".to_string()),
            payment_address: None,
            method: WalletMethod::Remote,
        };
        assert!(matches!(
            config.validate(),
            Err(WalletError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_payment_address_validation() {
        assert!(is_valid_payment_address("alice@ln.example.com"));
        assert!(!is_valid_payment_address("alice"));
        assert!(!is_valid_payment_address("alice@nodot"));
        assert!(!is_valid_payment_address("@example.com"));
        assert!(!is_valid_payment_address("alice@.com"));
        assert!(!is_valid_payment_address("alice@example."));
        assert!(!is_valid_payment_address("al ice@example.com"));
        assert!(!is_valid_payment_address("alice@ex@ample.com"));
    }

    #[test]
    fn test_validate_rejects_bad_payment_address() {
        assert!(matches!(
            manual_config("not-an-address").validate(),
            Err(WalletError::InvalidConfig(_))
        ));
        assert!(manual_config("rider@pay.example").validate().is_ok());
    }

    #[test]
    fn test_remote_uri_parse_extracts_parts() {
        let uri = RemoteUri::parse(
            "nostr+walletconnect://b889ff5b?relay=wss%3A%2F%2Frelay.example&secret=71a8c14c",
        )
        .unwrap();
        assert_eq!(uri.wallet_pubkey, "b889ff5b");
        assert_eq!(uri.secret.as_deref(), Some("71a8c14c"));
        // Query params come back percent-decoded.
        assert_eq!(uri.relay.as_deref(), Some("wss://relay.example"));
    }

    #[test]
    fn test_remote_uri_parse_missing_params_are_none() {
        let uri =
            RemoteUri::parse("nostr+walletconnect://b889ff5b").unwrap();
        assert_eq!(uri.wallet_pubkey, "b889ff5b");
        assert_eq!(uri.secret, None);
        assert_eq!(uri.relay, None);
    }

    #[test]
    fn test_remote_uri_parse_rejects_other_scheme() {
        assert!(RemoteUri::parse("https://b889ff5b").is_err());
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = WalletConfig {
            remote_uri: Some(
                "nostr+walletconnect://b889".to_string(),
            ),
            payment_address: Some("rider@pay.example".to_string()),
            method: WalletMethod::Remote,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: WalletConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
