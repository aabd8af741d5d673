//! Wallet session: the live connection state on top of the configuration.
//!
//! The session is a state machine with three phases:
//!
//! ```text
//!   Disconnected ──(connect)──→ Connecting ──(ok)──→ Connected
//!        ↑                          │
//!        └────────(failure)─────────┘
//! ```
//!
//! Under the manual method there is no live backend at all: "connected"
//! just means a payment address is configured, so other users can pay it
//! directly. That asymmetry is deliberate and covered by tests: manual
//! connect never touches a backend, balance is always unknown, and
//! invoice operations are unsupported.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{WalletConfig, WalletMethod};
use crate::error::WalletError;

// ---------------------------------------------------------------------------
// Backend seams
// ---------------------------------------------------------------------------

/// A live wallet backend.
///
/// `async_trait` keeps this object-safe: the session holds whichever
/// backend the provider resolved as `Arc<dyn WalletConnector>`.
#[async_trait]
pub trait WalletConnector: Send + Sync {
    /// Asks the backend for permission to operate.
    async fn enable(&self) -> Result<(), WalletError>;
    /// Current balance in minor units.
    async fn balance(&self) -> Result<u64, WalletError>;
    /// Creates an invoice for `amount` minor units.
    async fn make_invoice(
        &self,
        amount: u64,
        description: &str,
    ) -> Result<String, WalletError>;
    /// Pays the given invoice.
    async fn pay_invoice(&self, invoice: &str) -> Result<(), WalletError>;
}

/// Resolves wallet backends for the two live methods.
pub trait ConnectorProvider: Send + Sync {
    /// The environment-provided wallet extension, if one is present.
    fn extension(&self) -> Option<Arc<dyn WalletConnector>>;
    /// Builds a remote connector from a wallet connection URI.
    fn remote(
        &self,
        uri: &str,
    ) -> Result<Arc<dyn WalletConnector>, WalletError>;
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Lifecycle phase of the wallet session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletPhase {
    /// No wallet attached. The initial phase, and where failures land.
    Disconnected,
    /// A connect attempt is in flight.
    Connecting,
    /// Ready for payment operations (or, under manual, logically ready).
    Connected,
}

/// The wallet session state machine.
///
/// Holds the active configuration, the resolved backend (when one
/// exists), the last error message, and the last known balance. Nothing
/// here is persisted; the configuration itself lives in a
/// [`ConfigStore`](crate::ConfigStore).
pub struct WalletSession<P: ConnectorProvider> {
    provider: P,
    config: Option<WalletConfig>,
    phase: WalletPhase,
    connector: Option<Arc<dyn WalletConnector>>,
    last_error: Option<String>,
    balance: Option<u64>,
}

impl<P: ConnectorProvider> WalletSession<P> {
    /// Creates a disconnected session with no configuration.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            config: None,
            phase: WalletPhase::Disconnected,
            connector: None,
            last_error: None,
            balance: None,
        }
    }

    /// Replaces the active configuration. Does not touch the phase;
    /// call [`connect`](Self::connect) or
    /// [`auto_connect`](Self::auto_connect) afterwards.
    pub fn set_config(&mut self, config: Option<WalletConfig>) {
        self.config = config;
    }

    /// The active configuration.
    pub fn config(&self) -> Option<&WalletConfig> {
        self.config.as_ref()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> WalletPhase {
        self.phase
    }

    /// Message of the most recent failure, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Last balance the backend reported, in minor units.
    pub fn cached_balance(&self) -> Option<u64> {
        self.balance
    }

    // -- Lifecycle ------------------------------------------------------------

    /// Connects according to the active configuration.
    ///
    /// On failure the session lands back in `Disconnected` with
    /// `last_error` recorded, and the error is also returned.
    pub async fn connect(&mut self) -> Result<(), WalletError> {
        self.phase = WalletPhase::Connecting;
        self.last_error = None;

        match self.try_connect().await {
            Ok(connector) => {
                self.connector = connector;
                self.phase = WalletPhase::Connected;
                tracing::info!(
                    method = ?self.config.as_ref().map(|c| c.method),
                    "wallet connected"
                );
                Ok(())
            }
            Err(err) => {
                self.connector = None;
                self.phase = WalletPhase::Disconnected;
                self.last_error = Some(err.to_string());
                tracing::warn!(%err, "wallet connect failed");
                Err(err)
            }
        }
    }

    async fn try_connect(
        &self,
    ) -> Result<Option<Arc<dyn WalletConnector>>, WalletError> {
        let config = self.config.as_ref().ok_or(
            WalletError::ConfigurationMissing(
                "no wallet configuration found, configure your wallet first",
            ),
        )?;

        match config.method {
            WalletMethod::Extension => {
                let connector =
                    self.provider.extension().ok_or_else(|| {
                        WalletError::ProviderUnavailable(
                            "no wallet extension available, install a \
                             compatible wallet extension"
                                .to_string(),
                        )
                    })?;
                connector.enable().await?;
                Ok(Some(connector))
            }
            WalletMethod::Remote => {
                let uri = config.remote_uri().ok_or(
                    WalletError::ConfigurationMissing(
                        "no remote wallet URI configured",
                    ),
                )?;
                let connector = self.provider.remote(uri)?;
                connector.enable().await?;
                Ok(Some(connector))
            }
            WalletMethod::Manual => {
                // No handshake: a configured payment address is all
                // "connected" means under the manual method.
                config.payment_address().ok_or(
                    WalletError::ConfigurationMissing(
                        "no payment address configured",
                    ),
                )?;
                Ok(None)
            }
        }
    }

    /// Connects without a handshake when the configuration allows it:
    /// manual method with a payment address. Returns `true` if the
    /// session became connected.
    pub fn auto_connect(&mut self) -> bool {
        if self.phase != WalletPhase::Disconnected {
            return false;
        }
        let Some(config) = &self.config else {
            return false;
        };
        if config.method == WalletMethod::Manual
            && config.payment_address().is_some()
        {
            self.phase = WalletPhase::Connected;
            self.connector = None;
            return true;
        }
        false
    }

    /// Drops the backend and clears all session state.
    pub fn disconnect(&mut self) {
        self.phase = WalletPhase::Disconnected;
        self.connector = None;
        self.last_error = None;
        self.balance = None;
    }

    // -- Payment operations -----------------------------------------------------

    /// Current balance in minor units, or `None` when unknown.
    ///
    /// Unknown covers three cases: not connected, the manual method
    /// (which has no backend to ask), and a backend failure. A failure
    /// is recorded in `last_error` rather than returned, so callers can
    /// always render "balance unknown".
    pub async fn balance(&mut self) -> Option<u64> {
        if self.phase != WalletPhase::Connected {
            return None;
        }
        let Some(connector) = &self.connector else {
            self.balance = None;
            return None;
        };

        match connector.balance().await {
            Ok(amount) => {
                self.balance = Some(amount);
                Some(amount)
            }
            Err(err) => {
                tracing::warn!(%err, "balance query failed");
                self.last_error = Some(err.to_string());
                None
            }
        }
    }

    /// Creates an invoice for `amount` minor units.
    pub async fn make_invoice(
        &mut self,
        amount: u64,
        description: &str,
    ) -> Result<String, WalletError> {
        let connector = self.live_connector(
            "invoice creation is not supported with manual \
             configuration, share your payment address instead",
        )?;
        self.record(connector.make_invoice(amount, description).await)
    }

    /// Pays the given invoice.
    pub async fn pay_invoice(
        &mut self,
        invoice: &str,
    ) -> Result<(), WalletError> {
        let connector = self.live_connector(
            "automatic payments are not supported with manual \
             configuration, pay the invoice from your own wallet",
        )?;
        self.record(connector.pay_invoice(invoice).await)
    }

    /// The live backend, or the error explaining why there is none.
    fn live_connector(
        &self,
        manual_message: &'static str,
    ) -> Result<Arc<dyn WalletConnector>, WalletError> {
        if self
            .config
            .as_ref()
            .is_some_and(|c| c.method == WalletMethod::Manual)
        {
            return Err(WalletError::UnsupportedOperation(manual_message));
        }
        if self.phase != WalletPhase::Connected {
            return Err(WalletError::ProviderUnavailable(
                "not connected to a wallet".to_string(),
            ));
        }
        self.connector.clone().ok_or_else(|| {
            WalletError::ProviderUnavailable(
                "no wallet backend available".to_string(),
            )
        })
    }

    fn record<T>(
        &mut self,
        result: Result<T, WalletError>,
    ) -> Result<T, WalletError> {
        if let Err(err) = &result {
            self.last_error = Some(err.to_string());
        }
        result
    }
}
