//! Lightning wallet configuration and session state for Ridemesh.
//!
//! This crate covers the payment side of the ride board:
//!
//! - **Configuration** — which payment method the user chose (extension,
//!   remote, or manual), validated and persisted through a pluggable
//!   [`ConfigStore`], optionally announced on the user's profile record.
//! - **Session** — a small state machine over the live wallet backends:
//!   connect, disconnect, balance, invoices.
//!
//! Payment execution itself happens in whichever backend the
//! [`ConnectorProvider`] resolves; this crate only orchestrates.

mod config;
mod error;
mod session;
mod store;

pub use config::{
    is_valid_payment_address, is_valid_remote_uri, RemoteUri,
    WalletConfig, WalletMethod, REMOTE_URI_SCHEME,
};
pub use error::WalletError;
pub use session::{
    ConnectorProvider, WalletConnector, WalletPhase, WalletSession,
};
pub use store::{
    clear_config, load_config, save_config, ConfigStore,
    MemoryConfigStore, CONFIG_KEY,
};
