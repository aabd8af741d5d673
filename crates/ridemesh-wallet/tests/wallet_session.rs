//! Wallet session lifecycle over mock backends.
//!
//! The mock connector counts every backend call, which is how these
//! tests prove the manual method never touches a backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ridemesh_wallet::{
    ConnectorProvider, WalletConfig, WalletConnector, WalletError,
    WalletMethod, WalletPhase, WalletSession,
};

// ---------------------------------------------------------------------------
// Mocks
// ---------------------------------------------------------------------------

/// A scripted wallet backend that counts calls.
struct MockConnector {
    enable_calls: AtomicUsize,
    balance_calls: AtomicUsize,
    balance: Result<u64, String>,
}

impl MockConnector {
    fn healthy(balance: u64) -> Arc<Self> {
        Arc::new(Self {
            enable_calls: AtomicUsize::new(0),
            balance_calls: AtomicUsize::new(0),
            balance: Ok(balance),
        })
    }

    fn failing_balance(message: &str) -> Arc<Self> {
        Arc::new(Self {
            enable_calls: AtomicUsize::new(0),
            balance_calls: AtomicUsize::new(0),
            balance: Err(message.to_string()),
        })
    }

    fn total_calls(&self) -> usize {
        self.enable_calls.load(Ordering::SeqCst)
            + self.balance_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletConnector for MockConnector {
    async fn enable(&self) -> Result<(), WalletError> {
        self.enable_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn balance(&self) -> Result<u64, WalletError> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        self.balance
            .clone()
            .map_err(WalletError::Backend)
    }

    async fn make_invoice(
        &self,
        _amount: u64,
        description: &str,
    ) -> Result<String, WalletError> {
        Ok(format!("lnbc-mock-{description}"))
    }

    async fn pay_invoice(
        &self,
        _invoice: &str,
    ) -> Result<(), WalletError> {
        Ok(())
    }
}

/// A provider with a configurable extension slot; remote connectors are
/// always the same mock, and the URIs asked for are recorded.
struct MockProvider {
    extension: Option<Arc<MockConnector>>,
    remote: Arc<MockConnector>,
    remote_uris: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    fn with_extension(connector: Arc<MockConnector>) -> Self {
        Self {
            extension: Some(connector),
            remote: MockConnector::healthy(0),
            remote_uris: Arc::default(),
        }
    }

    fn without_extension() -> Self {
        Self {
            extension: None,
            remote: MockConnector::healthy(0),
            remote_uris: Arc::default(),
        }
    }

    fn with_remote(connector: Arc<MockConnector>) -> Self {
        Self {
            extension: None,
            remote: connector,
            remote_uris: Arc::default(),
        }
    }

    /// Handle to the URIs this provider was asked to connect to,
    /// usable after the provider moves into a session.
    fn uri_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.remote_uris)
    }
}

impl ConnectorProvider for MockProvider {
    fn extension(&self) -> Option<Arc<dyn WalletConnector>> {
        self.extension
            .clone()
            .map(|c| c as Arc<dyn WalletConnector>)
    }

    fn remote(
        &self,
        uri: &str,
    ) -> Result<Arc<dyn WalletConnector>, WalletError> {
        self.remote_uris.lock().unwrap().push(uri.to_string());
        Ok(Arc::clone(&self.remote) as Arc<dyn WalletConnector>)
    }
}

fn config(
    method: WalletMethod,
    remote_uri: Option<&str>,
    payment_address: Option<&str>,
) -> WalletConfig {
    WalletConfig {
        remote_uri: remote_uri.map(str::to_string),
        payment_address: payment_address.map(str::to_string),
        method,
    }
}

// ---------------------------------------------------------------------------
// Connecting
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_connect_without_config_is_configuration_missing() {
    let mut session =
        WalletSession::new(MockProvider::without_extension());

    let err = session.connect().await.unwrap_err();

    assert!(matches!(err, WalletError::ConfigurationMissing(_)));
    assert_eq!(session.phase(), WalletPhase::Disconnected);
    assert!(session.last_error().is_some());
}

#[tokio::test]
async fn test_connect_extension_enables_backend() {
    let connector = MockConnector::healthy(21_000);
    let mut session = WalletSession::new(MockProvider::with_extension(
        Arc::clone(&connector),
    ));
    session.set_config(Some(config(WalletMethod::Extension, None, None)));

    session.connect().await.unwrap();

    assert_eq!(session.phase(), WalletPhase::Connected);
    assert_eq!(connector.enable_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_connect_extension_absent_is_provider_unavailable() {
    let mut session =
        WalletSession::new(MockProvider::without_extension());
    session.set_config(Some(config(WalletMethod::Extension, None, None)));

    let err = session.connect().await.unwrap_err();

    assert!(matches!(err, WalletError::ProviderUnavailable(_)));
    assert_eq!(session.phase(), WalletPhase::Disconnected);
}

#[tokio::test]
async fn test_connect_remote_builds_connector_from_uri() {
    let connector = MockConnector::healthy(0);
    let provider = MockProvider::with_remote(Arc::clone(&connector));
    let uri_log = provider.uri_log();
    let uri = "nostr+walletconnect://b889?secret=71a8";
    let mut session = WalletSession::new(provider);
    session.set_config(Some(config(WalletMethod::Remote, Some(uri), None)));

    session.connect().await.unwrap();

    assert_eq!(session.phase(), WalletPhase::Connected);
    assert_eq!(connector.enable_calls.load(Ordering::SeqCst), 1);
    assert_eq!(*uri_log.lock().unwrap(), vec![uri.to_string()]);
}

#[tokio::test]
async fn test_connect_remote_without_uri_is_configuration_missing() {
    let mut session =
        WalletSession::new(MockProvider::without_extension());
    session.set_config(Some(config(WalletMethod::Remote, None, None)));

    let err = session.connect().await.unwrap_err();
    assert!(matches!(err, WalletError::ConfigurationMissing(_)));
}

// ---------------------------------------------------------------------------
// Manual method
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_connect_manual_without_address_is_configuration_missing() {
    let mut session =
        WalletSession::new(MockProvider::without_extension());
    session.set_config(Some(config(WalletMethod::Manual, None, None)));

    let err = session.connect().await.unwrap_err();

    assert!(matches!(err, WalletError::ConfigurationMissing(_)));
    assert_eq!(session.phase(), WalletPhase::Disconnected);
}

#[tokio::test]
async fn test_connect_manual_with_address_never_calls_backend() {
    let extension = MockConnector::healthy(0);
    let mut session = WalletSession::new(MockProvider::with_extension(
        Arc::clone(&extension),
    ));
    session.set_config(Some(config(
        WalletMethod::Manual,
        None,
        Some("rider@pay.example"),
    )));

    session.connect().await.unwrap();

    assert_eq!(session.phase(), WalletPhase::Connected);
    // Logically connected: no handshake with any backend.
    assert_eq!(extension.total_calls(), 0);
}

#[tokio::test]
async fn test_manual_balance_is_always_unknown() {
    let mut session =
        WalletSession::new(MockProvider::without_extension());
    session.set_config(Some(config(
        WalletMethod::Manual,
        None,
        Some("rider@pay.example"),
    )));
    session.connect().await.unwrap();

    assert_eq!(session.balance().await, None);
    assert_eq!(session.cached_balance(), None);
    // Not an error: "unknown" is the normal manual answer.
    assert!(session.last_error().is_none());
}

#[tokio::test]
async fn test_manual_invoice_operations_are_unsupported() {
    let mut session =
        WalletSession::new(MockProvider::without_extension());
    session.set_config(Some(config(
        WalletMethod::Manual,
        None,
        Some("rider@pay.example"),
    )));
    session.connect().await.unwrap();

    let err = session.make_invoice(1000, "seat").await.unwrap_err();
    assert!(matches!(err, WalletError::UnsupportedOperation(_)));

    let err = session.pay_invoice("lnbc1...").await.unwrap_err();
    assert!(matches!(err, WalletError::UnsupportedOperation(_)));
}

#[tokio::test]
async fn test_auto_connect_manual_with_address() {
    let mut session =
        WalletSession::new(MockProvider::without_extension());
    session.set_config(Some(config(
        WalletMethod::Manual,
        None,
        Some("rider@pay.example"),
    )));

    assert!(session.auto_connect());
    assert_eq!(session.phase(), WalletPhase::Connected);
}

#[tokio::test]
async fn test_auto_connect_requires_manual_method_and_address() {
    let mut session =
        WalletSession::new(MockProvider::without_extension());

    // No config at all.
    assert!(!session.auto_connect());

    // Manual without an address.
    session.set_config(Some(config(WalletMethod::Manual, None, None)));
    assert!(!session.auto_connect());

    // Extension method never auto-connects.
    session.set_config(Some(config(WalletMethod::Extension, None, None)));
    assert!(!session.auto_connect());

    assert_eq!(session.phase(), WalletPhase::Disconnected);
}

// ---------------------------------------------------------------------------
// Balance and payment operations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_balance_delegates_and_caches() {
    let connector = MockConnector::healthy(42_000);
    let mut session = WalletSession::new(MockProvider::with_extension(
        Arc::clone(&connector),
    ));
    session.set_config(Some(config(WalletMethod::Extension, None, None)));
    session.connect().await.unwrap();

    assert_eq!(session.balance().await, Some(42_000));
    assert_eq!(session.cached_balance(), Some(42_000));
    assert_eq!(connector.balance_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_balance_backend_failure_is_unknown_not_error() {
    let connector = MockConnector::failing_balance("node offline");
    let mut session = WalletSession::new(MockProvider::with_extension(
        Arc::clone(&connector),
    ));
    session.set_config(Some(config(WalletMethod::Extension, None, None)));
    session.connect().await.unwrap();

    assert_eq!(session.balance().await, None);
    assert!(session
        .last_error()
        .is_some_and(|e| e.contains("node offline")));
}

#[tokio::test]
async fn test_balance_when_disconnected_is_unknown() {
    let mut session =
        WalletSession::new(MockProvider::without_extension());
    assert_eq!(session.balance().await, None);
}

#[tokio::test]
async fn test_invoice_operations_delegate_when_connected() {
    let connector = MockConnector::healthy(0);
    let mut session = WalletSession::new(MockProvider::with_extension(
        Arc::clone(&connector),
    ));
    session.set_config(Some(config(WalletMethod::Extension, None, None)));
    session.connect().await.unwrap();

    let invoice =
        session.make_invoice(5000, "ride seat").await.unwrap();
    assert_eq!(invoice, "lnbc-mock-ride seat");
    session.pay_invoice(&invoice).await.unwrap();
}

#[tokio::test]
async fn test_invoice_operations_require_connection() {
    let mut session =
        WalletSession::new(MockProvider::without_extension());
    session.set_config(Some(config(WalletMethod::Extension, None, None)));

    let err = session.make_invoice(1000, "seat").await.unwrap_err();
    assert!(matches!(err, WalletError::ProviderUnavailable(_)));
}

#[tokio::test]
async fn test_disconnect_clears_session_state() {
    let connector = MockConnector::healthy(42_000);
    let mut session = WalletSession::new(MockProvider::with_extension(
        Arc::clone(&connector),
    ));
    session.set_config(Some(config(WalletMethod::Extension, None, None)));
    session.connect().await.unwrap();
    session.balance().await;

    session.disconnect();

    assert_eq!(session.phase(), WalletPhase::Disconnected);
    assert_eq!(session.cached_balance(), None);
    assert!(session.last_error().is_none());
    // Configuration survives a disconnect.
    assert!(session.config().is_some());
}
