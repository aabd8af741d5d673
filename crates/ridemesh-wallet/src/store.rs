//! Persistence for the wallet configuration.
//!
//! The config lives in whatever key-value storage the host application
//! provides, always under the same key. The [`ConfigStore`] trait is the
//! seam; [`MemoryConfigStore`] is the in-process implementation the tests
//! and the demo use.

use std::collections::HashMap;
use std::sync::Mutex;

use ridemesh_protocol::encode_profile_update;
use ridemesh_relay::{with_timeout, RelayClient, PUBLISH_TIMEOUT};

use crate::config::WalletConfig;
use crate::error::WalletError;

/// Storage key the wallet configuration is persisted under.
pub const CONFIG_KEY: &str = "wallet-config";

// ---------------------------------------------------------------------------
// ConfigStore
// ---------------------------------------------------------------------------

/// Key-value persistence seam for the wallet configuration.
///
/// Implementations store JSON strings; the (de)serialization happens
/// here so every store behaves identically.
pub trait ConfigStore: Send + Sync {
    /// Raw value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, WalletError>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), WalletError>;
    /// Removes the value stored under `key`.
    fn remove(&self, key: &str) -> Result<(), WalletError>;
}

/// Loads the persisted wallet configuration, if one exists.
pub fn load_config<S: ConfigStore>(
    store: &S,
) -> Result<Option<WalletConfig>, WalletError> {
    match store.get(CONFIG_KEY)? {
        Some(json) => serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| {
                WalletError::InvalidConfig(format!(
                    "stored wallet configuration is unreadable: {e}"
                ))
            }),
        None => Ok(None),
    }
}

/// Validates and persists the wallet configuration.
///
/// When `publish_profile` is set and the config carries a payment
/// address, the address is also published to the actor's profile record
/// so other users can pay them directly. Profile publication is
/// best-effort: a relay failure is warn-logged and does not undo the
/// local save.
pub async fn save_config<S: ConfigStore, R: RelayClient>(
    store: &S,
    relay: &R,
    config: &WalletConfig,
    publish_profile: bool,
) -> Result<(), WalletError> {
    config.validate()?;
    let json = serde_json::to_string(config).map_err(|e| {
        WalletError::InvalidConfig(format!(
            "wallet configuration is not serializable: {e}"
        ))
    })?;
    store.set(CONFIG_KEY, &json)?;
    tracing::info!(method = ?config.method, "wallet configuration saved");

    if publish_profile {
        if let Some(addr) = config.payment_address() {
            let result = with_timeout(
                PUBLISH_TIMEOUT,
                relay.publish(encode_profile_update(addr)),
            )
            .await;
            match result {
                Ok(event) => tracing::info!(
                    event = %event.id,
                    "payment address published to profile"
                ),
                Err(err) => tracing::warn!(
                    %err,
                    "profile publication failed, config saved locally"
                ),
            }
        }
    }

    Ok(())
}

/// Removes the persisted wallet configuration.
pub fn clear_config<S: ConfigStore>(
    store: &S,
) -> Result<(), WalletError> {
    store.remove(CONFIG_KEY)
}

// ---------------------------------------------------------------------------
// MemoryConfigStore
// ---------------------------------------------------------------------------

/// An in-process [`ConfigStore`].
#[derive(Default)]
pub struct MemoryConfigStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryConfigStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, key: &str) -> Result<Option<String>, WalletError> {
        Ok(self
            .values
            .lock()
            .map_err(|_| poisoned())?
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), WalletError> {
        self.values
            .lock()
            .map_err(|_| poisoned())?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), WalletError> {
        self.values.lock().map_err(|_| poisoned())?.remove(key);
        Ok(())
    }
}

fn poisoned() -> WalletError {
    WalletError::Backend("configuration store lock poisoned".to_string())
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WalletMethod;
    use ridemesh_protocol::{PubKey, KIND_PROFILE};
    use ridemesh_relay::MemoryRelay;

    fn manual_config() -> WalletConfig {
        WalletConfig {
            remote_uri: None,
            payment_address: Some("rider@pay.example".to_string()),
            method: WalletMethod::Manual,
        }
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let store = MemoryConfigStore::new();
        let relay = MemoryRelay::new(PubKey::from("pk"));
        let config = manual_config();

        save_config(&store, &relay, &config, false).await.unwrap();

        assert_eq!(load_config(&store).unwrap(), Some(config));
        assert!(relay.is_empty().await);
    }

    #[tokio::test]
    async fn test_save_invalid_config_persists_nothing() {
        let store = MemoryConfigStore::new();
        let relay = MemoryRelay::new(PubKey::from("pk"));
        let mut config = manual_config();
        config.payment_address = Some("bad address".to_string());

        let err = save_config(&store, &relay, &config, false)
            .await
            .unwrap_err();

        assert!(matches!(err, WalletError::InvalidConfig(_)));
        assert_eq!(load_config(&store).unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_with_publish_profile_emits_profile_event() {
        let store = MemoryConfigStore::new();
        let relay = MemoryRelay::new(PubKey::from("pk"));

        save_config(&store, &relay, &manual_config(), true)
            .await
            .unwrap();

        let events = relay.all_events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, KIND_PROFILE);
        assert!(events[0].content.contains("rider@pay.example"));
    }

    #[tokio::test]
    async fn test_save_publish_failure_keeps_local_config() {
        let store = MemoryConfigStore::new();
        let relay = MemoryRelay::new(PubKey::from("pk"));
        relay.fail_next_publish("relay down").await;

        save_config(&store, &relay, &manual_config(), true)
            .await
            .unwrap();

        assert_eq!(load_config(&store).unwrap(), Some(manual_config()));
        assert!(relay.is_empty().await);
    }

    #[test]
    fn test_clear_removes_stored_config() {
        let store = MemoryConfigStore::new();
        store.set(CONFIG_KEY, "{\"method\":\"manual\"}").unwrap();

        clear_config(&store).unwrap();

        assert_eq!(load_config(&store).unwrap(), None);
    }

    #[test]
    fn test_load_unreadable_value_is_an_error() {
        let store = MemoryConfigStore::new();
        store.set(CONFIG_KEY, "not json").unwrap();

        assert!(matches!(
            load_config(&store),
            Err(WalletError::InvalidConfig(_))
        ));
    }
}
