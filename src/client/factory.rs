//! Client Factory
//!
//! Builds [`OpenAiClient`]s from a [`ConfigSet`], resolving (and rotating)
//! credentials on the way.

use crate::client::http::OpenAiClient;
use crate::config::{ConfigSet, Driver};
use crate::error::{BridgeError, Result};
use crate::router::{CounterStore, CredentialRotator, FileCounterStore};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Builds clients for the configured default connection
pub struct ClientFactory {
    config: ConfigSet,
    rotator: CredentialRotator,

    /// Client handed out by [`ClientFactory::client`]
    cached: Mutex<Option<Arc<OpenAiClient>>>,
}

impl ClientFactory {
    /// Create a factory keeping rotation counters under the config's storage root
    pub fn new(config: ConfigSet) -> Self {
        let store = Arc::new(FileCounterStore::new(config.storage_root()));
        Self {
            config,
            rotator: CredentialRotator::new(store),
            cached: Mutex::new(None),
        }
    }

    /// Use a different counter store
    pub fn with_store(mut self, store: Arc<dyn CounterStore>) -> Self {
        self.rotator = CredentialRotator::new(store);
        self
    }

    pub fn config(&self) -> &ConfigSet {
        &self.config
    }

    /// Build a new client, resolving credentials again
    ///
    /// Fails with [`BridgeError::ConfigMissing`] when no connection resolves
    /// or the resolved connection carries no API key.
    pub fn make(&self) -> Result<OpenAiClient> {
        let connection = self
            .rotator
            .resolve_default(&self.config)
            .ok_or(BridgeError::ConfigMissing)?;
        let timeout = Duration::from_secs(self.config.request_timeout);
        let driver = connection.driver.clone();

        let client = match &driver {
            Driver::AzureOpenAi => OpenAiClient::azure(connection, timeout)?,
            Driver::OpenAi | Driver::Other(_) => OpenAiClient::openai(connection, timeout)?,
        };

        tracing::info!(
            default = %self.config.default,
            driver = %driver,
            base_url = client.base_url(),
            "Built OpenAI client"
        );

        Ok(client)
    }

    /// Shared client, built on first call
    ///
    /// Later calls return the same instance without resolving again. A failed
    /// build is not cached.
    pub fn client(&self) -> Result<Arc<OpenAiClient>> {
        let mut cached = self.cached.lock();
        if let Some(client) = cached.as_ref() {
            return Ok(Arc::clone(client));
        }

        let client = Arc::new(self.make()?);
        *cached = Some(Arc::clone(&client));
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigurationRecord;
    use crate::router::MemoryCounterStore;
    use tempfile::TempDir;

    fn factory(config: ConfigSet) -> ClientFactory {
        ClientFactory::new(config).with_store(Arc::new(MemoryCounterStore::new()))
    }

    #[test]
    fn test_make_default_connection() {
        let config = ConfigSet::new("prod").with_connection(
            "prod",
            ConfigurationRecord::new(Driver::OpenAi)
                .with_api_key("kp")
                .with_organization("org"),
        );

        let client = factory(config).make().unwrap();
        assert!(!client.is_azure());
        assert_eq!(client.connection().api_key(), Some("kp"));
        assert_eq!(client.driver(), &Driver::OpenAi);
    }

    #[test]
    fn test_make_azure_connection() {
        let config = ConfigSet::new("azure").with_connection(
            "azure",
            ConfigurationRecord::new(Driver::AzureOpenAi)
                .with_api_key("az")
                .with_field("base_url", "https://example.openai.azure.com")
                .with_field("deployment", "gpt-4o"),
        );

        let client = factory(config).make().unwrap();
        assert!(client.is_azure());
    }

    #[test]
    fn test_unknown_driver_builds_standard_client() {
        let config = ConfigSet::new("prod")
            .with_connection("prod", ConfigurationRecord::new("x").with_api_key("kp"));

        let client = factory(config).make().unwrap();
        assert!(!client.is_azure());
        assert_eq!(client.driver().as_str(), "x");
    }

    #[test]
    fn test_missing_default_is_config_missing() {
        let config = ConfigSet::new("prod")
            .with_connection("staging", ConfigurationRecord::new("x").with_api_key("ks"));

        let err = factory(config).make().unwrap_err();
        assert!(err.is_config_missing());
    }

    #[test]
    fn test_missing_key_is_config_missing() {
        let config = ConfigSet::new("prod")
            .with_connection("prod", ConfigurationRecord::new(Driver::OpenAi));

        let err = factory(config).make().unwrap_err();
        assert!(err.is_config_missing());
    }

    #[test]
    fn test_empty_rotation_group_is_config_missing() {
        let config = ConfigSet::new("open_ai")
            .with_polling(true)
            .with_connection("a", ConfigurationRecord::new("x").with_api_key("k1"));

        let err = factory(config).make().unwrap_err();
        assert!(err.is_config_missing());
    }

    #[test]
    fn test_make_rotates() {
        let config = ConfigSet::new("open_ai")
            .with_polling(true)
            .with_connection("a", ConfigurationRecord::new(Driver::OpenAi).with_api_key("k1"))
            .with_connection("b", ConfigurationRecord::new(Driver::OpenAi).with_api_key("k2"));
        let factory = factory(config);

        let keys: Vec<_> = (0..3)
            .map(|_| factory.make().unwrap().connection().api_key.clone().unwrap())
            .collect();
        assert_eq!(keys, vec!["k1", "k2", "k1"]);
    }

    #[test]
    fn test_client_is_cached() {
        let store = Arc::new(MemoryCounterStore::new());
        let config = ConfigSet::new("open_ai")
            .with_polling(true)
            .with_connection("a", ConfigurationRecord::new(Driver::OpenAi).with_api_key("k1"))
            .with_connection("b", ConfigurationRecord::new(Driver::OpenAi).with_api_key("k2"));
        let factory = ClientFactory::new(config).with_store(store.clone());

        let first = factory.client().unwrap();
        let second = factory.client().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.connection().api_key(), Some("k1"));

        // Resolved once, so the counter advanced once
        assert_eq!(store.len(), 1);
        let a = factory.config().connection("a").unwrap();
        let b = factory.config().connection("b").unwrap();
        let key = crate::router::storage_key(&[a, b]).unwrap();
        assert_eq!(store.get(&key), Some(1));
    }

    #[test]
    fn test_failed_build_not_cached() {
        let factory = factory(ConfigSet::new("prod"));

        assert!(factory.client().is_err());
        assert!(factory.client().is_err());
    }

    #[test]
    fn test_default_store_uses_storage_path() {
        let root = TempDir::new().unwrap();
        let config = ConfigSet::new(Driver::OPEN_AI)
            .with_polling(true)
            .with_storage_path(root.path())
            .with_connection("a", ConfigurationRecord::new(Driver::OpenAi).with_api_key("k1"))
            .with_connection("b", ConfigurationRecord::new(Driver::OpenAi).with_api_key("k2"));

        ClientFactory::new(config).make().unwrap();

        let entries = std::fs::read_dir(root.path().join("openai_token"))
            .unwrap()
            .count();
        assert_eq!(entries, 1);
    }
}
