//! openai-bridge - OpenAI client bridge
//!
//! Resolves the configured default connection, optionally rotating across
//! several API keys with a cursor persisted on disk, and builds a
//! ready-to-use OpenAI or Azure OpenAI client from it.
//!
//! ```no_run
//! use openai_bridge::{ClientFactory, ConfigLoader};
//!
//! # fn main() -> openai_bridge::Result<()> {
//! let config = ConfigLoader::from_path("openai.json")?.into_config();
//! let factory = ClientFactory::new(config);
//! let client = factory.client()?;
//! println!("{}", client.endpoint("chat/completions"));
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod router;

pub use client::{ClientFactory, ClientKind, OpenAiClient};
pub use config::{ConfigLoader, ConfigSet, ConfigurationRecord, Driver};
pub use error::{BridgeError, Result};
pub use router::{CounterStore, CredentialRotator, FileCounterStore, MemoryCounterStore};

/// Load configuration from the default locations and build a client
pub fn client_from_env() -> Result<OpenAiClient> {
    let config = ConfigLoader::new()?.into_config();
    ClientFactory::new(config).make()
}

/// Resolve a connection for `default_name`, persisting rotation state under
/// the set's storage root
pub fn resolve(default_name: &str, config: &ConfigSet) -> Option<ConfigurationRecord> {
    let store = std::sync::Arc::new(FileCounterStore::new(config.storage_root()));
    CredentialRotator::new(store).resolve(default_name, config)
}
