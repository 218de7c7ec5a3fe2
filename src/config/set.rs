//! Configuration Set
//!
//! The top-level `openai.json` document: global settings plus named
//! connections, kept in file order.

use crate::config::connection::ConfigurationRecord;
use crate::error::BridgeError;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::PathBuf;

/// Default HTTP timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawConfigSet")]
pub struct ConfigSet {
    /// Name of the default connection, or the driver group to rotate within
    pub default: String,

    /// Rotate among connections instead of using `default` directly
    pub polling: bool,

    /// HTTP timeout in seconds for built clients
    pub request_timeout: u64,

    /// Root directory for the rotation counters
    pub storage_path: Option<PathBuf>,

    /// Connections keyed by name, in insertion order
    pub connections: IndexMap<String, ConfigurationRecord>,
}

/// On-disk shape: settings and connections share one flat object
#[derive(Deserialize)]
struct RawConfigSet {
    #[serde(default)]
    default: String,

    #[serde(default)]
    polling: bool,

    #[serde(default = "default_request_timeout")]
    request_timeout: u64,

    #[serde(default)]
    storage_path: Option<PathBuf>,

    #[serde(flatten)]
    entries: IndexMap<String, serde_json::Value>,
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT
}

impl TryFrom<RawConfigSet> for ConfigSet {
    type Error = BridgeError;

    fn try_from(raw: RawConfigSet) -> Result<Self, Self::Error> {
        let mut connections = IndexMap::new();

        for (name, value) in raw.entries {
            // Only objects tagged with a driver are connections
            let is_connection = value
                .as_object()
                .and_then(|obj| obj.get("driver"))
                .is_some_and(|driver| !driver.is_null());
            if !is_connection {
                tracing::trace!(entry = %name, "Skipping non-connection config entry");
                continue;
            }

            let record: ConfigurationRecord = serde_json::from_value(value).map_err(|e| {
                BridgeError::Config(format!("Invalid connection '{}': {}", name, e))
            })?;
            connections.insert(name, record);
        }

        Ok(Self {
            default: raw.default,
            polling: raw.polling,
            request_timeout: raw.request_timeout,
            storage_path: raw.storage_path,
            connections,
        })
    }
}

impl ConfigSet {
    /// Create an empty set with the given default connection name
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            polling: false,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            storage_path: None,
            connections: IndexMap::new(),
        }
    }

    pub fn with_polling(mut self, polling: bool) -> Self {
        self.polling = polling;
        self
    }

    pub fn with_request_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout = seconds;
        self
    }

    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = Some(path.into());
        self
    }

    /// Append a connection (replacing one with the same name in place)
    pub fn with_connection(mut self, name: impl Into<String>, record: ConfigurationRecord) -> Self {
        self.connections.insert(name.into(), record);
        self
    }

    /// Look up a connection by name
    pub fn connection(&self, name: &str) -> Option<&ConfigurationRecord> {
        self.connections.get(name)
    }

    /// Directory under which rotation counters are kept
    pub fn storage_root(&self) -> PathBuf {
        if let Some(path) = &self.storage_path {
            return path.clone();
        }

        dirs::data_local_dir()
            .map(|dir| dir.join("openai-bridge"))
            .unwrap_or_else(|| PathBuf::from("storage"))
    }

    /// Expand `env:NAME` API keys on every connection
    pub(crate) fn expand_env(&mut self) {
        for record in self.connections.values_mut() {
            record.expand_env();
        }
    }
}
