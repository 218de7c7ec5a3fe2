//! Connection Configuration
//!
//! Defines the schema of a single named OpenAI connection.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix marking an `api_key` that should be read from the environment
const ENV_PREFIX: &str = "env:";

/// Client backend selected by a connection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Driver {
    /// api.openai.com (or a compatible endpoint)
    OpenAi,

    /// Azure OpenAI deployment
    AzureOpenAi,

    /// Any other tag; built as a standard client
    Other(String),
}

impl Driver {
    pub const OPEN_AI: &'static str = "open_ai";
    pub const AZURE_OPEN_AI: &'static str = "azure_open_ai";

    /// The tag as written in configuration
    pub fn as_str(&self) -> &str {
        match self {
            Driver::OpenAi => Self::OPEN_AI,
            Driver::AzureOpenAi => Self::AZURE_OPEN_AI,
            Driver::Other(tag) => tag,
        }
    }
}

impl From<String> for Driver {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            Self::OPEN_AI => Driver::OpenAi,
            Self::AZURE_OPEN_AI => Driver::AzureOpenAi,
            _ => Driver::Other(tag),
        }
    }
}

impl From<&str> for Driver {
    fn from(tag: &str) -> Self {
        Driver::from(tag.to_string())
    }
}

impl From<Driver> for String {
    fn from(driver: Driver) -> Self {
        match driver {
            Driver::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for a single named connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationRecord {
    /// Backend tag; also the rotation group when polling is enabled
    pub driver: Driver,

    /// API key, or `env:NAME` before expansion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// OpenAI organization id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,

    /// Driver-specific settings (`base_url`, `deployment`, `api_version`, ...)
    #[serde(flatten)]
    pub fields: IndexMap<String, serde_json::Value>,
}

impl ConfigurationRecord {
    /// Create a record with only a driver set
    pub fn new(driver: impl Into<Driver>) -> Self {
        Self {
            driver: driver.into(),
            api_key: None,
            organization: None,
            fields: IndexMap::new(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields
            .insert(name.into(), serde_json::Value::String(value.into()));
        self
    }

    /// Get a driver-specific field if it is a string
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|v| v.as_str())
    }

    /// The API key, treating an empty string as absent
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }

    /// Replace an `env:NAME` api key with the variable's value
    ///
    /// An unset variable leaves the key absent.
    pub fn expand_env(&mut self) {
        let Some(var) = self
            .api_key
            .as_deref()
            .and_then(|k| k.strip_prefix(ENV_PREFIX))
            .map(str::to_string)
        else {
            return;
        };

        self.api_key = std::env::var(&var).ok();
        if self.api_key.is_none() {
            tracing::warn!(var = %var, "API key environment variable is not set");
        }
    }
}
