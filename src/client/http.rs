//! OpenAI Client
//!
//! A configured `reqwest` client bound to one resolved connection.

use crate::config::{ConfigurationRecord, Driver};
use crate::error::{BridgeError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use std::time::Duration;

/// Default base URL for standard connections
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Azure API version used when a connection does not set `api_version`
pub const DEFAULT_AZURE_API_VERSION: &str = "2024-02-01";

const OPENAI_ORGANIZATION: &str = "openai-organization";
const OPENAI_BETA: &str = "openai-beta";
const AZURE_API_KEY: &str = "api-key";

/// Which API flavour the client talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientKind {
    /// api.openai.com style: bearer auth, plain paths
    OpenAi,

    /// Azure deployment: `api-key` auth, `api-version` query on every call
    Azure { api_version: String },
}

/// Ready-to-use API client
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    /// Inner reqwest client with auth headers and timeout applied
    http: Client,

    /// Base URL without trailing slash
    base_url: String,

    kind: ClientKind,

    /// Connection the client was built from
    connection: ConfigurationRecord,
}

impl OpenAiClient {
    /// Build a standard client
    pub fn openai(connection: ConfigurationRecord, timeout: Duration) -> Result<Self> {
        let api_key = connection.api_key().ok_or(BridgeError::ConfigMissing)?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            sensitive(&format!("Bearer {}", api_key), "Authorization")?,
        );
        if let Some(organization) = &connection.organization {
            headers.insert(
                HeaderName::from_static(OPENAI_ORGANIZATION),
                HeaderValue::from_str(organization)
                    .map_err(|_| BridgeError::InvalidHeader("OpenAI-Organization".to_string()))?,
            );
        }
        headers.insert(
            HeaderName::from_static(OPENAI_BETA),
            HeaderValue::from_static("assistants=v1"),
        );

        let base_url = connection
            .field("base_url")
            .unwrap_or(OPENAI_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            http: build_http(headers, timeout)?,
            base_url,
            kind: ClientKind::OpenAi,
            connection,
        })
    }

    /// Build an Azure OpenAI client
    pub fn azure(connection: ConfigurationRecord, timeout: Duration) -> Result<Self> {
        let api_key = connection.api_key().ok_or(BridgeError::ConfigMissing)?;
        let endpoint = required_field(&connection, "base_url")?;
        let deployment = required_field(&connection, "deployment")?;
        let api_version = connection
            .field("api_version")
            .unwrap_or(DEFAULT_AZURE_API_VERSION)
            .to_string();

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(AZURE_API_KEY),
            sensitive(api_key, "api-key")?,
        );

        let base_url = format!(
            "{}/openai/deployments/{}",
            endpoint.trim_end_matches('/'),
            deployment
        );

        Ok(Self {
            http: build_http(headers, timeout)?,
            base_url,
            kind: ClientKind::Azure { api_version },
            connection,
        })
    }

    /// Get the inner HTTP client
    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn kind(&self) -> &ClientKind {
        &self.kind
    }

    pub fn is_azure(&self) -> bool {
        matches!(self.kind, ClientKind::Azure { .. })
    }

    /// The connection this client was built from
    pub fn connection(&self) -> &ConfigurationRecord {
        &self.connection
    }

    pub fn driver(&self) -> &Driver {
        &self.connection.driver
    }

    /// Full URL for an API path such as `chat/completions`
    pub fn endpoint(&self, path: &str) -> String {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));

        match &self.kind {
            ClientKind::OpenAi => url,
            ClientKind::Azure { api_version } => {
                let sep = if url.contains('?') { '&' } else { '?' };
                format!("{}{}api-version={}", url, sep, api_version)
            }
        }
    }
}

fn build_http(headers: HeaderMap, timeout: Duration) -> Result<Client> {
    Ok(Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(10)
        .build()?)
}

fn sensitive(value: &str, name: &str) -> Result<HeaderValue> {
    let mut value =
        HeaderValue::from_str(value).map_err(|_| BridgeError::InvalidHeader(name.to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}

fn required_field<'a>(connection: &'a ConfigurationRecord, name: &str) -> Result<&'a str> {
    connection
        .field(name)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            BridgeError::Config(format!(
                "Connection with driver '{}' requires '{}'",
                connection.driver, name
            ))
        })
}
