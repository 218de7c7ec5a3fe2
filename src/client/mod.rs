//! Client Module
//!
//! Client construction from resolved connections.

pub mod factory;
pub mod http;

pub use factory::ClientFactory;
pub use http::{ClientKind, OpenAiClient, DEFAULT_AZURE_API_VERSION, OPENAI_BASE_URL};
