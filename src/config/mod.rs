//! Configuration Module
//!
//! Handles connection configuration loading and validation.

pub mod connection;
pub mod loader;
pub mod set;

pub use connection::{ConfigurationRecord, Driver};
pub use loader::ConfigLoader;
pub use set::{ConfigSet, DEFAULT_REQUEST_TIMEOUT};
