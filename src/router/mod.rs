//! Router Module
//!
//! Connection resolution and round-robin credential rotation.

pub mod counter;
pub mod resolver;
pub mod store;

pub use counter::{storage_key, RotationCounter};
pub use resolver::CredentialRotator;
pub use store::{CounterStore, FileCounterStore, MemoryCounterStore};
