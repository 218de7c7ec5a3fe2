//! Credential Resolution
//!
//! Picks the connection a client should be built from.

use crate::config::{ConfigSet, ConfigurationRecord};
use crate::router::counter::RotationCounter;
use crate::router::store::CounterStore;
use std::sync::Arc;

/// Resolves the connection to use, rotating when polling is enabled
#[derive(Clone)]
pub struct CredentialRotator {
    store: Arc<dyn CounterStore>,
}

impl CredentialRotator {
    /// Create a rotator persisting its cursors in `store`
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self { store }
    }

    /// Resolve a connection for `default_name`
    ///
    /// Without polling this is a plain lookup by name. With polling,
    /// `default_name` selects the rotation group: every connection whose
    /// driver tag equals it, in configuration order. A single match is
    /// returned as-is without touching the store; two or more rotate.
    ///
    /// `None` means no credentials are configured for this name.
    pub fn resolve(&self, default_name: &str, config: &ConfigSet) -> Option<ConfigurationRecord> {
        if !config.polling {
            tracing::debug!(connection = default_name, "Resolving connection by name");
            return config.connection(default_name).cloned();
        }

        let candidates: Vec<&ConfigurationRecord> = config
            .connections
            .values()
            .filter(|record| record.driver.as_str() == default_name)
            .collect();

        tracing::debug!(
            group = default_name,
            candidates = candidates.len(),
            "Resolving connection by rotation"
        );

        match candidates.as_slice() {
            [] => None,
            [only] => Some((*only).clone()),
            _ => RotationCounter::new(self.store.as_ref())
                .next_index(&candidates)
                .map(|(_, record)| record.clone()),
        }
    }

    /// Resolve using the set's own `default`
    pub fn resolve_default(&self, config: &ConfigSet) -> Option<ConfigurationRecord> {
        self.resolve(&config.default, config)
    }
}

impl std::fmt::Debug for CredentialRotator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRotator").finish_non_exhaustive()
    }
}
