//! Application state for the HRM payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::{Arc, Mutex};

use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::store::InMemoryStore;

/// Shared application state.
///
/// Holds the loaded configuration and the store. Every operation runs
/// with the store locked, so requests are applied one at a time.
#[derive(Clone)]
pub struct AppState {
    /// The loaded engine configuration.
    config: Arc<ConfigLoader>,
    /// The store seeded from the configuration.
    store: Arc<Mutex<InMemoryStore>>,
}

impl AppState {
    /// Creates the application state with a store seeded from `config`.
    pub fn new(config: ConfigLoader) -> Self {
        let store = InMemoryStore::from_config(config.config());
        Self::with_store(config, store)
    }

    /// Creates the application state around an existing store.
    pub fn with_store(config: ConfigLoader, store: InMemoryStore) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Runs `operation` with exclusive access to the store.
    pub fn with_store_mut<T>(
        &self,
        operation: impl FnOnce(&mut InMemoryStore) -> EngineResult<T>,
    ) -> EngineResult<T> {
        let mut store = self.store.lock().map_err(|_| EngineError::Storage {
            message: "store lock poisoned".to_string(),
        })?;
        operation(&mut store)
    }
}
