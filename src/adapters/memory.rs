// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process registry adapter.
//!
//! This module provides a registry that lives inside the process. It is meant
//! for local development and for tests: it can be switched to a not-alive
//! state and seeded with values of any shape.

use crate::domain::{ConfigValue, ProfileDocument, ProfileError, Result};
use crate::ports::RegistryClient;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

#[derive(Debug)]
struct Shared {
    entries: RwLock<HashMap<String, ConfigValue>>,
    alive: AtomicBool,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

/// An in-process configuration registry.
///
/// Cloning the registry yields another handle to the same entries, so clients
/// opened by different requests see each other's writes.
///
/// # Examples
///
/// ```rust
/// use profile_sync::adapters::MemoryRegistry;
///
/// let registry = MemoryRegistry::new();
/// let client = registry.client("config/app");
/// assert!(registry.get("config/app").is_none());
/// # drop(client);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryRegistry {
    shared: Arc<Shared>,
}

impl MemoryRegistry {
    /// Creates an empty, alive registry.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                entries: RwLock::new(HashMap::new()),
                alive: AtomicBool::new(true),
                reads: AtomicUsize::new(0),
                writes: AtomicUsize::new(0),
            }),
        }
    }

    /// Opens a client bound to `key`.
    pub fn client(&self, key: impl Into<String>) -> MemoryRegistryClient {
        MemoryRegistryClient {
            shared: Arc::clone(&self.shared),
            key: key.into(),
        }
    }

    /// Marks the registry as alive or not; clients report this from `is_alive`.
    pub fn set_alive(&self, alive: bool) {
        self.shared.alive.store(alive, Ordering::SeqCst);
    }

    /// Stores a raw value under `key`, bypassing conversion.
    pub fn seed(&self, key: impl Into<String>, value: ConfigValue) {
        if let Ok(mut entries) = self.shared.entries.write() {
            entries.insert(key.into(), value);
        }
    }

    /// Returns the raw value stored under `key`.
    pub fn get(&self, key: &str) -> Option<ConfigValue> {
        self.shared
            .entries
            .read()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    /// Number of configuration reads served so far.
    pub fn reads(&self) -> usize {
        self.shared.reads.load(Ordering::SeqCst)
    }

    /// Number of configuration writes attempted so far.
    pub fn writes(&self) -> usize {
        self.shared.writes.load(Ordering::SeqCst)
    }
}

impl Default for MemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A client handle to a [`MemoryRegistry`], bound to one configuration key.
#[derive(Debug)]
pub struct MemoryRegistryClient {
    shared: Arc<Shared>,
    key: String,
}

fn poisoned(what: &str) -> String {
    format!("in-memory registry lock poisoned during {}", what)
}

#[async_trait]
impl RegistryClient for MemoryRegistryClient {
    fn backend(&self) -> &str {
        "memory"
    }

    async fn is_alive(&mut self) -> bool {
        self.shared.alive.load(Ordering::SeqCst)
    }

    async fn put_configuration(&mut self, document: &ProfileDocument, overwrite: bool) -> Result<()> {
        self.shared.writes.fetch_add(1, Ordering::SeqCst);
        let value = ConfigValue::Mapping(document.to_map()?);
        let mut entries = self
            .shared
            .entries
            .write()
            .map_err(|_| ProfileError::StoreWrite {
                message: poisoned("write"),
                source: None,
            })?;
        if overwrite || !entries.contains_key(&self.key) {
            entries.insert(self.key.clone(), value);
        } else {
            tracing::debug!("Keeping existing configuration at '{}'", self.key);
        }
        Ok(())
    }

    async fn get_configuration(&mut self) -> Result<ConfigValue> {
        self.shared.reads.fetch_add(1, Ordering::SeqCst);
        let entries = self
            .shared
            .entries
            .read()
            .map_err(|_| ProfileError::StoreRead {
                message: poisoned("read"),
                source: None,
            })?;
        entries
            .get(&self.key)
            .cloned()
            .ok_or_else(|| ProfileError::StoreRead {
                message: format!("No configuration stored at '{}'", self.key),
                source: None,
            })
    }
}
