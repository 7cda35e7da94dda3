// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing registry backends and the HTTP surface.
//!
//! This module contains concrete implementations of the ports: one
//! `RegistryClient` per supported backend, the [`BackendFactory`] that picks
//! one from a `RegistryConfig`, and the axum handlers exposing the service.

#[cfg(feature = "etcd")]
pub mod etcd;
pub mod http;
pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;

// Re-export adapters based on feature flags
#[cfg(feature = "etcd")]
pub use etcd::EtcdRegistry;
pub use http::router;
pub use memory::{MemoryRegistry, MemoryRegistryClient};
#[cfg(feature = "redis")]
pub use redis::RedisRegistry;

use crate::domain::{BoxError, RegistryConfig, RegistryKind};
use crate::ports::{RegistryClient, RegistryClientFactory};
use async_trait::async_trait;

/// Client factory that dispatches on the configured [`RegistryKind`].
///
/// Backends that were not compiled in fail at connection time. The `memory`
/// backend is shared by every client this factory opens.
#[derive(Debug, Clone, Default)]
pub struct BackendFactory {
    memory: MemoryRegistry,
}

impl BackendFactory {
    /// Creates a factory with a fresh in-process registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a factory whose `memory` backend is the given registry.
    pub fn with_memory(memory: MemoryRegistry) -> Self {
        Self { memory }
    }

    /// Returns the in-process registry used by the `memory` backend.
    pub fn memory(&self) -> &MemoryRegistry {
        &self.memory
    }
}

#[async_trait]
impl RegistryClientFactory for BackendFactory {
    async fn new_client(
        &self,
        config: &RegistryConfig,
    ) -> std::result::Result<Box<dyn RegistryClient>, BoxError> {
        match config.kind {
            RegistryKind::Memory => Ok(Box::new(self.memory.client(config.configuration_key()))),
            #[cfg(feature = "etcd")]
            RegistryKind::Etcd => Ok(Box::new(EtcdRegistry::connect(config).await?)),
            #[cfg(feature = "redis")]
            RegistryKind::Redis => Ok(Box::new(RedisRegistry::connect(config).await?)),
            #[allow(unreachable_patterns)]
            other => Err(format!(
                "registry type '{}' is not enabled in this build (enable the '{}' feature)",
                other, other
            )
            .into()),
        }
    }
}
