// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deploys and downloads service configuration profiles through a remote registry.
//!
//! A caller posts a configuration as an arbitrary JSON object; the crate turns
//! it into a TOML document and stores it in a key/value registry under the
//! service's key. Downloading reads the document back and returns it as a
//! `configuration.toml` attachment.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types and conversion (`ConfigValue`, `ProfileDocument`, `RegistryConfig`, errors)
//! - **Ports**: Trait definitions for registry access (`RegistryClient`, `RegistryClientFactory`)
//! - **Adapters**: Registry backends (etcd, Redis, in-memory) and the axum HTTP handlers
//! - **Service**: The connector and the deploy/download operations
//!
//! # Feature Flags
//!
//! - `yaml`: Load server settings from a YAML file (default)
//! - `env`: Override server settings from `PROFILE_SYNC_*` environment variables (default)
//! - `cli`: Build the `profile-sync` server binary (default)
//! - `etcd`: Enable the etcd registry backend
//! - `redis`: Enable the Redis registry backend
//! - `remote`: Enable all remote backends (etcd + redis)
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use profile_sync::prelude::*;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! let registry = RegistryConfig {
//!     kind: RegistryKind::Memory,
//!     ..Default::default()
//! };
//! let service = ProfileService::new(registry, Arc::new(BackendFactory::new()));
//!
//! service.deploy(br#"{"Service": {"Port": 48095}}"#).await?;
//! let text = service.download().await?;
//! assert!(text.contains("[Service]"));
//! assert!(text.contains("Port = 48095"));
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;
pub mod settings;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::adapters::{router, BackendFactory, MemoryRegistry};
    pub use crate::domain::{
        ConfigMap, ConfigValue, ProfileDocument, ProfileError, RegistryConfig, RegistryKind,
        Result,
    };
    pub use crate::ports::{RegistryClient, RegistryClientFactory};
    pub use crate::service::{ProfileService, RegistryConnector};
    pub use crate::settings::Settings;

    // Re-export backends based on feature flags
    #[cfg(feature = "etcd")]
    pub use crate::adapters::EtcdRegistry;
    #[cfg(feature = "redis")]
    pub use crate::adapters::RedisRegistry;
}
