// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types and conversion logic.
//!
//! This module holds the configuration value tree, the TOML profile document,
//! the registry connection descriptor and the crate's error type. It has no
//! knowledge of HTTP or of any particular registry backend.

pub mod config_value;
pub mod document;
pub mod errors;
pub mod registry_config;

// Re-export commonly used types
pub use config_value::{ConfigMap, ConfigValue};
pub use document::ProfileDocument;
pub use errors::{BoxError, ProfileError, Result};
pub use registry_config::{RegistryConfig, RegistryKind};
