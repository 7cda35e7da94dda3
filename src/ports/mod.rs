// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) that define how the
//! service reaches a configuration registry. They are implemented by the
//! backend adapters in the adapters layer.

pub mod registry;

// Re-export commonly used types
pub use registry::{RegistryClient, RegistryClientFactory};
