// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the profile operations.
//!
//! This module wires the registry connector to the deploy and download
//! operations that the HTTP handlers expose.

pub mod connector;
pub mod profile_service;

// Re-export commonly used types
pub use connector::RegistryConnector;
pub use profile_service::{ProfileService, PROFILE_FILE_NAME};
