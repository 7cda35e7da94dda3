// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry client trait definitions.
//!
//! This module defines the ports through which the service talks to a remote
//! configuration registry: [`RegistryClientFactory`] opens a per-request
//! [`RegistryClient`] handle from a [`RegistryConfig`].

use crate::domain::{BoxError, ConfigValue, ProfileDocument, RegistryConfig, Result};
use async_trait::async_trait;

/// A short-lived handle to a configuration registry.
///
/// One handle is opened per request and dropped when the request finishes, so
/// implementations release their connection in `Drop` (or simply by owning it).
///
/// # Thread Safety
///
/// Implementations must be `Send` so a handle can be held across `.await`
/// points inside a request handler.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use profile_sync::domain::{ConfigMap, ConfigValue, ProfileDocument, Result};
/// use profile_sync::ports::RegistryClient;
///
/// struct EmptyRegistry;
///
/// #[async_trait]
/// impl RegistryClient for EmptyRegistry {
///     fn backend(&self) -> &str {
///         "empty"
///     }
///
///     async fn is_alive(&mut self) -> bool {
///         true
///     }
///
///     async fn put_configuration(
///         &mut self,
///         _document: &ProfileDocument,
///         _overwrite: bool,
///     ) -> Result<()> {
///         Ok(())
///     }
///
///     async fn get_configuration(&mut self) -> Result<ConfigValue> {
///         Ok(ConfigValue::Mapping(ConfigMap::new()))
///     }
/// }
/// ```
#[async_trait]
pub trait RegistryClient: Send {
    /// Returns the name of the registry backend, used in logs and errors.
    fn backend(&self) -> &str;

    /// Probes whether the registry is up and answering.
    async fn is_alive(&mut self) -> bool;

    /// Stores `document` as the service's full configuration.
    ///
    /// With `overwrite` set, any existing configuration is replaced. Without it,
    /// the document is only written when no configuration exists yet.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::StoreWrite` if the registry rejects the write or
    /// the connection drops.
    async fn put_configuration(&mut self, document: &ProfileDocument, overwrite: bool)
        -> Result<()>;

    /// Reads the service's full configuration.
    ///
    /// The value is returned as the registry produced it; callers check its
    /// shape before using it as a mapping.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::StoreRead` if the registry cannot be read or holds
    /// no configuration for the service.
    async fn get_configuration(&mut self) -> Result<ConfigValue>;
}

/// Creates registry client handles from a connection descriptor.
#[async_trait]
pub trait RegistryClientFactory: Send + Sync {
    /// Opens a new client handle for the registry described by `config`.
    ///
    /// Errors are returned raw; the connector wraps them with the backend name.
    async fn new_client(
        &self,
        config: &RegistryConfig,
    ) -> std::result::Result<Box<dyn RegistryClient>, BoxError>;
}
