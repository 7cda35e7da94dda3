// SPDX-License-Identifier: MIT OR Apache-2.0

//! Profile deploy and download operations.
//!
//! [`ProfileService`] moves a configuration profile between a JSON document
//! and the registry, using [`ProfileDocument`] as the stored form.

use crate::domain::{ConfigMap, ConfigValue, ProfileDocument, ProfileError, RegistryConfig, Result};
use crate::ports::RegistryClientFactory;
use crate::service::connector::RegistryConnector;
use std::sync::Arc;

/// File name offered to callers downloading a profile.
pub const PROFILE_FILE_NAME: &str = "configuration.toml";

/// Deploys and downloads the configuration profile of one service.
///
/// The service holds only the immutable registry descriptor and the client
/// factory; every operation opens its own registry client and drops it before
/// returning, on success and on every error path.
///
/// # Examples
///
/// ```rust
/// use profile_sync::adapters::BackendFactory;
/// use profile_sync::domain::{RegistryConfig, RegistryKind};
/// use profile_sync::service::ProfileService;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> profile_sync::domain::Result<()> {
/// let registry = RegistryConfig {
///     kind: RegistryKind::Memory,
///     ..Default::default()
/// };
/// let service = ProfileService::new(registry, Arc::new(BackendFactory::new()));
///
/// service.deploy(br#"{"Writable": {"LogLevel": "DEBUG"}}"#).await?;
/// let text = service.download().await?;
/// assert!(text.contains("LogLevel = \"DEBUG\""));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ProfileService {
    registry: RegistryConfig,
    connector: RegistryConnector,
}

impl ProfileService {
    /// Creates a service for the registry described by `registry`.
    pub fn new(registry: RegistryConfig, factory: Arc<dyn RegistryClientFactory>) -> Self {
        Self {
            registry,
            connector: RegistryConnector::new(factory),
        }
    }

    /// Stores a JSON object as the service's full configuration.
    ///
    /// The body is decoded before the registry is contacted, so a malformed
    /// body never causes a write. Any existing configuration is overwritten.
    ///
    /// # Errors
    ///
    /// `Decode`, `Connection`, `Unavailable`, `Conversion` or `StoreWrite`,
    /// in the order the steps run.
    pub async fn deploy(&self, body: &[u8]) -> Result<()> {
        let configuration = decode_body(body)?;
        let mut client = self.connector.connect(&self.registry).await?;
        let document = ProfileDocument::from_map(&configuration)?;
        client.put_configuration(&document, true).await?;

        tracing::info!(
            "Deployed configuration profile with {} top-level keys to '{}'",
            configuration.len(),
            self.registry.configuration_key()
        );
        Ok(())
    }

    /// Reads the service's configuration and renders it as TOML text.
    ///
    /// # Errors
    ///
    /// `Connection`, `Unavailable`, `StoreRead`, `ShapeMismatch`, `Conversion`
    /// or `Serialize`, in the order the steps run.
    pub async fn download(&self) -> Result<String> {
        let mut client = self.connector.connect(&self.registry).await?;
        let raw = client.get_configuration().await?;
        drop(client);

        let configuration = raw.into_mapping()?;
        let document = ProfileDocument::from_map(&configuration)?;
        let text = document.to_toml_string()?;

        tracing::info!(
            "Downloaded configuration profile from '{}' ({} bytes)",
            self.registry.configuration_key(),
            text.len()
        );
        Ok(text)
    }
}

/// Decodes a request body into a keyed mapping.
fn decode_body(body: &[u8]) -> Result<ConfigMap> {
    let value: ConfigValue = serde_json::from_slice(body).map_err(|e| ProfileError::Decode {
        message: e.to_string(),
        source: Some(Box::new(e)),
    })?;
    match value {
        ConfigValue::Mapping(map) => Ok(map),
        other => Err(ProfileError::Decode {
            message: format!("expected a JSON object, found {}", other.kind_name()),
            source: None,
        }),
    }
}
