// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry connection bootstrap.
//!
//! [`RegistryConnector`] turns a connection descriptor into a live client
//! handle. It makes exactly one attempt and surfaces the first failure.

use crate::domain::{ProfileError, RegistryConfig, Result};
use crate::ports::{RegistryClient, RegistryClientFactory};
use std::sync::Arc;

/// Opens live registry client handles.
///
/// # Examples
///
/// ```rust
/// use profile_sync::adapters::BackendFactory;
/// use profile_sync::domain::{RegistryConfig, RegistryKind};
/// use profile_sync::service::RegistryConnector;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> profile_sync::domain::Result<()> {
/// let connector = RegistryConnector::new(Arc::new(BackendFactory::new()));
/// let config = RegistryConfig {
///     kind: RegistryKind::Memory,
///     ..Default::default()
/// };
/// let client = connector.connect(&config).await?;
/// assert_eq!(client.backend(), "memory");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RegistryConnector {
    factory: Arc<dyn RegistryClientFactory>,
}

impl RegistryConnector {
    /// Creates a connector that opens clients through `factory`.
    pub fn new(factory: Arc<dyn RegistryClientFactory>) -> Self {
        Self { factory }
    }

    /// Opens a client for `config` and checks that the registry is alive.
    ///
    /// # Errors
    ///
    /// * `ProfileError::Connection` - the factory could not build a client
    /// * `ProfileError::Unavailable` - the client was built but the registry is not alive
    pub async fn connect(&self, config: &RegistryConfig) -> Result<Box<dyn RegistryClient>> {
        let backend = config.kind.to_string();

        let mut client =
            self.factory
                .new_client(config)
                .await
                .map_err(|source| ProfileError::Connection {
                    backend: backend.clone(),
                    source,
                })?;

        if !client.is_alive().await {
            tracing::warn!("Registry ({}) at {} is not alive", backend, config.endpoint());
            return Err(ProfileError::Unavailable { backend });
        }

        tracing::debug!(
            "Opened {} client for '{}'",
            client.backend(),
            config.configuration_key()
        );
        Ok(client)
    }
}

impl std::fmt::Debug for RegistryConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryConnector").finish_non_exhaustive()
    }
}
