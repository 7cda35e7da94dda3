// SPDX-License-Identifier: MIT OR Apache-2.0

//! etcd registry adapter.
//!
//! This module provides a registry client that stores the configuration
//! profile in etcd as a single TOML document under the configuration key.

use crate::domain::{ConfigValue, ProfileDocument, ProfileError, RegistryConfig, Result};
use crate::ports::RegistryClient;
use async_trait::async_trait;
use etcd_client::{Client, Compare, CompareOp, Txn, TxnOp};

/// Registry client backed by an etcd cluster.
///
/// Writes with `overwrite` are a plain `PUT`, which etcd applies atomically.
/// Writes without it run in a transaction guarded on the key not existing yet.
///
/// # Examples
///
/// ```rust,no_run
/// use profile_sync::adapters::EtcdRegistry;
/// use profile_sync::domain::RegistryConfig;
/// use profile_sync::ports::RegistryClient;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut client = EtcdRegistry::connect(&RegistryConfig::default()).await?;
/// assert!(client.is_alive().await);
/// # Ok(())
/// # }
/// ```
pub struct EtcdRegistry {
    /// etcd client
    client: Client,
    /// Key holding the configuration document
    key: String,
}

impl std::fmt::Debug for EtcdRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EtcdRegistry")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl EtcdRegistry {
    /// Connects to the etcd endpoint described by `config`.
    ///
    /// # Errors
    ///
    /// Returns the etcd client error if the endpoint cannot be reached.
    pub async fn connect(config: &RegistryConfig) -> std::result::Result<Self, etcd_client::Error> {
        let endpoint = config.endpoint();
        let client = Client::connect([endpoint.as_str()], None).await?;
        tracing::debug!("Connected to etcd at {}", endpoint);
        Ok(Self {
            client,
            key: config.configuration_key(),
        })
    }
}

#[async_trait]
impl RegistryClient for EtcdRegistry {
    fn backend(&self) -> &str {
        "etcd"
    }

    async fn is_alive(&mut self) -> bool {
        match self.client.status().await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("etcd status probe failed: {}", e);
                false
            }
        }
    }

    async fn put_configuration(&mut self, document: &ProfileDocument, overwrite: bool) -> Result<()> {
        let text = document.to_toml_string()?;

        if overwrite {
            self.client
                .put(self.key.as_str(), text, None)
                .await
                .map_err(|e| ProfileError::store_write(format!("etcd put '{}' failed", self.key), e))?;
            return Ok(());
        }

        let txn = Txn::new()
            .when([Compare::version(self.key.as_str(), CompareOp::Equal, 0)])
            .and_then([TxnOp::put(self.key.as_str(), text, None)]);
        let response = self
            .client
            .txn(txn)
            .await
            .map_err(|e| ProfileError::store_write(format!("etcd txn on '{}' failed", self.key), e))?;
        if !response.succeeded() {
            tracing::debug!("Keeping existing configuration at '{}'", self.key);
        }
        Ok(())
    }

    async fn get_configuration(&mut self) -> Result<ConfigValue> {
        let response = self
            .client
            .get(self.key.as_str(), None)
            .await
            .map_err(|e| ProfileError::store_read(format!("etcd get '{}' failed", self.key), e))?;

        let kv = response.kvs().first().ok_or_else(|| ProfileError::StoreRead {
            message: format!("No configuration stored at '{}'", self.key),
            source: None,
        })?;
        let text = kv
            .value_str()
            .map_err(|e| ProfileError::store_read(format!("Value at '{}' is not UTF-8", self.key), e))?;

        let document = ProfileDocument::parse(text).map_err(|e| ProfileError::StoreRead {
            message: format!("Value at '{}' is not a TOML document", self.key),
            source: Some(Box::new(e)),
        })?;
        Ok(ConfigValue::Mapping(document.to_map()?))
    }
}
