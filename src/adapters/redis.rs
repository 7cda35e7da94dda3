// SPDX-License-Identifier: MIT OR Apache-2.0

//! Redis registry adapter.
//!
//! This module provides a registry client that stores the configuration
//! profile in Redis as a single TOML document under the configuration key.

use crate::domain::{BoxError, ConfigValue, ProfileDocument, ProfileError, RegistryConfig, Result};
use crate::ports::RegistryClient;
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};

/// Registry client backed by a Redis server.
///
/// `SET` replaces the document atomically; writes without `overwrite` use
/// `SET NX`.
///
/// # Examples
///
/// ```rust,no_run
/// use profile_sync::adapters::RedisRegistry;
/// use profile_sync::domain::{RegistryConfig, RegistryKind};
/// use profile_sync::ports::RegistryClient;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
/// let config = RegistryConfig {
///     kind: RegistryKind::Redis,
///     port: 6379,
///     ..Default::default()
/// };
/// let mut client = RedisRegistry::connect(&config).await?;
/// assert!(client.is_alive().await);
/// # Ok(())
/// # }
/// ```
pub struct RedisRegistry {
    /// Multiplexed connection owned by this handle
    conn: MultiplexedConnection,
    /// Key holding the configuration document
    key: String,
}

impl std::fmt::Debug for RedisRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisRegistry")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl RedisRegistry {
    /// Validates the key to prevent pattern injection
    fn validate_key(key: &str) -> std::result::Result<(), BoxError> {
        // Disallow wildcard characters and other special Redis pattern characters
        if key.contains(['*', '?', '[', ']', '\\']) {
            return Err(format!(
                "Configuration key '{}' contains invalid characters (* ? [ ] \\)",
                key
            )
            .into());
        }
        Ok(())
    }

    /// Returns the connection URL for the server described by `config`.
    pub fn url(config: &RegistryConfig) -> String {
        format!("redis://{}/", config.endpoint())
    }

    /// Connects to the Redis server described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration key is not a plain key or the
    /// server cannot be reached.
    pub async fn connect(config: &RegistryConfig) -> std::result::Result<Self, BoxError> {
        let key = config.configuration_key();
        Self::validate_key(&key)?;

        let url = Self::url(config);
        let client = Client::open(url.as_str())?;
        let conn = client.get_multiplexed_async_connection().await?;
        tracing::debug!("Connected to Redis at {}", config.endpoint());
        Ok(Self { conn, key })
    }
}

#[async_trait]
impl RegistryClient for RedisRegistry {
    fn backend(&self) -> &str {
        "redis"
    }

    async fn is_alive(&mut self) -> bool {
        let pong: redis::RedisResult<String> = redis::cmd("PING").query_async(&mut self.conn).await;
        match pong {
            Ok(reply) => reply == "PONG",
            Err(e) => {
                tracing::warn!("Redis PING failed: {}", e);
                false
            }
        }
    }

    async fn put_configuration(&mut self, document: &ProfileDocument, overwrite: bool) -> Result<()> {
        let text = document.to_toml_string()?;

        if overwrite {
            let _: () = self
                .conn
                .set(&self.key, text)
                .await
                .map_err(|e| ProfileError::store_write(format!("Redis SET '{}' failed", self.key), e))?;
            return Ok(());
        }

        let written: bool = self
            .conn
            .set_nx(&self.key, text)
            .await
            .map_err(|e| ProfileError::store_write(format!("Redis SETNX '{}' failed", self.key), e))?;
        if !written {
            tracing::debug!("Keeping existing configuration at '{}'", self.key);
        }
        Ok(())
    }

    async fn get_configuration(&mut self) -> Result<ConfigValue> {
        let text: Option<String> = self
            .conn
            .get(&self.key)
            .await
            .map_err(|e| ProfileError::store_read(format!("Redis GET '{}' failed", self.key), e))?;

        let text = text.ok_or_else(|| ProfileError::StoreRead {
            message: format!("No configuration stored at '{}'", self.key),
            source: None,
        })?;
        let document = ProfileDocument::parse(&text).map_err(|e| ProfileError::StoreRead {
            message: format!("Value at '{}' is not a TOML document", self.key),
            source: Some(Box::new(e)),
        })?;
        Ok(ConfigValue::Mapping(document.to_map()?))
    }
}
