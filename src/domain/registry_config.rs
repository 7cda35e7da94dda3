// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry connection descriptor.
//!
//! [`RegistryConfig`] names the registry backend and the key under which a
//! service's configuration profile is stored. It is immutable once loaded and
//! is handed to the connector explicitly on every call.

use crate::domain::errors::ProfileError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of registry backend holding the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryKind {
    /// An etcd v3 cluster.
    Etcd,
    /// A Redis server.
    Redis,
    /// An in-process store, for development and tests.
    Memory,
}

impl RegistryKind {
    /// Returns the lowercase name of the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistryKind::Etcd => "etcd",
            RegistryKind::Redis => "redis",
            RegistryKind::Memory => "memory",
        }
    }

    /// Returns the conventional port for the backend.
    pub fn default_port(&self) -> u16 {
        match self {
            RegistryKind::Etcd => 2379,
            RegistryKind::Redis => 6379,
            RegistryKind::Memory => 0,
        }
    }
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistryKind {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "etcd" => Ok(RegistryKind::Etcd),
            "redis" => Ok(RegistryKind::Redis),
            "memory" => Ok(RegistryKind::Memory),
            "consul" => Err(ProfileError::InvalidSettings {
                message: "Registry type 'consul' is not supported; use etcd, redis or memory"
                    .to_string(),
                source: None,
            }),
            other => Err(ProfileError::InvalidSettings {
                message: format!("Unknown registry type '{}'", other),
                source: None,
            }),
        }
    }
}

/// Connection descriptor for the configuration registry.
///
/// # Examples
///
/// ```
/// use profile_sync::domain::{RegistryConfig, RegistryKind};
///
/// let config = RegistryConfig {
///     host: "localhost".to_string(),
///     port: 2379,
///     kind: RegistryKind::Etcd,
///     stem: "edgex/appservices/1.0/".to_string(),
///     service_key: "AppService-configurable".to_string(),
/// };
/// assert_eq!(config.endpoint(), "localhost:2379");
/// assert_eq!(
///     config.configuration_key(),
///     "edgex/appservices/1.0/AppService-configurable"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Registry host name or address
    pub host: String,
    /// Registry port
    pub port: u16,
    /// Registry backend kind
    #[serde(rename = "type")]
    pub kind: RegistryKind,
    /// Namespace stem under which configurations are stored
    pub stem: String,
    /// Identity of the service whose configuration is managed
    pub service_key: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: RegistryKind::Etcd.default_port(),
            kind: RegistryKind::Etcd,
            stem: "config/".to_string(),
            service_key: "app-service-configurable".to_string(),
        }
    }
}

impl RegistryConfig {
    /// Returns the `host:port` endpoint of the registry.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the full key under which the configuration profile is stored.
    ///
    /// The stem and service key are joined with exactly one `/`.
    pub fn configuration_key(&self) -> String {
        let stem = self.stem.trim_end_matches('/');
        let service_key = self.service_key.trim_start_matches('/');
        if stem.is_empty() {
            service_key.to_string()
        } else {
            format!("{}/{}", stem, service_key)
        }
    }

    /// Checks that the descriptor can address a configuration.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.service_key.trim_matches('/').is_empty() {
            return Err(ProfileError::InvalidSettings {
                message: "Registry service key must not be empty".to_string(),
                source: None,
            });
        }
        if self.kind != RegistryKind::Memory && self.host.is_empty() {
            return Err(ProfileError::InvalidSettings {
                message: format!("Registry host must be set for '{}'", self.kind),
                source: None,
            });
        }
        Ok(())
    }
}
