// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process settings for the profile server.
//!
//! Settings are layered: built-in defaults, then a YAML file, then
//! environment variables prefixed with `PROFILE_SYNC_`, then command-line
//! flags. Each layer overrides the ones before it.

use crate::domain::{ProfileError, RegistryConfig, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
#[cfg(feature = "yaml")]
use std::path::{Path, PathBuf};

/// Prefix of environment variables read by [`Settings::apply_env`].
pub const ENV_PREFIX: &str = "PROFILE_SYNC_";

/// Maximum allowed size of a YAML settings file (10MB)
#[cfg(feature = "yaml")]
const MAX_YAML_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Maximum length for environment variable values
#[cfg(feature = "env")]
const MAX_ENV_VALUE_LEN: usize = 4096;

/// Settings of the profile server process.
///
/// # Examples
///
/// ```rust
/// use profile_sync::settings::Settings;
///
/// let mut settings = Settings::default();
/// settings.set("registry.host", "etcd.internal").unwrap();
/// settings.set("REGISTRY_PORT", "2380").unwrap();
/// assert_eq!(settings.registry.endpoint(), "etcd.internal:2380");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Address the HTTP server listens on
    pub listen: SocketAddr,
    /// Registry holding the configuration profile
    pub registry: RegistryConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 4000)),
            registry: RegistryConfig::default(),
        }
    }
}

/// Setting names accepted by [`Settings::set`], in normalized form.
#[cfg(feature = "env")]
const KEYS: [&str; 6] = [
    "listen",
    "registry_host",
    "registry_port",
    "registry_type",
    "registry_stem",
    "registry_service_key",
];

fn normalize(key: &str) -> String {
    key.trim().to_ascii_lowercase().replace(['.', '-'], "_")
}

fn invalid(key: &str, value: &str, err: impl std::error::Error + Send + Sync + 'static) -> ProfileError {
    ProfileError::InvalidSettings {
        message: format!("Invalid value '{}' for '{}'", value, key),
        source: Some(Box::new(err)),
    }
}

impl Settings {
    /// Overrides a single setting.
    ///
    /// Keys are case-insensitive and `.` and `_` are interchangeable, so
    /// `registry.service_key` and `REGISTRY_SERVICE_KEY` name the same setting.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::InvalidSettings` for unknown keys or values that
    /// do not parse.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let normalized = normalize(key);
        match normalized.as_str() {
            "listen" => self.listen = value.parse().map_err(|e| invalid(key, value, e))?,
            "registry_host" => self.registry.host = value.to_string(),
            "registry_port" => self.registry.port = value.parse().map_err(|e| invalid(key, value, e))?,
            "registry_type" => self.registry.kind = value.parse()?,
            "registry_stem" => self.registry.stem = value.to_string(),
            "registry_service_key" => self.registry.service_key = value.to_string(),
            _ => {
                return Err(ProfileError::InvalidSettings {
                    message: format!("Unknown setting '{}'", key),
                    source: None,
                })
            }
        }
        Ok(())
    }

    /// Checks that the settings describe a usable registry.
    pub fn validate(&self) -> Result<()> {
        self.registry.validate()
    }
}

#[cfg(feature = "yaml")]
impl Settings {
    /// Parses settings from YAML text; missing fields keep their defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| ProfileError::InvalidSettings {
            message: format!("Failed to parse YAML settings: {}", e),
            source: Some(Box::new(e)),
        })
    }

    /// Loads settings from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("<unknown>")
            .to_string();

        let metadata = std::fs::metadata(path).map_err(|e| ProfileError::InvalidSettings {
            message: format!("Failed to read settings file metadata: {}", file_name),
            source: Some(Box::new(e)),
        })?;
        if metadata.len() > MAX_YAML_FILE_SIZE {
            return Err(ProfileError::InvalidSettings {
                message: format!(
                    "Settings file too large: {} bytes (max {} bytes)",
                    metadata.len(),
                    MAX_YAML_FILE_SIZE
                ),
                source: None,
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ProfileError::InvalidSettings {
            message: format!("Failed to read settings file: {}", file_name),
            source: Some(Box::new(e)),
        })?;
        Self::from_yaml_str(&content)
    }

    /// Returns the OS-specific default settings file path, e.g.
    /// `~/.config/profile-sync/config.yaml` on Linux.
    pub fn default_location(app_name: &str, qualifier: &str) -> Option<PathBuf> {
        directories::ProjectDirs::from(qualifier, "", app_name)
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }
}

#[cfg(feature = "env")]
impl Settings {
    /// Applies overrides from `PROFILE_SYNC_*` environment variables.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(std::env::vars())
    }

    /// Applies overrides from the given variables, keeping only those with
    /// the [`ENV_PREFIX`].
    ///
    /// Unknown variables under the prefix are ignored with a debug log.
    pub fn apply_env_from<I, K, V>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, value) in vars {
            let (name, value) = (name.as_ref(), value.as_ref());
            let Some(key) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            if value.len() > MAX_ENV_VALUE_LEN {
                tracing::debug!("Skipping environment variable '{}': value too long", name);
                continue;
            }
            if !KEYS.contains(&normalize(key).as_str()) {
                tracing::debug!("Ignoring unknown environment variable '{}'", name);
                continue;
            }
            self.set(key, value)?;
            tracing::debug!("Applied setting '{}' from environment", key);
        }
        Ok(())
    }
}

/// Loads settings from the layered sources below the command line.
///
/// An explicit `file` must exist. Without one, the default location for
/// `profile-sync` is used when present.
pub fn load(file: Option<&std::path::Path>) -> Result<Settings> {
    #[allow(unused_mut)]
    let mut settings = Settings::default();

    #[cfg(not(feature = "yaml"))]
    let _ = file;

    #[cfg(feature = "yaml")]
    {
        match file {
            Some(path) => settings = Settings::from_yaml_file(path)?,
            None => {
                if let Some(path) = Settings::default_location("profile-sync", "org")
                    .filter(|path| path.is_file())
                {
                    tracing::debug!("Loading settings from {}", path.display());
                    settings = Settings::from_yaml_file(path)?;
                }
            }
        }
    }

    #[cfg(feature = "env")]
    settings.apply_env()?;

    Ok(settings)
}
