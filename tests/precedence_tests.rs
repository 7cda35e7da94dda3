// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for settings source precedence.

use profile_sync::domain::RegistryKind;
use profile_sync::settings::{self, Settings};
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

/// Helper to set and clean up environment variables
struct EnvGuard {
    keys: Vec<String>,
}

impl EnvGuard {
    fn new() -> Self {
        EnvGuard { keys: Vec::new() }
    }

    fn set(&mut self, key: &str, value: &str) {
        env::set_var(key, value);
        self.keys.push(key.to_string());
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for key in &self.keys {
            env::remove_var(key);
        }
    }
}

fn yaml_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

#[test]
#[cfg(feature = "yaml")]
fn test_yaml_overrides_defaults() {
    let file = yaml_file("registry:\n  host: yaml-host\n  type: redis\n  port: 6379\n");
    let settings = Settings::from_yaml_file(file.path()).unwrap();

    assert_eq!(settings.registry.host, "yaml-host");
    assert_eq!(settings.registry.kind, RegistryKind::Redis);
    assert_eq!(settings.listen, Settings::default().listen);
}

#[test]
#[cfg(all(feature = "env", feature = "yaml"))]
fn test_precedence_env_over_yaml() {
    let file = yaml_file("registry:\n  host: yaml-host\n  stem: yaml/\n");
    let mut settings = Settings::from_yaml_file(file.path()).unwrap();

    settings
        .apply_env_from([("PROFILE_SYNC_REGISTRY_HOST", "env-host")])
        .unwrap();

    assert_eq!(settings.registry.host, "env-host");
    assert_eq!(settings.registry.stem, "yaml/");
}

#[test]
#[cfg(feature = "env")]
fn test_precedence_flag_over_env() {
    let mut settings = Settings::default();
    settings
        .apply_env_from([("PROFILE_SYNC_REGISTRY_SERVICE_KEY", "env-service")])
        .unwrap();
    settings.set("registry.service_key", "flag-service").unwrap();

    assert_eq!(settings.registry.service_key, "flag-service");
}

#[test]
#[cfg(all(feature = "env", feature = "yaml"))]
fn test_load_reads_file_then_process_env() {
    let mut env_guard = EnvGuard::new();
    let file = yaml_file(
        "listen: 127.0.0.1:4100\nregistry:\n  type: memory\n  service_key: yaml-service\n",
    );
    env_guard.set("PROFILE_SYNC_LISTEN", "127.0.0.1:4200");

    let settings = settings::load(Some(file.path())).unwrap();

    assert_eq!(settings.listen.port(), 4200);
    assert_eq!(settings.registry.kind, RegistryKind::Memory);
    assert_eq!(settings.registry.service_key, "yaml-service");
}

#[test]
#[cfg(feature = "yaml")]
fn test_load_fails_on_missing_explicit_file() {
    let err = settings::load(Some(std::path::Path::new("/nonexistent/settings.yaml"))).unwrap_err();
    assert_eq!(err.kind(), "invalid_settings");
}

#[test]
#[cfg(feature = "yaml")]
fn test_invalid_yaml_is_rejected() {
    let file = yaml_file("registry: [not, a, mapping]\n");
    assert!(Settings::from_yaml_file(file.path()).is_err());
}
