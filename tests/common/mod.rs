// SPDX-License-Identifier: MIT OR Apache-2.0

//! Helper utilities shared by the integration tests.

use async_trait::async_trait;
use profile_sync::domain::{BoxError, ConfigValue, ProfileDocument, RegistryConfig, Result};
use profile_sync::ports::{RegistryClient, RegistryClientFactory};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

/// Cached result of Docker availability check.
#[allow(dead_code)]
static DOCKER_AVAILABLE: OnceLock<bool> = OnceLock::new();

/// Checks if Docker is available on the system.
///
/// This check is cached after the first call.
#[allow(dead_code)]
pub fn is_docker_available() -> bool {
    *DOCKER_AVAILABLE.get_or_init(|| {
        std::process::Command::new("docker")
            .args(["ps"])
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    })
}

/// Prints a warning message that a test is skipped due to Docker being unavailable.
#[allow(dead_code)]
pub fn print_docker_unavailable_warning(test_name: &str) {
    eprintln!("\n⚠️  SKIPPED: {} - Docker is not available", test_name);
    eprintln!("   To run this test, ensure Docker is installed and running.");
    eprintln!("   Installation: https://docs.docker.com/get-docker/\n");
}

/// A registry client that returns a fixed value and counts calls.
#[allow(dead_code)]
pub struct ScriptedClient {
    pub alive: bool,
    pub value: ConfigValue,
    pub calls: Arc<AtomicUsize>,
}

#[async_trait]
impl RegistryClient for ScriptedClient {
    fn backend(&self) -> &str {
        "scripted"
    }

    async fn is_alive(&mut self) -> bool {
        self.alive
    }

    async fn put_configuration(&mut self, _document: &ProfileDocument, _overwrite: bool) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get_configuration(&mut self) -> Result<ConfigValue> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.value.clone())
    }
}

/// Factory handing out [`ScriptedClient`]s that share one call counter.
#[allow(dead_code)]
#[derive(Clone)]
pub struct ScriptedFactory {
    pub alive: bool,
    pub value: ConfigValue,
    pub calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl ScriptedFactory {
    pub fn returning(value: ConfigValue) -> Self {
        Self {
            alive: true,
            value,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RegistryClientFactory for ScriptedFactory {
    async fn new_client(
        &self,
        _config: &RegistryConfig,
    ) -> std::result::Result<Box<dyn RegistryClient>, BoxError> {
        Ok(Box::new(ScriptedClient {
            alive: self.alive,
            value: self.value.clone(),
            calls: Arc::clone(&self.calls),
        }))
    }
}
