// SPDX-License-Identifier: MIT OR Apache-2.0

//! `profile-sync` server: exposes profile deploy and download over HTTP.

use clap::Parser;
use profile_sync::adapters::{router, BackendFactory};
use profile_sync::domain::Result;
use profile_sync::service::ProfileService;
use profile_sync::settings::{self, Settings};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Serve configuration profiles stored in a remote registry.
#[derive(Debug, Parser)]
#[command(name = "profile-sync", version, about)]
struct Cli {
    /// YAML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 0.0.0.0:4000
    #[arg(long)]
    listen: Option<String>,

    /// Registry host
    #[arg(long)]
    registry_host: Option<String>,

    /// Registry port
    #[arg(long)]
    registry_port: Option<u16>,

    /// Registry type: etcd, redis or memory
    #[arg(long)]
    registry_type: Option<String>,

    /// Namespace stem under which configurations are stored
    #[arg(long)]
    registry_stem: Option<String>,

    /// Key of the service whose configuration is managed
    #[arg(long)]
    service_key: Option<String>,
}

impl Cli {
    /// Applies the flags that were given on top of `settings`.
    fn apply(&self, settings: &mut Settings) -> Result<()> {
        let overrides = [
            ("listen", &self.listen),
            ("registry.host", &self.registry_host),
            ("registry.type", &self.registry_type),
            ("registry.stem", &self.registry_stem),
            ("registry.service_key", &self.service_key),
        ];
        for (key, value) in overrides {
            if let Some(value) = value {
                settings.set(key, value)?;
            }
        }
        if let Some(port) = self.registry_port {
            settings.registry.port = port;
        }
        Ok(())
    }
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = settings::load(cli.config.as_deref())?;
    cli.apply(&mut settings)?;
    settings.validate()?;
    Ok(settings)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("{}", e.chain());
            return ExitCode::FAILURE;
        }
    };

    let service = ProfileService::new(settings.registry.clone(), Arc::new(BackendFactory::new()));
    let app = router(Arc::new(service));

    let listener = match tokio::net::TcpListener::bind(settings.listen).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", settings.listen, e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        "Serving profile '{}' from {} registry at {} on {}",
        settings.registry.configuration_key(),
        settings.registry.kind,
        settings.registry.endpoint(),
        settings.listen
    );

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use profile_sync::domain::RegistryKind;

    #[test]
    fn test_flags_override_settings() {
        let cli = Cli::try_parse_from([
            "profile-sync",
            "--registry-type",
            "redis",
            "--registry-port",
            "6380",
            "--service-key",
            "AppService",
        ])
        .unwrap();
        let mut settings = Settings::default();
        cli.apply(&mut settings).unwrap();

        assert_eq!(settings.registry.kind, RegistryKind::Redis);
        assert_eq!(settings.registry.port, 6380);
        assert_eq!(settings.registry.service_key, "AppService");
    }

    #[test]
    fn test_invalid_port_rejected_at_parse() {
        for port in ["nope", "70000", "-1"] {
            assert!(
                Cli::try_parse_from(["profile-sync", "--registry-port", port]).is_err(),
                "port: {}",
                port
            );
        }
    }

    #[test]
    fn test_unknown_registry_type_rejected_on_apply() {
        let cli = Cli::try_parse_from(["profile-sync", "--registry-type", "zookeeper"]).unwrap();
        assert!(cli.apply(&mut Settings::default()).is_err());
    }
}
