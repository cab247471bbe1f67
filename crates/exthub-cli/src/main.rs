//! Command-line entry point for the extension hub.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use exthub_api::ServerState;
use exthub_core::{HubConfig, MemoryRegistry, RegistryStore};
use exthub_dispatch::{validate_and_preview, DispatchConfig, ExtensionClient};
use exthub_storage::RedbRegistry;

#[derive(Parser)]
#[command(name = "exthub", version, about = "Extension hub for AI agents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the hub API server.
    Serve {
        /// Host to bind to. Overrides EXTHUB_HOST.
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to. Overrides EXTHUB_PORT.
        #[arg(long)]
        port: Option<u16>,

        /// Registry database path. Overrides EXTHUB_DB_PATH; the
        /// registry is in-memory when neither is set.
        #[arg(long)]
        db: Option<String>,

        /// Admin API key for registry writes. Overrides EXTHUB_API_KEY.
        #[arg(long)]
        api_key: Option<String>,

        /// Also serve the demo expense-tracker extension on port+1.
        #[arg(long)]
        with_demo: bool,
    },

    /// Probe an extension URL and print its registration preview.
    Probe {
        /// Base URL of the extension.
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve {
            host,
            port,
            db,
            api_key,
            with_demo,
        } => serve(host, port, db, api_key, with_demo).await,
        Command::Probe { url } => probe(&url).await,
    }
}

async fn serve(
    host: Option<String>,
    port: Option<u16>,
    db: Option<String>,
    api_key: Option<String>,
    with_demo: bool,
) -> anyhow::Result<()> {
    let mut config = HubConfig::from_env();
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(db) = db {
        config.db_path = Some(db);
    }
    if let Some(key) = api_key {
        config.api_key = Some(key);
    }

    if config.api_key.is_none() {
        tracing::warn!("no admin API key configured, registry writes are disabled");
    }

    let registry: Arc<dyn RegistryStore> = match &config.db_path {
        Some(path) => {
            tracing::info!(path, "opening registry database");
            Arc::new(RedbRegistry::open(path)?)
        }
        None => {
            tracing::warn!("no database path configured, registry is in-memory");
            Arc::new(MemoryRegistry::new())
        }
    };

    let client = Arc::new(ExtensionClient::new(DispatchConfig::from(&config))?);

    if with_demo {
        let demo_bind = format!("{}:{}", config.host, demo_port(config.port)?);
        let listener = tokio::net::TcpListener::bind(&demo_bind).await?;
        tracing::info!(addr = %listener.local_addr()?, "demo extension listening");
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, exthub_api::demo_extension_router()).await {
                tracing::error!(error = %e, "demo extension server failed");
            }
        });
    }

    let state = ServerState::new(registry, client, config.api_key.clone());
    let bind = format!("{}:{}", config.host, config.port);
    exthub_api::run(state, &bind).await
}

/// The demo extension binds one port above the hub.
fn demo_port(port: u16) -> anyhow::Result<u16> {
    port.checked_add(1).ok_or_else(|| {
        anyhow::anyhow!("--with-demo needs port {port} + 1, which is out of range")
    })
}

async fn probe(url: &str) -> anyhow::Result<()> {
    let config = HubConfig::from_env();
    let client = ExtensionClient::new(DispatchConfig::from(&config))?;

    let preview = validate_and_preview(&client, url.trim_end_matches('/')).await?;
    println!("{}", serde_json::to_string_pretty(&preview)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_port_is_hub_port_plus_one() {
        assert_eq!(demo_port(8420).unwrap(), 8421);
    }

    #[test]
    fn test_demo_port_rejects_max_port() {
        let err = demo_port(u16::MAX).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }
}
