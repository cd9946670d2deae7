mod cli;

use axum::Router;
use backend::BackendConfig;
use backend::store::StoreConfig;
use clap::Parser;
use std::net::SocketAddr;
use tower_http::services::ServeDir;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
    let cli = cli::Cli::parse();

    let store = if cli.in_memory {
        StoreConfig::Memory
    } else if let Some(url) = cli.sqlite_url {
        StoreConfig::Sqlite { url }
    } else {
        StoreConfig::Local {
            path: cli.store_path,
        }
    };
    tracing::info!("Using store {:?}", store);

    let router = match cli.ui_dir {
        Some(dir) => Router::new().fallback_service(ServeDir::new(dir)),
        None => Router::new(),
    };
    let router = backend::init(
        router,
        BackendConfig {
            api_base: cli.api_base,
            store,
        },
    )
    .await?;

    let addr = SocketAddr::from(([127, 0, 0, 1], cli.port));
    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
