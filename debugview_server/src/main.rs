//! Debug View Server - Embedded debugging endpoint
//!
//! This server handles:
//! - Database, table and data listing for the viewer (`/getDbList`, ...)
//! - Key/value mutations (`/addData`, `/updateData`, `/deleteData`)
//! - A server-rendered browser viewer at `/`

mod config;
mod html;
mod routes;
mod store;

use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,debugview_server=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Starting Debug View server on {}:{}", config.host, config.port);
    tracing::info!("Data directory: {}", config.data_dir.display());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let app = routes::app(routes::AppState::new(config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Open http://{}/ in a browser, or run `debugview --server http://{}`", addr, addr);

    axum::serve(listener, app).await?;

    Ok(())
}
