use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod error;
mod middleware;
mod models;
mod password;
mod repositories;
mod routes;
mod settings;
mod state;
mod stores;

use common::{Database, schema};
use tokio::net::TcpListener;

use crate::{middleware::JwtVerifier, settings::Settings, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log.filter))
        .init();

    info!("Starting catalog service");

    // Connections are opened on first use
    let database = Database::connect_lazy(&settings.database)?;

    match schema::initialize(&database).await {
        Ok(()) => info!("Database schema ready"),
        Err(e) => warn!("Schema initialization failed, running in limited mode: {}", e),
    }

    let jwt = JwtVerifier::new(&settings.jwt)?;
    let app_state = AppState::new(database, jwt);

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(&settings.server.address).await?;
    info!("Catalog service listening on {}", settings.server.address);

    axum::serve(listener, app).await?;

    Ok(())
}
