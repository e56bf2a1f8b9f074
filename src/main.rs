// src/main.rs
mod ballot;
mod config;
mod db;
mod error;
mod extract;
mod handlers;
mod ledger;
mod models;
mod present;
mod routes;
mod services;
mod store;
mod tally;

use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::services::PollService;
use crate::store::{MemoryStore, PgStore, PollStore};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    let store: Arc<dyn PollStore> = match &config.database {
        Some(database) => {
            let pool = db::create_pool(database).await?;
            db::bootstrap_schema(&pool).await?;
            info!(max_connections = database.max_connections, "connected to PostgreSQL");
            Arc::new(PgStore::new(pool))
        }
        None => {
            warn!(
                seed_tokens = config.seed_tokens.len(),
                "DATABASE_URL not set, votes are kept in memory and lost on restart"
            );
            Arc::new(MemoryStore::with_tokens(config.seed_tokens.clone()))
        }
    };

    let poll = Arc::new(PollService::new(store, config.ballot.clone()));
    let app = routes::create_routes(poll);

    info!(addr = %config.listen_addr, "poll service listening");
    axum_server::bind(config.listen_addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
