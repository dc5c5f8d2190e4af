// storefront/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

use storefront::config::{AppConfig, StoreBackend};
use storefront::services::HeaderSessionProvider;
use storefront::state::AppState;
use storefront::store::{MemoryStore, OrderStore, PgStore};
use storefront::web::configure_app_routes;

fn init_tracing(json: bool) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE);
  if json {
    builder.json().init();
  } else {
    builder.init();
  }
}

async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn OrderStore>> {
  match config.store_backend {
    StoreBackend::Postgres => {
      let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required for the postgres backend")?;
      let store = PgStore::connect(url, config.database_max_connections)
        .await
        .context("Failed to connect to the database")?;
      if config.init_schema {
        store.init_schema().await.context("Failed to apply schema.sql")?;
      }
      Ok(Arc::new(store))
    }
    StoreBackend::Memory => {
      tracing::warn!("Using the in-memory store; data is lost on shutdown.");
      Ok(Arc::new(MemoryStore::new()))
    }
  }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  let config = AppConfig::from_env().context("Failed to load application configuration")?;
  init_tracing(config.log_json);
  tracing::info!(backend = ?config.store_backend, "Starting storefront server...");

  let store = open_store(&config).await?;
  let sessions = Arc::new(HeaderSessionProvider::new(config.session_header.clone()));
  let server_address = config.bind_address();
  let app_state = AppState::build(config, store.clone(), sessions).context("Failed to build application state")?;

  tracing::info!("Binding server to {}...", server_address);
  let server = HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)
  .with_context(|| format!("Failed to bind {}", server_address))?
  .run();

  let result = server.await;
  store.close().await;
  tracing::info!("Server stopped.");
  result.context("Server terminated with an error")
}
