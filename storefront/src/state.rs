// storefront/src/state.rs

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::pipelines;
use crate::services::SessionProvider;
use crate::store::OrderStore;
use orderflow::FlowRegistry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn OrderStore>,
  pub flows: Arc<FlowRegistry<AppError>>,
  pub config: Arc<AppConfig>,
  pub sessions: Arc<dyn SessionProvider>,
}

impl AppState {
  /// Wires the shared handles together and registers every workflow pipeline.
  pub fn build(config: AppConfig, store: Arc<dyn OrderStore>, sessions: Arc<dyn SessionProvider>) -> Result<Self> {
    let state = Self {
      store,
      flows: Arc::new(FlowRegistry::<AppError>::new()),
      config: Arc::new(config),
      sessions,
    };
    pipelines::register_all_pipelines(&state.flows, &state)?;
    Ok(state)
  }
}
