// storefront/src/pipelines/mod.rs

//! Defines and registers the workflow pipelines used by the storefront.

use crate::errors::AppError;
use crate::state::AppState;
use orderflow::{FlowRegistry, FlowResult};
use std::sync::Arc;

pub mod contexts;

pub mod comment_pipeline;
pub mod order_status_pipeline;
pub mod place_order_pipeline;

/// Registers every pipeline with `registry`. Called once at start-up.
pub fn register_all_pipelines(registry: &Arc<FlowRegistry<AppError>>, app_state: &AppState) -> FlowResult<()> {
  tracing::info!("Registering workflow pipelines...");

  place_order_pipeline::register_place_order_pipeline(registry, app_state)?;
  order_status_pipeline::register_order_status_pipeline(registry, app_state)?;
  comment_pipeline::register_comment_pipeline(registry, app_state)?;

  tracing::info!("All workflow pipelines registered.");
  Ok(())
}
