// storefront/src/pipelines/order_status_pipeline.rs

//! `update_status(order_id, new_status, requested_by)`.
//!
//! Steps, in order: decode the requested code (400), load the order (404),
//! check ownership (403), check the transition table (409), then write. A
//! request for the status the order already has stops before the write and
//! hands back the stored order.

use crate::errors::AppError;
use crate::models::OrderStatus;
use crate::pipelines::contexts::UpdateOrderStatusCtxData;
use crate::state::AppState;
use orderflow::{ContextData, FlowRegistry, FlowResult, Pipeline, PipelineControl};
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub fn register_order_status_pipeline(
  registry: &Arc<FlowRegistry<AppError>>,
  _app_state: &AppState,
) -> FlowResult<()> {
  let mut p = Pipeline::<UpdateOrderStatusCtxData, AppError>::new(&[
    ("decode_requested_status", false, None),
    ("load_order_for_status_update", false, None),
    ("authorize_order_owner", false, None),
    ("check_status_transition", false, None),
    ("persist_order_status", false, None),
  ]);

  p.on("decode_requested_status", |ctx_data: ContextData<UpdateOrderStatusCtxData>| {
    Box::pin(async move {
      let code = ctx_data.read().requested_code;
      let status = OrderStatus::try_from(code).map_err(|e| {
        warn!(code, "Rejecting status update with an undefined code.");
        AppError::Validation(e.to_string())
      })?;
      ctx_data.write().requested_status = Some(status);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  })?;

  p.on("load_order_for_status_update", load_order_step)?;
  p.on("authorize_order_owner", authorize_owner_step)?;
  p.on("check_status_transition", check_transition_step)?;
  p.on("persist_order_status", persist_status_step)?;

  registry.register_pipeline(p);
  Ok(())
}

#[instrument(name = "order_status::load_order", skip(ctx_data), err(Display))]
async fn load_order_step(ctx_data: ContextData<UpdateOrderStatusCtxData>) -> Result<PipelineControl, AppError> {
  let (order_id, store) = {
    let guard = ctx_data.read();
    (guard.order_id, guard.app_state.store.clone())
  };

  let order = store
    .find_order(order_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("order {} not found", order_id)))?;
  ctx_data.write().current = Some(order);
  Ok(PipelineControl::Continue)
}

async fn authorize_owner_step(ctx_data: ContextData<UpdateOrderStatusCtxData>) -> Result<PipelineControl, AppError> {
  let guard = ctx_data.read();
  let owned = guard
    .current
    .as_ref()
    .is_some_and(|order| order.is_owned_by(guard.requested_by));
  if !owned {
    warn!(order_id = guard.order_id, user_id = %guard.requested_by, "Status update by a non-owner.");
    return Err(AppError::Forbidden("userId is not matched".to_string()));
  }
  Ok(PipelineControl::Continue)
}

async fn check_transition_step(ctx_data: ContextData<UpdateOrderStatusCtxData>) -> Result<PipelineControl, AppError> {
  let mut guard = ctx_data.write();
  let (Some(current), Some(next)) = (guard.current.clone(), guard.requested_status) else {
    return Err(AppError::Internal("status transition checked before the order was loaded".to_string()));
  };

  if current.status == next {
    info!(order_id = current.id, status = next.code(), "Status unchanged; nothing to write.");
    guard.updated = Some(current);
    return Ok(PipelineControl::Stop);
  }
  if !current.status.can_transition_to(next) {
    warn!(order_id = current.id, from = current.status.code(), to = next.code(), "Illegal status transition.");
    return Err(AppError::InvalidTransition {
      from: current.status,
      to: next,
    });
  }
  Ok(PipelineControl::Continue)
}

#[instrument(name = "order_status::persist", skip(ctx_data), err(Display))]
async fn persist_status_step(ctx_data: ContextData<UpdateOrderStatusCtxData>) -> Result<PipelineControl, AppError> {
  let (order_id, next, store) = {
    let guard = ctx_data.read();
    (guard.order_id, guard.requested_status, guard.app_state.store.clone())
  };
  let next = next.ok_or_else(|| AppError::Internal("requested status was not decoded".to_string()))?;

  let updated = store.update_order_status(order_id, next).await?;
  info!(order_id, status = updated.status.code(), "Order status updated.");
  ctx_data.write().updated = Some(updated);
  Ok(PipelineControl::Continue)
}
