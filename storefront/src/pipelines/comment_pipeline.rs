// storefront/src/pipelines/comment_pipeline.rs

//! Create or update the review for one order item.
//! Only the order's owner may review, and only once the order is delivered.

use crate::errors::AppError;
use crate::models::comment::MAX_RATING;
use crate::models::OrderStatus;
use crate::pipelines::contexts::SaveCommentCtxData;
use crate::state::AppState;
use orderflow::{ContextData, FlowRegistry, FlowResult, Pipeline, PipelineControl};
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub fn register_comment_pipeline(registry: &Arc<FlowRegistry<AppError>>, _app_state: &AppState) -> FlowResult<()> {
  let mut p = Pipeline::<SaveCommentCtxData, AppError>::new(&[
    ("validate_comment_input", false, None),
    ("load_reviewed_order", false, None),
    ("authorize_reviewer", false, None),
    ("require_delivered_order", false, None),
    ("save_comment", false, None),
  ]);

  p.on("validate_comment_input", |ctx_data: ContextData<SaveCommentCtxData>| {
    Box::pin(async move {
      let rating = ctx_data.read().comment.rating;
      if !(0..=MAX_RATING).contains(&rating) {
        return Err(AppError::Validation(format!("rating must be between 0 and {}", MAX_RATING)));
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  })?;

  p.on("load_reviewed_order", load_reviewed_order_step)?;

  p.on("authorize_reviewer", |ctx_data: ContextData<SaveCommentCtxData>| {
    Box::pin(async move {
      let guard = ctx_data.read();
      let owned = guard.order.as_ref().is_some_and(|o| o.is_owned_by(guard.user_id));
      if !owned {
        warn!(user_id = %guard.user_id, order_item_id = guard.comment.order_item_id, "Review by a non-owner.");
        return Err(AppError::Forbidden("userId is not matched".to_string()));
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  })?;

  p.on("require_delivered_order", |ctx_data: ContextData<SaveCommentCtxData>| {
    Box::pin(async move {
      let status = ctx_data.read().order.as_ref().map(|o| o.status);
      match status {
        Some(OrderStatus::Delivered) => Ok(PipelineControl::Continue),
        Some(other) => Err(AppError::Validation(format!(
          "only delivered orders can be reviewed (order is {})",
          other.label()
        ))),
        None => Err(AppError::Internal("order was not loaded before the status check".to_string())),
      }
    })
  })?;

  p.on("save_comment", save_comment_step)?;

  registry.register_pipeline(p);
  Ok(())
}

#[instrument(name = "comment::load_order", skip(ctx_data), err(Display))]
async fn load_reviewed_order_step(ctx_data: ContextData<SaveCommentCtxData>) -> Result<PipelineControl, AppError> {
  let (order_item_id, store) = {
    let guard = ctx_data.read();
    (guard.comment.order_item_id, guard.app_state.store.clone())
  };
  let order = store
    .find_order_by_item(order_item_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("order item {} not found", order_item_id)))?;
  ctx_data.write().order = Some(order);
  Ok(PipelineControl::Continue)
}

#[instrument(name = "comment::save", skip(ctx_data), err(Display))]
async fn save_comment_step(ctx_data: ContextData<SaveCommentCtxData>) -> Result<PipelineControl, AppError> {
  let (user_id, comment, store) = {
    let guard = ctx_data.read();
    (guard.user_id, guard.comment.clone(), guard.app_state.store.clone())
  };
  let saved = store.save_comment(user_id, comment).await?;
  info!(comment_id = saved.id, order_item_id = saved.order_item_id, "Comment saved.");
  ctx_data.write().saved = Some(saved);
  Ok(PipelineControl::Continue)
}
