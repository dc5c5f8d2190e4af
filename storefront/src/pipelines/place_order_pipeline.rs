// storefront/src/pipelines/place_order_pipeline.rs

use crate::errors::AppError;
use crate::models::NewOrderItem;
use crate::pipelines::contexts::PlaceOrderCtxData;
use crate::state::AppState;
use orderflow::{ContextData, FlowRegistry, FlowResult, Pipeline, PipelineControl, SkipCondition};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Largest quantity a single line may carry.
pub const MAX_ITEM_QUANTITY: i32 = 20;

pub fn register_place_order_pipeline(
  registry: &Arc<FlowRegistry<AppError>>,
  _app_state: &AppState,
) -> FlowResult<()> {
  let no_delivery_info: SkipCondition<PlaceOrderCtxData> =
    Arc::new(|ctx_data: ContextData<PlaceOrderCtxData>| ctx_data.read().delivery.is_empty());

  let mut p = Pipeline::<PlaceOrderCtxData, AppError>::new(&[
    ("validate_order_items", false, None),
    ("normalize_delivery_info", false, Some(no_delivery_info)),
    ("persist_order_atomically", false, None),
  ]);

  p.on("validate_order_items", |ctx_data: ContextData<PlaceOrderCtxData>| {
    Box::pin(async move {
      let guard = ctx_data.read();
      validate_items(&guard.items)?;
      info!(item_count = guard.items.len(), "Order items validated.");
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  })?;

  p.on("normalize_delivery_info", |ctx_data: ContextData<PlaceOrderCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      let delivery = std::mem::take(&mut guard.delivery);
      guard.delivery = delivery.normalized();
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  })?;

  p.on("persist_order_atomically", persist_order_step)?;

  registry.register_pipeline(p);
  Ok(())
}

/// Every line needs a quantity in `1..=MAX_ITEM_QUANTITY` and a non-negative
/// price; a client-sent amount has to match `price * quantity`. Line amounts
/// and the order total must fit in an `i64`.
pub fn validate_items(items: &[NewOrderItem]) -> Result<(), AppError> {
  if items.is_empty() {
    return Err(AppError::Validation("an order needs at least one item".to_string()));
  }
  let mut total: i64 = 0;
  for (index, item) in items.iter().enumerate() {
    if !(1..=MAX_ITEM_QUANTITY).contains(&item.quantity) {
      warn!(index, quantity = item.quantity, "Quantity out of range.");
      return Err(AppError::Validation(format!(
        "item {}: quantity must be between 1 and {}",
        index, MAX_ITEM_QUANTITY
      )));
    }
    if item.price < 0 {
      return Err(AppError::Validation(format!("item {}: price must not be negative", index)));
    }
    let computed = item.checked_amount().ok_or_else(|| {
      warn!(index, price = item.price, quantity = item.quantity, "Line amount overflows.");
      AppError::Validation(format!("item {}: amount is too large", index))
    })?;
    if let Some(amount) = item.amount {
      if amount != computed {
        return Err(AppError::Validation(format!(
          "item {}: amount {} does not equal price x quantity ({})",
          index, amount, computed
        )));
      }
    }
    total = total
      .checked_add(computed)
      .ok_or_else(|| AppError::Validation("order total is too large".to_string()))?;
  }
  Ok(())
}

#[instrument(name = "place_order::persist", skip(ctx_data), err(Display))]
async fn persist_order_step(ctx_data: ContextData<PlaceOrderCtxData>) -> Result<PipelineControl, AppError> {
  let (user_id, items, delivery, store) = {
    let guard = ctx_data.read();
    (
      guard.user_id,
      guard.items.clone(),
      guard.delivery.clone(),
      guard.app_state.store.clone(),
    )
  };

  let placed = store.place_order(user_id, items, delivery).await?;
  info!(order_id = placed.order.id, total = placed.total_amount(), "Order created.");
  ctx_data.write().placed = Some(placed);
  Ok(PipelineControl::Continue)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn line(price: i64, quantity: i32, amount: Option<i64>) -> NewOrderItem {
    NewOrderItem {
      product_id: 1,
      price,
      quantity,
      amount,
    }
  }

  #[test]
  fn accepts_well_formed_lines() {
    assert!(validate_items(&[line(1000, 2, None), line(500, 1, Some(500))]).is_ok());
    assert!(validate_items(&[line(0, MAX_ITEM_QUANTITY, None)]).is_ok());
  }

  #[test]
  fn rejects_bad_lines() {
    assert!(validate_items(&[]).is_err());
    assert!(validate_items(&[line(1000, 0, None)]).is_err());
    assert!(validate_items(&[line(1000, MAX_ITEM_QUANTITY + 1, None)]).is_err());
    assert!(validate_items(&[line(-1, 1, None)]).is_err());
    assert!(validate_items(&[line(1000, 2, Some(1000))]).is_err());
  }

  #[test]
  fn rejects_amounts_that_overflow() {
    assert!(validate_items(&[line(i64::MAX / 2 + 1, 2, None)]).is_err());
    assert!(validate_items(&[line(i64::MAX, 1, None), line(1, 1, None)]).is_err());
    assert!(validate_items(&[line(i64::MAX, 1, None)]).is_ok());
  }
}
