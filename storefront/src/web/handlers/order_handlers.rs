// storefront/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::models::envelope::MSG_NO_SESSION;
use crate::models::{DeliveryInfo, Envelope, NewOrderItem, OrderDetail};
use crate::pipelines::contexts::{PlaceOrderCtxData, UpdateOrderStatusCtxData};
use crate::state::AppState;
use crate::web::extractors::SessionUser;
use orderflow::{ContextData, PipelineResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
  pub items: Vec<NewOrderItem>,
  #[serde(default)]
  pub order_info: Option<DeliveryInfo>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UpdateOrderStatusRequest {
  pub id: i64,
  pub status: i32,
}

#[instrument(
  name = "handler::place_order",
  skip(app_state, payload, session),
  fields(item_count = payload.items.len())
)]
pub async fn place_order_handler(
  app_state: web::Data<AppState>,
  session: Option<SessionUser>,
  payload: web::Json<PlaceOrderRequest>,
) -> Result<HttpResponse, AppError> {
  let Some(session) = session else {
    return Ok(HttpResponse::BadRequest().json(Envelope::<Vec<()>>::with_message(Some(Vec::new()), MSG_NO_SESSION)));
  };
  let PlaceOrderRequest { items, order_info } = payload.into_inner();

  let ctx_data = ContextData::new(PlaceOrderCtxData::new(
    app_state.get_ref().clone(),
    session.user_id,
    items,
    order_info.unwrap_or_default(),
  ));

  match app_state.flows.run(ctx_data.clone()).await {
    Ok(PipelineResult::Completed) => {
      let placed = ctx_data
        .read()
        .placed
        .clone()
        .ok_or_else(|| AppError::Internal("order pipeline completed without an order".to_string()))?;
      info!(order_id = placed.order.id, user_id = %session.user_id, "Order placed.");
      Ok(HttpResponse::Ok().json(Envelope::success(placed)))
    }
    Ok(PipelineResult::Stopped) => {
      warn!(user_id = %session.user_id, "Order pipeline stopped before persisting.");
      Err(AppError::Internal("order placement was halted".to_string()))
    }
    Err(app_err) => {
      warn!(user_id = %session.user_id, error = %app_err, "Order placement failed.");
      Err(app_err)
    }
  }
}

#[instrument(name = "handler::list_orders", skip(app_state, session))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  session: Option<SessionUser>,
) -> Result<HttpResponse, AppError> {
  let Some(session) = session else {
    return Ok(HttpResponse::Ok().json(Envelope::<Vec<OrderDetail>>::with_message(Some(Vec::new()), MSG_NO_SESSION)));
  };
  let orders = app_state.store.find_orders_by_user(session.user_id).await?;
  info!(user_id = %session.user_id, count = orders.len(), "Orders fetched.");
  Ok(HttpResponse::Ok().json(Envelope::success(orders)))
}

#[instrument(
  name = "handler::update_order_status",
  skip(app_state, payload, session),
  fields(order_id = payload.id, status = payload.status)
)]
pub async fn update_order_status_handler(
  app_state: web::Data<AppState>,
  session: SessionUser,
  payload: web::Json<UpdateOrderStatusRequest>,
) -> Result<HttpResponse, AppError> {
  let UpdateOrderStatusRequest { id, status } = payload.into_inner();
  let ctx_data = ContextData::new(UpdateOrderStatusCtxData::new(
    app_state.get_ref().clone(),
    session.user_id,
    id,
    status,
  ));

  // `Stopped` means the order already had this status; the stored order is the answer.
  match app_state.flows.run(ctx_data.clone()).await {
    Ok(PipelineResult::Completed) | Ok(PipelineResult::Stopped) => {
      let updated = ctx_data
        .read()
        .updated
        .clone()
        .ok_or_else(|| AppError::Internal("status pipeline finished without an order".to_string()))?;
      Ok(HttpResponse::Ok().json(Envelope::success(updated)))
    }
    Err(app_err) => {
      warn!(order_id = id, status, error = %app_err, "Status update rejected.");
      Err(app_err)
    }
  }
}
