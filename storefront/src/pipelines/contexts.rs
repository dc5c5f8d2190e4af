// storefront/src/pipelines/contexts.rs

//! Data carried through each workflow pipeline.
//! Handlers receive these wrapped in `orderflow::ContextData`.

use crate::models::{Comment, DeliveryInfo, NewComment, NewOrderItem, Order, OrderStatus, PlacedOrder};
use crate::state::AppState;
use uuid::Uuid;

#[derive(Clone)]
pub struct PlaceOrderCtxData {
  pub app_state: AppState,
  pub user_id: Uuid,
  pub items: Vec<NewOrderItem>,
  pub delivery: DeliveryInfo,
  pub placed: Option<PlacedOrder>,
}

impl PlaceOrderCtxData {
  pub fn new(app_state: AppState, user_id: Uuid, items: Vec<NewOrderItem>, delivery: DeliveryInfo) -> Self {
    Self {
      app_state,
      user_id,
      items,
      delivery,
      placed: None,
    }
  }
}

#[derive(Clone)]
pub struct UpdateOrderStatusCtxData {
  pub app_state: AppState,
  pub requested_by: Uuid,
  pub order_id: i64,
  /// Raw code as received; decoded by the first step.
  pub requested_code: i32,
  pub requested_status: Option<OrderStatus>,
  pub current: Option<Order>,
  pub updated: Option<Order>,
}

impl UpdateOrderStatusCtxData {
  pub fn new(app_state: AppState, requested_by: Uuid, order_id: i64, requested_code: i32) -> Self {
    Self {
      app_state,
      requested_by,
      order_id,
      requested_code,
      requested_status: None,
      current: None,
      updated: None,
    }
  }
}

#[derive(Clone)]
pub struct SaveCommentCtxData {
  pub app_state: AppState,
  pub user_id: Uuid,
  pub comment: NewComment,
  pub order: Option<Order>,
  pub saved: Option<Comment>,
}

impl SaveCommentCtxData {
  pub fn new(app_state: AppState, user_id: Uuid, comment: NewComment) -> Self {
    Self {
      app_state,
      user_id,
      comment,
      order: None,
      saved: None,
    }
  }
}
