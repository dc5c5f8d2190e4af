// storefront/src/models/order.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

use super::order_item::{order_total, OrderItem, OrderItemDetail};

/// Lifecycle state of an order, stored and exchanged as its integer code.
///
/// Code `2` is intentionally unassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(try_from = "i32", into = "i32")]
#[repr(i32)]
pub enum OrderStatus {
  Cancelled = -1,
  OrderPending = 0,
  PaymentPending = 1,
  PaymentComplete = 3,
  ShippingPending = 4,
  ShippingInProgress = 5,
  Delivered = 6,
  RefundPending = 7,
  RefundComplete = 8,
  ReturnPending = 9,
  ReturnComplete = 10,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown order status code {0}")]
pub struct UnknownStatusCode(pub i32);

impl OrderStatus {
  pub const ALL: [OrderStatus; 11] = [
    OrderStatus::Cancelled,
    OrderStatus::OrderPending,
    OrderStatus::PaymentPending,
    OrderStatus::PaymentComplete,
    OrderStatus::ShippingPending,
    OrderStatus::ShippingInProgress,
    OrderStatus::Delivered,
    OrderStatus::RefundPending,
    OrderStatus::RefundComplete,
    OrderStatus::ReturnPending,
    OrderStatus::ReturnComplete,
  ];

  pub fn code(self) -> i32 {
    self as i32
  }

  /// Position in the display table: the code shifted by one.
  pub fn display_index(self) -> usize {
    // Codes start at -1, so this never goes below zero.
    (self.code() + 1) as usize
  }

  pub fn label(self) -> &'static str {
    match self {
      OrderStatus::Cancelled => "cancelled",
      OrderStatus::OrderPending => "order-pending",
      OrderStatus::PaymentPending => "payment-pending",
      OrderStatus::PaymentComplete => "payment-complete",
      OrderStatus::ShippingPending => "shipping-pending",
      OrderStatus::ShippingInProgress => "shipping-in-progress",
      OrderStatus::Delivered => "delivered",
      OrderStatus::RefundPending => "refund-pending",
      OrderStatus::RefundComplete => "refund-complete",
      OrderStatus::ReturnPending => "return-pending",
      OrderStatus::ReturnComplete => "return-complete",
    }
  }

  /// Statuses reachable in one step from `self`.
  pub fn allowed_transitions(self) -> &'static [OrderStatus] {
    use OrderStatus::*;
    match self {
      OrderPending => &[PaymentPending, ShippingInProgress, Cancelled],
      PaymentPending => &[PaymentComplete, Cancelled],
      PaymentComplete => &[ShippingPending, RefundPending, Cancelled],
      ShippingPending => &[ShippingInProgress, RefundPending, Cancelled],
      ShippingInProgress => &[Delivered],
      Delivered => &[ReturnPending],
      RefundPending => &[RefundComplete],
      ReturnPending => &[ReturnComplete],
      Cancelled | RefundComplete | ReturnComplete => &[],
    }
  }

  /// Re-applying the current status always counts as legal.
  pub fn can_transition_to(self, next: OrderStatus) -> bool {
    self == next || self.allowed_transitions().contains(&next)
  }

  pub fn is_terminal(self) -> bool {
    self.allowed_transitions().is_empty()
  }
}

impl TryFrom<i32> for OrderStatus {
  type Error = UnknownStatusCode;

  fn try_from(code: i32) -> Result<Self, Self::Error> {
    OrderStatus::ALL
      .into_iter()
      .find(|status| status.code() == code)
      .ok_or(UnknownStatusCode(code))
  }
}

impl From<OrderStatus> for i32 {
  fn from(status: OrderStatus) -> Self {
    status.code()
  }
}

impl std::fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} ({})", self.label(), self.code())
  }
}

/// Delivery details; every field stays null until the customer supplies it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryInfo {
  pub receiver: Option<String>,
  pub address: Option<String>,
  pub phone_number: Option<String>,
}

impl DeliveryInfo {
  pub fn is_empty(&self) -> bool {
    self.receiver.is_none() && self.address.is_none() && self.phone_number.is_none()
  }

  /// Trims every field and turns blank values into `None`.
  pub fn normalized(self) -> Self {
    fn clean(value: Option<String>) -> Option<String> {
      value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
    }
    Self {
      receiver: clean(self.receiver),
      address: clean(self.address),
      phone_number: clean(self.phone_number),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id: i64,
  pub user_id: Uuid,
  pub order_item_ids: Vec<i64>,
  pub status: OrderStatus,
  pub receiver: Option<String>,
  pub address: Option<String>,
  pub phone_number: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Order {
  pub fn is_owned_by(&self, user_id: Uuid) -> bool {
    self.user_id == user_id
  }
}

/// An order together with its items joined with product display fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
  #[serde(flatten)]
  pub order: Order,
  pub order_items: Vec<OrderItemDetail>,
}

/// The result of checkout: the new order and the items created with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
  #[serde(flatten)]
  pub order: Order,
  pub order_items: Vec<OrderItem>,
}

impl PlacedOrder {
  pub fn total_amount(&self) -> i64 {
    order_total(&self.order_items)
  }
}

impl OrderDetail {
  pub fn total_amount(&self) -> i64 {
    order_total(&self.order_items)
  }
}
