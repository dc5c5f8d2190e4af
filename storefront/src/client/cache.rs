// storefront/src/client/cache.rs

//! Client-side copy of the order list.
//!
//! Only the optimistic controller writes to it. Refreshes are tagged with the
//! generation they started in; any mutation bumps the generation, so a refresh
//! that was already in flight lands on a stale ticket and is discarded.

use orderflow::ContextData;
use tracing::debug;

use crate::models::{OrderDetail, OrderStatus};

#[derive(Debug, Clone, Default)]
pub struct CacheState {
  pub orders: Option<Vec<OrderDetail>>,
  pub generation: u64,
}

/// Proof that a refresh started in a given generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
  generation: u64,
}

/// A deep copy of the cached list taken before an optimistic patch.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSnapshot(Option<Vec<OrderDetail>>);

#[derive(Debug, Clone, Default)]
pub struct OrderCache {
  state: ContextData<CacheState>,
}

impl OrderCache {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_orders(orders: Vec<OrderDetail>) -> Self {
    Self {
      state: ContextData::new(CacheState {
        orders: Some(orders),
        generation: 0,
      }),
    }
  }

  /// `None` until the first successful load.
  pub fn orders(&self) -> Option<Vec<OrderDetail>> {
    self.state.read().orders.clone()
  }

  pub fn status_of(&self, order_id: i64) -> Option<OrderStatus> {
    self
      .state
      .read()
      .orders
      .as_ref()?
      .iter()
      .find(|d| d.order.id == order_id)
      .map(|d| d.order.status)
  }

  pub fn generation(&self) -> u64 {
    self.state.read().generation
  }

  pub fn snapshot(&self) -> CacheSnapshot {
    CacheSnapshot(self.state.read().orders.clone())
  }

  pub fn restore(&self, snapshot: CacheSnapshot) {
    self.state.write().orders = snapshot.0;
  }

  /// Sets the status of the one order with `order_id`. Returns whether it was found.
  pub fn patch_status(&self, order_id: i64, status: OrderStatus) -> bool {
    let mut guard = self.state.write();
    let Some(detail) = guard
      .orders
      .as_mut()
      .and_then(|orders| orders.iter_mut().find(|d| d.order.id == order_id))
    else {
      debug!(order_id, "Order not in cache; nothing to patch.");
      return false;
    };
    detail.order.status = status;
    true
  }

  /// Invalidates every refresh started before this call.
  pub fn cancel_refresh(&self) {
    self.state.write().generation += 1;
  }

  pub fn begin_refresh(&self) -> RefreshTicket {
    RefreshTicket {
      generation: self.state.read().generation,
    }
  }

  /// Replaces the list with `orders` unless the ticket went stale.
  pub fn apply_refresh(&self, ticket: RefreshTicket, orders: Vec<OrderDetail>) -> bool {
    let mut guard = self.state.write();
    if guard.generation != ticket.generation {
      debug!(
        started_in = ticket.generation,
        current = guard.generation,
        "Discarding stale order refresh."
      );
      return false;
    }
    guard.orders = Some(orders);
    true
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::Order;
  use chrono::Utc;
  use uuid::Uuid;

  fn detail(id: i64, status: OrderStatus) -> OrderDetail {
    OrderDetail {
      order: Order {
        id,
        user_id: Uuid::nil(),
        order_item_ids: vec![id * 10],
        status,
        receiver: None,
        address: None,
        phone_number: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
      },
      order_items: Vec::new(),
    }
  }

  #[test]
  fn patch_touches_exactly_one_order() {
    let cache = OrderCache::with_orders(vec![
      detail(6, OrderStatus::OrderPending),
      detail(7, OrderStatus::OrderPending),
      detail(8, OrderStatus::OrderPending),
    ]);
    let before = cache.orders().unwrap();

    assert!(cache.patch_status(7, OrderStatus::ShippingInProgress));

    let after = cache.orders().unwrap();
    let changed: Vec<i64> = before
      .iter()
      .zip(&after)
      .filter(|(b, a)| b != a)
      .map(|(_, a)| a.order.id)
      .collect();
    assert_eq!(changed, vec![7]);
    assert_eq!(cache.status_of(7), Some(OrderStatus::ShippingInProgress));
  }

  #[test]
  fn patch_of_unknown_order_is_a_no_op() {
    let cache = OrderCache::with_orders(vec![detail(1, OrderStatus::OrderPending)]);
    assert!(!cache.patch_status(2, OrderStatus::Cancelled));
    assert!(!OrderCache::new().patch_status(1, OrderStatus::Cancelled));
  }

  #[test]
  fn restore_brings_back_the_snapshot() {
    let cache = OrderCache::with_orders(vec![detail(1, OrderStatus::OrderPending)]);
    let snapshot = cache.snapshot();
    cache.patch_status(1, OrderStatus::Cancelled);
    cache.restore(snapshot.clone());
    assert_eq!(cache.snapshot(), snapshot);
  }

  #[test]
  fn stale_refresh_is_discarded() {
    let cache = OrderCache::with_orders(vec![detail(1, OrderStatus::OrderPending)]);
    let ticket = cache.begin_refresh();
    cache.cancel_refresh();

    assert!(!cache.apply_refresh(ticket, Vec::new()));
    assert_eq!(cache.orders().map(|o| o.len()), Some(1));

    let fresh = cache.begin_refresh();
    assert!(cache.apply_refresh(fresh, Vec::new()));
    assert_eq!(cache.orders().map(|o| o.len()), Some(0));
  }
}
