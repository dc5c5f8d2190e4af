// storefront/src/client/controller.rs

//! Optimistic status updates against the cached order list.
//!
//! Idle -> Optimistic -> Reconciling | RolledBack -> Idle. The optimistic
//! patch is applied before the request leaves; success reconciles with a
//! refetch, failure restores the snapshot taken just before the patch. A
//! rollback is reported through the outcome and `last_error`.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::api::{ClientError, OrderApi};
use super::cache::{CacheSnapshot, OrderCache};
use crate::models::{Order, OrderStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationPhase {
  Idle,
  Optimistic { order_id: i64, status: OrderStatus },
  Reconciling { order_id: i64 },
  RolledBack { order_id: i64 },
}

#[derive(Debug)]
pub enum MutationOutcome {
  Committed(Order),
  RolledBack(Arc<ClientError>),
}

impl MutationOutcome {
  pub fn is_committed(&self) -> bool {
    matches!(self, MutationOutcome::Committed(_))
  }
}

/// A mutation whose optimistic patch is already visible in the cache.
#[derive(Debug)]
#[must_use = "a pending mutation must be completed or the cache keeps the optimistic value"]
pub struct PendingMutation {
  order_id: i64,
  status: OrderStatus,
  snapshot: CacheSnapshot,
}

pub struct OptimisticController<A: OrderApi> {
  api: A,
  cache: OrderCache,
  phase: Mutex<MutationPhase>,
  last_error: Mutex<Option<Arc<ClientError>>>,
}

impl<A: OrderApi> OptimisticController<A> {
  pub fn new(api: A, cache: OrderCache) -> Self {
    Self {
      api,
      cache,
      phase: Mutex::new(MutationPhase::Idle),
      last_error: Mutex::new(None),
    }
  }

  pub fn cache(&self) -> &OrderCache {
    &self.cache
  }

  pub fn api(&self) -> &A {
    &self.api
  }

  pub fn phase(&self) -> MutationPhase {
    self.phase.lock().clone()
  }

  /// Error from the most recent failed request, kept for the UI.
  pub fn last_error(&self) -> Option<Arc<ClientError>> {
    self.last_error.lock().clone()
  }

  fn set_phase(&self, phase: MutationPhase) {
    *self.phase.lock() = phase;
  }

  /// Loads the list from the server unless a mutation starts meanwhile.
  /// Returns whether the response was applied.
  #[instrument(name = "OptimisticController::refresh", skip(self))]
  pub async fn refresh(&self) -> Result<bool, Arc<ClientError>> {
    let ticket = self.cache.begin_refresh();
    match self.api.fetch_orders().await {
      Ok(orders) => Ok(self.cache.apply_refresh(ticket, orders)),
      Err(e) => {
        let e = Arc::new(e);
        warn!(error = %e, "Order refresh failed.");
        *self.last_error.lock() = Some(e.clone());
        Err(e)
      }
    }
  }

  /// Synchronous half of a mutation: cancel in-flight refreshes, snapshot,
  /// then patch the one matching order.
  pub fn begin(&self, order_id: i64, status: OrderStatus) -> PendingMutation {
    self.cache.cancel_refresh();
    let snapshot = self.cache.snapshot();
    self.cache.patch_status(order_id, status);
    self.set_phase(MutationPhase::Optimistic { order_id, status });
    PendingMutation {
      order_id,
      status,
      snapshot,
    }
  }

  /// Sends the mutation and reconciles or rolls back.
  #[instrument(name = "OptimisticController::complete", skip(self, pending), fields(order_id = pending.order_id, status = pending.status.code()))]
  pub async fn complete(&self, pending: PendingMutation) -> MutationOutcome {
    let PendingMutation {
      order_id,
      status,
      snapshot,
    } = pending;

    match self.api.update_order_status(order_id, status).await {
      Ok(order) => {
        self.set_phase(MutationPhase::Reconciling { order_id });
        *self.last_error.lock() = None;
        // The write is committed whatever the refetch does; a failed refetch
        // leaves the optimistic value in place and its error in `last_error`.
        if let Err(e) = self.refresh().await {
          warn!(error = %e, "Reconciling refetch failed; keeping optimistic value.");
        }
        self.set_phase(MutationPhase::Idle);
        info!("Status mutation committed.");
        MutationOutcome::Committed(order)
      }
      Err(e) => {
        let e = Arc::new(e);
        warn!(error = %e, "Status mutation failed; rolling back.");
        self.set_phase(MutationPhase::RolledBack { order_id });
        self.cache.restore(snapshot);
        *self.last_error.lock() = Some(e.clone());
        self.set_phase(MutationPhase::Idle);
        MutationOutcome::RolledBack(e)
      }
    }
  }

  pub async fn update_status(&self, order_id: i64, status: OrderStatus) -> MutationOutcome {
    let pending = self.begin(order_id, status);
    self.complete(pending).await
  }

  /// Processes payment for an order waiting on it.
  pub async fn pay(&self, order_id: i64) -> MutationOutcome {
    self.update_status(order_id, OrderStatus::ShippingInProgress).await
  }

  pub async fn cancel(&self, order_id: i64) -> MutationOutcome {
    self.update_status(order_id, OrderStatus::Cancelled).await
  }
}
