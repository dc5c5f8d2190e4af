// storefront/src/client/mod.rs

//! Client half of the order lifecycle: the HTTP API, the cached order list
//! and the optimistic-update controller that keeps them in step.

pub mod api;
pub mod cache;
pub mod controller;

pub use api::{ClientError, HttpOrderApi, OrderApi};
pub use cache::{OrderCache, RefreshTicket};
pub use controller::{MutationOutcome, MutationPhase, OptimisticController, PendingMutation};
