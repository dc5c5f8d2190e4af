// storefront/src/models/mod.rs

//! Rows and payloads shared by the store, the pipelines and the client.

pub mod cart_item;
pub mod comment;
pub mod envelope;
pub mod order;
pub mod order_item;

pub use cart_item::CartLine;
pub use comment::{Comment, NewComment};
pub use envelope::Envelope;
pub use order::{DeliveryInfo, Order, OrderDetail, OrderStatus, PlacedOrder, UnknownStatusCode};
pub use order_item::{line_amount, order_total, NewOrderItem, OrderItem, OrderItemDetail};
