// storefront/src/services/mod.rs

pub mod session;

pub use session::{HeaderSessionProvider, Session, SessionProvider};
