//! The cart store: an actor that owns the cart and applies add, remove and
//! update operations one at a time.

mod messages;
pub mod notify;
pub mod service;
pub mod stock;

pub use messages::*;
pub use notify::*;
pub use service::CartService;
pub use stock::ensure_within_stock;
