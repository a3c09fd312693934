//! # cart-store
//!
//! Client-side shopping cart state, kept as a tokio actor.
//!
//! - **Domain types**: cart snapshots and catalog records → [`domain::Cart`], [`domain::Product`]
//! - **Cart store**: the actor that owns the cart → [`cart_actor::CartService`]
//! - **Client**: the cloneable handle the UI talks to → [`clients::CartClient`]
//! - **Catalog**: stock and product lookups → [`catalog::HttpCatalog`], [`catalog::LocalCatalog`]
//! - **Persisted mirror**: the cart as a JSON blob in a key-value store → [`storage::CartMirror`]
//! - **System**: startup, wiring, and shutdown → [`app_system::CartSystem`]
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use cart_store::app_system::CartSystem;
//! # use cart_store::cart_actor::LogNotifier;
//! # use cart_store::catalog::{LocalCatalog, NewCatalogItem};
//! # use cart_store::storage::{MemoryStore, DEFAULT_CART_KEY};
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let (catalog, _handle) = LocalCatalog::spawn(32);
//! let id = catalog.list_product(NewCatalogItem::new("Runner", 139.9, 5)).await?;
//!
//! let system = CartSystem::start(
//!     32,
//!     Arc::new(catalog),
//!     Arc::new(MemoryStore::new()),
//!     DEFAULT_CART_KEY,
//!     Arc::new(LogNotifier),
//! )?;
//! let cart = system.cart_client.add_product(id).await?;
//! assert_eq!(cart.amount_of(id), 1);
//! system.shutdown().await?;
//! # Ok(())
//! # }
//! ```

#[macro_use]
pub mod clients;

pub mod actor_framework;
pub mod app_system;
pub mod cart_actor;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod storage;

#[cfg(test)]
mod mock_framework;
