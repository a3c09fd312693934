//! Product catalog lookups the cart depends on.
//!
//! The cart only ever reads two things from the catalog: the live stock level of a
//! product and its display record. [`HttpCatalog`] talks to a remote catalog
//! service; [`LocalCatalog`] keeps the catalog in-process on a
//! [`ResourceActor`](crate::actor_framework::ResourceActor).

mod actions;
pub mod http;
pub mod local;

use async_trait::async_trait;

use crate::domain::{Product, ProductId, Stock};
use crate::error::CatalogError;

pub use actions::*;
pub use http::HttpCatalog;
pub use local::{CatalogItem, LocalCatalog, NewCatalogItem};

#[async_trait]
pub trait Catalog: Send + Sync {
    /// Current stock level for `id`.
    async fn stock(&self, id: ProductId) -> Result<Stock, CatalogError>;

    /// Full display record for `id`.
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError>;
}
