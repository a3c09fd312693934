use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

use super::actions::{CatalogAction, CatalogActionResult};
use super::Catalog;
use crate::actor_framework::{Entity, FrameworkError, ResourceActor, ResourceClient};
use crate::domain::{Product, ProductId, Stock};
use crate::error::CatalogError;

/// A product listed in the in-process catalog, together with its stock level.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    pub product: Product,
    pub stock: u32,
}

/// Parameters for listing a new product.
#[derive(Debug, Clone)]
pub struct NewCatalogItem {
    pub title: String,
    pub price: f64,
    pub image: String,
    pub stock: u32,
}

impl NewCatalogItem {
    pub fn new(title: impl Into<String>, price: f64, stock: u32) -> Self {
        Self {
            title: title.into(),
            price,
            image: String::new(),
            stock,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct CatalogPatch {
    pub price: Option<f64>,
    pub stock: Option<u32>,
}

impl Entity for CatalogItem {
    type Id = ProductId;
    type CreateParams = NewCatalogItem;
    type Patch = CatalogPatch;
    type Action = CatalogAction;
    type ActionResult = CatalogActionResult;

    fn from_create_params(id: ProductId, params: NewCatalogItem) -> Result<Self, String> {
        if !(params.price.is_finite() && params.price >= 0.0) {
            return Err(format!("Invalid price: {}", params.price));
        }
        Ok(Self {
            product: Product::new(id, params.title, params.price, params.image),
            stock: params.stock,
        })
    }

    /// Applies a reprice and/or restock.
    fn on_update(&mut self, patch: CatalogPatch) -> Result<(), String> {
        if let Some(price) = patch.price {
            if !(price.is_finite() && price >= 0.0) {
                return Err(format!("Invalid price: {}", price));
            }
            self.product.price = price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        Ok(())
    }

    fn handle_action(&mut self, action: CatalogAction) -> Result<CatalogActionResult, String> {
        match action {
            CatalogAction::CheckStock => Ok(CatalogActionResult::StockLevel(self.stock)),
        }
    }
}

/// In-process catalog backed by a [`ResourceActor`].
#[derive(Clone)]
pub struct LocalCatalog {
    inner: ResourceClient<CatalogItem>,
}

impl LocalCatalog {
    pub fn new(inner: ResourceClient<CatalogItem>) -> Self {
        Self { inner }
    }

    /// Starts the catalog actor. Product ids are handed out from 1 upwards.
    pub fn spawn(buffer_size: usize) -> (Self, JoinHandle<()>) {
        let counter = Arc::new(AtomicU64::new(1));
        let next_id = move || counter.fetch_add(1, Ordering::SeqCst);
        let (actor, client) = ResourceActor::<CatalogItem>::new(buffer_size, next_id);
        let handle = tokio::spawn(actor.run());
        (Self::new(client), handle)
    }

    #[instrument(skip(self), fields(title = %item.title))]
    pub async fn list_product(&self, item: NewCatalogItem) -> Result<ProductId, CatalogError> {
        debug!("Sending request");
        self.inner.create(item).await.map_err(|e| to_catalog_error(e, None))
    }

    #[instrument(skip(self))]
    pub async fn restock(&self, id: ProductId, stock: u32) -> Result<(), CatalogError> {
        debug!("Sending request");
        let patch = CatalogPatch { stock: Some(stock), ..Default::default() };
        self.inner.update(id, patch).await.map(|_| ()).map_err(|e| to_catalog_error(e, Some(id)))
    }

    #[instrument(skip(self))]
    pub async fn reprice(&self, id: ProductId, price: f64) -> Result<(), CatalogError> {
        debug!("Sending request");
        let patch = CatalogPatch { price: Some(price), ..Default::default() };
        self.inner.update(id, patch).await.map(|_| ()).map_err(|e| to_catalog_error(e, Some(id)))
    }

    #[instrument(skip(self))]
    pub async fn delist(&self, id: ProductId) -> Result<(), CatalogError> {
        debug!("Sending request");
        self.inner.delete(id).await.map_err(|e| to_catalog_error(e, Some(id)))
    }
}

#[async_trait]
impl Catalog for LocalCatalog {
    #[instrument(skip(self))]
    async fn stock(&self, id: ProductId) -> Result<Stock, CatalogError> {
        debug!("Sending request");
        match self.inner.perform_action(id, CatalogAction::CheckStock).await {
            Ok(CatalogActionResult::StockLevel(amount)) => Ok(Stock { amount }),
            Err(e) => Err(to_catalog_error(e, Some(id))),
        }
    }

    #[instrument(skip(self))]
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        debug!("Sending request");
        match self.inner.get(id).await {
            Ok(Some(item)) => Ok(item.product),
            Ok(None) => Err(CatalogError::NotFound(id)),
            Err(e) => Err(to_catalog_error(e, Some(id))),
        }
    }
}

fn to_catalog_error(e: FrameworkError, id: Option<ProductId>) -> CatalogError {
    match (e, id) {
        (FrameworkError::NotFound(_), Some(id)) => CatalogError::NotFound(id),
        (e, _) => CatalogError::Unavailable(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_and_lookup() {
        let (catalog, _handle) = LocalCatalog::spawn(8);
        let id = catalog
            .list_product(NewCatalogItem::new("Trail Runner", 179.9, 3).with_image("trail.png"))
            .await
            .unwrap();

        assert_eq!(catalog.stock(id).await.unwrap(), Stock { amount: 3 });
        let product = catalog.product(id).await.unwrap();
        assert_eq!(product.title, "Trail Runner");
        assert_eq!(product.image, "trail.png");
    }

    #[tokio::test]
    async fn test_restock_reprice_and_delist() {
        let (catalog, _handle) = LocalCatalog::spawn(8);
        let id = catalog.list_product(NewCatalogItem::new("Sandal", 49.0, 1)).await.unwrap();

        catalog.restock(id, 10).await.unwrap();
        catalog.reprice(id, 39.0).await.unwrap();
        assert_eq!(catalog.stock(id).await.unwrap().amount, 10);
        assert_eq!(catalog.product(id).await.unwrap().price, 39.0);

        catalog.delist(id).await.unwrap();
        assert_eq!(catalog.stock(id).await, Err(CatalogError::NotFound(id)));
        assert_eq!(catalog.product(id).await, Err(CatalogError::NotFound(id)));
    }

    #[tokio::test]
    async fn test_invalid_price_is_rejected() {
        let (catalog, _handle) = LocalCatalog::spawn(8);
        let result = catalog.list_product(NewCatalogItem::new("Bad", -1.0, 1)).await;
        assert!(matches!(result, Err(CatalogError::Unavailable(_))));

        let id = catalog.list_product(NewCatalogItem::new("Good", 1.0, 1)).await.unwrap();
        assert!(catalog.reprice(id, f64::NAN).await.is_err());
        assert_eq!(catalog.product(id).await.unwrap().price, 1.0);
    }
}
