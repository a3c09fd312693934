use serde::{Deserialize, Serialize};

/// Catalog-wide product identifier.
pub type ProductId = u64;

/// A product record as published by the catalog.
///
/// Fields the cart does not know about are kept in `extra` so they survive the
/// copy into a [`CartEntry`](super::CartEntry) and the round trip through the
/// persisted mirror.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default, alias = "name")]
    pub title: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub image: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Product {
    pub fn new(id: ProductId, title: impl Into<String>, price: f64, image: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            image: image.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Stock level reported by the catalog for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub amount: u32,
}
