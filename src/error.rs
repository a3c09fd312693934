use thiserror::Error;

use crate::domain::ProductId;

/// Errors raised while running a cart operation.
///
/// Only [`CartError::Unavailable`] ever reaches a caller of
/// [`CartClient`](crate::clients::CartClient); the rest are turned into notices.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    StockExceeded { product_id: ProductId, requested: u64, available: u32 },
    #[error("Product not in cart: {0}")]
    EntryNotFound(ProductId),
    #[error("Catalog lookup failed: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Cart persistence failed: {0}")]
    Storage(#[from] StorageError),
    #[error("Cart store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    NotFound(ProductId),
    #[error("Catalog request failed: {0}")]
    Transport(String),
    #[error("Catalog returned status {status} for {path}")]
    Status { status: u16, path: String },
    #[error("Catalog response could not be decoded: {0}")]
    Decode(String),
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(String),
    #[error("Cart serialization error: {0}")]
    Serialize(String),
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialize(e.to_string())
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}
