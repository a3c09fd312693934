//! Catalog client for a remote catalog service, using reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use super::Catalog;
use crate::domain::{Product, ProductId, Stock};
use crate::error::CatalogError;

/// HTTP client for the catalog service.
///
/// Expects `GET {base}/stock/{id}` and `GET {base}/products/{id}` endpoints
/// returning JSON. Requests are not retried.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    base_url: Url,
    client: Client,
}

impl HttpCatalog {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { base_url, client })
    }

    fn endpoint(&self, path: &str) -> Result<Url, CatalogError> {
        // A base without a trailing slash would make `join` replace its last segment.
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        base.join(path)
            .map_err(|e| CatalogError::Transport(format!("Invalid catalog path {}: {}", path, e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, id: ProductId) -> Result<T, CatalogError> {
        let url = self.endpoint(path)?;
        debug!(url = %url, "Sending request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            warn!(path, "Catalog has no such product");
            return Err(CatalogError::NotFound(id));
        }
        if !status.is_success() {
            warn!(path, status = status.as_u16(), "Catalog request failed");
            return Err(CatalogError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Catalog for HttpCatalog {
    #[instrument(skip(self))]
    async fn stock(&self, id: ProductId) -> Result<Stock, CatalogError> {
        self.get_json(&format!("stock/{}", id), id).await
    }

    #[instrument(skip(self))]
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.get_json(&format!("products/{}", id), id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_for(server: &mockito::ServerGuard) -> HttpCatalog {
        let base = Url::parse(&server.url()).unwrap();
        HttpCatalog::new(base, Duration::from_secs(1)).unwrap()
    }

    #[tokio::test]
    async fn stock_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/stock/1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": 1, "amount": 5}"#)
            .create_async()
            .await;

        let stock = catalog_for(&server).stock(1).await.unwrap();
        assert_eq!(stock, Stock { amount: 5 });
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn product_success() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/products/2")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": 2, "title": "Court Classic", "price": 99.5, "image": "court.jpg"}"#)
            .create_async()
            .await;

        let product = catalog_for(&server).product(2).await.unwrap();
        assert_eq!(product.title, "Court Classic");
        assert_eq!(product.price, 99.5);
    }

    #[tokio::test]
    async fn base_path_is_preserved() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/stock/4")
            .with_status(200)
            .with_body(r#"{"amount": 0}"#)
            .create_async()
            .await;

        let base = Url::parse(&format!("{}/api", server.url())).unwrap();
        let catalog = HttpCatalog::new(base, Duration::from_secs(1)).unwrap();
        assert_eq!(catalog.stock(4).await.unwrap().amount, 0);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn not_found_maps_to_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _m = server.mock("GET", "/stock/9").with_status(404).create_async().await;

        assert_eq!(catalog_for(&server).stock(9).await, Err(CatalogError::NotFound(9)));
    }

    #[tokio::test]
    async fn server_error_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/products/3")
            .with_status(500)
            .expect(1)
            .create_async()
            .await;

        let result = catalog_for(&server).product(3).await;
        assert!(matches!(result, Err(CatalogError::Status { status: 500, .. })));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/stock/1")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        assert!(matches!(catalog_for(&server).stock(1).await, Err(CatalogError::Decode(_))));
    }
}
