use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::cart_actor::{CartService, Notifier};
use crate::catalog::{Catalog, HttpCatalog};
use crate::clients::CartClient;
use crate::config::CartConfig;
use crate::error::{CartError, CatalogError, StorageError};
use crate::storage::{CartMirror, FileStore, KeyValueStore};

/// The running cart store: the actor task plus the handle used to talk to it.
///
/// Responsible for seeding the cart from the mirror, starting the actor, and
/// shutting it down.
pub struct CartSystem {
    pub cart_client: CartClient,
    handle: JoinHandle<()>,
}

impl CartSystem {
    /// Loads the persisted cart and starts the store.
    pub fn start(
        mailbox_size: usize,
        catalog: Arc<dyn Catalog>,
        store: Arc<dyn KeyValueStore>,
        storage_key: impl Into<String>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, StorageError> {
        let mirror = CartMirror::new(store, storage_key);
        let initial = mirror.load()?;
        info!(key = %mirror.key(), entries = initial.len(), "Starting cart system");

        let (service, cart_client) = CartService::new(mailbox_size, initial, catalog, mirror, notifier);
        let handle = tokio::spawn(service.run());

        Ok(Self { cart_client, handle })
    }

    /// Starts the store from configuration, with the mirror in a [`FileStore`].
    ///
    /// `local_catalog` is used when no catalog URL is configured.
    pub fn from_config(
        config: &CartConfig,
        local_catalog: Option<Arc<dyn Catalog>>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, CartError> {
        let catalog: Arc<dyn Catalog> = match (&config.catalog_url, local_catalog) {
            (Some(url), _) => Arc::new(HttpCatalog::new(url.clone(), config.request_timeout)?),
            (None, Some(local)) => local,
            (None, None) => {
                return Err(CatalogError::Unavailable("No catalog URL configured".to_string()).into())
            }
        };
        let store = Arc::new(FileStore::new(config.storage_dir.clone()));
        Ok(Self::start(config.mailbox_size, catalog, store, config.storage_key.clone(), notifier)?)
    }

    /// Drops this system's client handle and waits for the actor to drain its mailbox.
    ///
    /// Clones of the client held elsewhere keep the actor alive, so drop those first.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down cart system...");
        drop(self.cart_client);

        if let Err(e) = self.handle.await {
            error!("Cart actor task failed: {:?}", e);
            return Err(format!("Cart actor task failed: {:?}", e));
        }

        info!("Cart system shutdown complete.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart_actor::LogNotifier;
    use crate::catalog::{LocalCatalog, NewCatalogItem};
    use crate::storage::{MemoryStore, DEFAULT_CART_KEY};

    #[tokio::test]
    async fn test_start_seeds_from_mirror_and_shuts_down() {
        let (catalog, _catalog_handle) = LocalCatalog::spawn(8);
        let id = catalog.list_product(NewCatalogItem::new("Slip-on", 80.0, 4)).await.unwrap();
        let stored = format!(r#"[{{"id":{},"title":"Slip-on","price":80.0,"image":"","amount":2}}]"#, id);
        let store = Arc::new(MemoryStore::with_blob(DEFAULT_CART_KEY, stored));

        let system = CartSystem::start(4, Arc::new(catalog), store, DEFAULT_CART_KEY, Arc::new(LogNotifier)).unwrap();
        assert_eq!(system.cart_client.cart().amount_of(id), 2);

        let cart = system.cart_client.add_product(id).await.unwrap();
        assert_eq!(cart.amount_of(id), 3);

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_from_config_requires_a_catalog() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = CartConfig {
            storage_dir: dir.path().to_path_buf(),
            ..CartConfig::default()
        };

        let result = CartSystem::from_config(&config, None, Arc::new(LogNotifier));
        assert!(matches!(result, Err(CartError::Catalog(CatalogError::Unavailable(_)))));
    }

    #[tokio::test]
    async fn test_from_config_uses_file_store() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = CartConfig {
            storage_dir: dir.path().join("cart"),
            ..CartConfig::default()
        };
        let (catalog, _catalog_handle) = LocalCatalog::spawn(8);
        let id = catalog.list_product(NewCatalogItem::new("Loafer", 120.0, 2)).await.unwrap();

        let system = CartSystem::from_config(&config, Some(Arc::new(catalog)), Arc::new(LogNotifier)).unwrap();
        system.cart_client.add_product(id).await.unwrap();
        system.shutdown().await.unwrap();

        let reloaded = CartMirror::new(Arc::new(FileStore::new(dir.path().join("cart"))), DEFAULT_CART_KEY)
            .load()
            .unwrap();
        assert_eq!(reloaded.amount_of(id), 1);
    }
}
