use std::sync::Arc;

use tracing::{error, info, Instrument};

use cart_store::app_system::{setup_tracing, CartSystem};
use cart_store::cart_actor::{LogNotifier, UpdateProductAmount};
use cart_store::catalog::{Catalog, LocalCatalog, NewCatalogItem};
use cart_store::config::CartConfig;
use cart_store::domain::ProductId;

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = CartConfig::from_env().map_err(|e| e.to_string())?;
    info!(?config, "Starting cart session");

    // Without a remote catalog, serve a small in-process one.
    let (local_catalog, product_ids) = if config.catalog_url.is_none() {
        let (catalog, ids) = seed_local_catalog(config.mailbox_size).await?;
        (Some(catalog), ids)
    } else {
        (None, vec![1, 2, 3])
    };
    let catalog = local_catalog.clone().map(|catalog| Arc::new(catalog) as Arc<dyn Catalog>);

    let system = CartSystem::from_config(&config, catalog, Arc::new(LogNotifier))
        .map_err(|e| e.to_string())?;
    let client = system.cart_client.clone();
    info!(entries = client.cart().len(), "Cart restored");

    let span = tracing::info_span!("shopping_session");
    let session = async {
        let first = product_ids[0];
        let second = product_ids[1];
        let scarce = product_ids[2];

        client.add_product(first).await?;
        client.add_product(first).await?;
        client.add_product(second).await?;

        // A catalog price change does not reach entries already in the cart.
        if let Some(catalog) = &local_catalog {
            match catalog.reprice(second, 99.9).await {
                Ok(()) => info!(product_id = second, "Catalog price changed"),
                Err(e) => error!(product_id = second, error = %e, "Catalog price change failed"),
            }
        }

        client
            .update_product_amount(UpdateProductAmount { product_id: second, amount: 3 })
            .await?;

        // Only one unit in stock: the second add is rejected with a notice.
        client.add_product(scarce).await?;
        client.add_product(scarce).await?;

        client.remove_product(first).await
    }
    .instrument(span)
    .await;

    match session {
        Ok(cart) => {
            for entry in cart.entries() {
                info!(product_id = entry.id(), title = %entry.product.title, amount = entry.amount, "Cart entry");
            }
            info!(items = cart.item_count(), subtotal = cart.subtotal(), "Session finished");
        }
        Err(e) => error!(error = %e, "Cart store became unavailable"),
    }

    drop(client);
    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}

async fn seed_local_catalog(buffer_size: usize) -> Result<(LocalCatalog, Vec<ProductId>), String> {
    let (catalog, _handle) = LocalCatalog::spawn(buffer_size);
    let items = [
        NewCatalogItem::new("Tênis de Caminhada Leve Confortável", 179.9, 3).with_image("walk.jpg"),
        NewCatalogItem::new("Tênis VR Caminhada Confortável Detalhes Couro", 139.9, 5).with_image("vr.jpg"),
        NewCatalogItem::new("Tênis Adidas Duramo Lite 2.0", 219.9, 1).with_image("duramo.jpg"),
    ];

    let mut ids = Vec::with_capacity(items.len());
    for item in items {
        ids.push(catalog.list_product(item).await.map_err(|e| e.to_string())?);
    }
    Ok((catalog, ids))
}
