use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

use super::messages::{CartRequest, CartResponse, UpdateProductAmount};
use super::notify::{Notice, NoticeKind, Notifier};
use super::stock::ensure_within_stock;
use crate::catalog::Catalog;
use crate::clients::CartClient;
use crate::domain::{Cart, CartEntry, ProductId};
use crate::error::{CartError, CatalogError};
use crate::storage::CartMirror;

/// Outcome of a handler: the snapshot to commit, or `None` when nothing changes.
type Proposal = Result<Option<Cart>, CartError>;

/// Cart actor. Owns the only writable copy of the cart.
///
/// Requests are handled strictly one after another, including the catalog
/// lookups they wait on, so every operation starts from the snapshot the
/// previous one committed.
pub struct CartService {
    receiver: mpsc::Receiver<CartRequest>,
    catalog: Arc<dyn Catalog>,
    mirror: CartMirror,
    notifier: Arc<dyn Notifier>,
    cart: watch::Sender<Cart>,
}

impl CartService {
    pub fn new(
        buffer_size: usize,
        initial: Cart,
        catalog: Arc<dyn Catalog>,
        mirror: CartMirror,
        notifier: Arc<dyn Notifier>,
    ) -> (Self, CartClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (cart, snapshots) = watch::channel(initial);
        let service = Self {
            receiver,
            catalog,
            mirror,
            notifier,
            cart,
        };
        (service, CartClient::new(sender, snapshots))
    }

    #[instrument(name = "cart_service", skip(self))]
    pub async fn run(mut self) {
        info!(entries = self.current().len(), "CartService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CartRequest::AddProduct { product_id, respond_to } => {
                    let proposal = self.handle_add_product(product_id).await;
                    self.settle(proposal, NoticeKind::AddFailed, product_id, respond_to);
                }
                CartRequest::RemoveProduct { product_id, respond_to } => {
                    let proposal = self.handle_remove_product(product_id);
                    self.settle(proposal, NoticeKind::RemoveFailed, product_id, respond_to);
                }
                CartRequest::UpdateProductAmount { update, respond_to } => {
                    let proposal = self.handle_update_product_amount(update).await;
                    self.settle(proposal, NoticeKind::UpdateFailed, update.product_id, respond_to);
                }
            }
        }

        info!("CartService stopped");
    }

    fn current(&self) -> Cart {
        self.cart.borrow().clone()
    }

    #[instrument(skip(self))]
    async fn handle_add_product(&self, product_id: ProductId) -> Proposal {
        debug!("Processing add_product request");
        let current = self.current();

        let stock = self.catalog.stock(product_id).await?;
        let desired = u64::from(current.amount_of(product_id)) + 1;
        let amount = ensure_within_stock(product_id, desired, stock)?;

        if current.get(product_id).is_some() {
            return Ok(current.with_amount(product_id, amount));
        }

        let product = self.catalog.product(product_id).await?;
        if product.id != product_id {
            return Err(CatalogError::Decode(format!(
                "Catalog returned product {} for {}",
                product.id, product_id
            ))
            .into());
        }
        info!(title = %product.title, "Adding new product to cart");
        Ok(current.with_entry(CartEntry::first(product)))
    }

    #[instrument(skip(self))]
    fn handle_remove_product(&self, product_id: ProductId) -> Proposal {
        debug!("Processing remove_product request");
        self.current()
            .without(product_id)
            .map(Some)
            .ok_or(CartError::EntryNotFound(product_id))
    }

    #[instrument(skip(self))]
    async fn handle_update_product_amount(&self, update: UpdateProductAmount) -> Proposal {
        debug!("Processing update_product_amount request");
        if update.amount <= 0 {
            debug!("Ignoring non-positive amount");
            return Ok(None);
        }

        let stock = self.catalog.stock(update.product_id).await?;
        let amount = ensure_within_stock(update.product_id, update.amount.unsigned_abs(), stock)?;

        self.current()
            .with_amount(update.product_id, amount)
            .map(Some)
            .ok_or(CartError::EntryNotFound(update.product_id))
    }

    /// Commits an accepted proposal, or reports why it failed, then answers the caller
    /// with whatever snapshot is current afterwards.
    fn settle(&self, proposal: Proposal, failure: NoticeKind, product_id: ProductId, respond_to: CartResponse) {
        let outcome = proposal.and_then(|next| match next {
            Some(cart) => self.commit(cart),
            None => Ok(()),
        });

        if let Err(error) = outcome {
            let kind = match error {
                CartError::StockExceeded { .. } => NoticeKind::StockExceeded,
                _ => failure,
            };
            warn!(product_id, error = %error, ?kind, "Cart operation failed");
            self.notifier.notify(Notice::new(kind, product_id));
        }

        let _ = respond_to.send(self.current());
    }

    /// Writes the mirror first; memory only moves once the write has succeeded.
    fn commit(&self, cart: Cart) -> Result<(), CartError> {
        self.mirror.save(&cart)?;
        info!(entries = cart.len(), items = cart.item_count(), "Cart committed");
        self.cart.send_replace(cart);
        Ok(())
    }
}
