use tokio::sync::{mpsc, watch};

use crate::cart_actor::{CartRequest, UpdateProductAmount};
use crate::domain::{Cart, ProductId};
use crate::error::CartError;

/// Handle to the cart store.
///
/// Mutations are queued to the [`CartService`](crate::cart_actor::CartService) and
/// resolve to the snapshot left after they ran. A failed operation still resolves
/// `Ok`: its failure is raised as a notice, and the returned snapshot is the
/// unchanged cart. `Err` only means the store itself is gone.
#[derive(Clone)]
pub struct CartClient {
    sender: mpsc::Sender<CartRequest>,
    snapshots: watch::Receiver<Cart>,
}

impl CartClient {
    pub fn new(sender: mpsc::Sender<CartRequest>, snapshots: watch::Receiver<Cart>) -> Self {
        Self { sender, snapshots }
    }

    /// The most recently committed cart.
    pub fn cart(&self) -> Cart {
        self.snapshots.borrow().clone()
    }

    /// A receiver that is marked changed after every committed mutation.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        let mut receiver = self.snapshots.clone();
        receiver.mark_unchanged();
        receiver
    }
}

client_method!(CartClient => fn add_product(product_id: ProductId) -> Cart as CartRequest::AddProduct, Error = CartError);
client_method!(CartClient => fn remove_product(product_id: ProductId) -> Cart as CartRequest::RemoveProduct, Error = CartError);
client_method!(CartClient => fn update_product_amount(update: UpdateProductAmount) -> Cart as CartRequest::UpdateProductAmount, Error = CartError);
