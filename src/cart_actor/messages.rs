use tokio::sync::oneshot;

use crate::domain::{Cart, ProductId};

/// Every cart request is answered with the cart snapshot left after it ran.
pub type CartResponse = oneshot::Sender<Cart>;

/// Requested quantity for a product already in the cart.
///
/// `amount` is signed because it comes straight from UI input; values `<= 0`
/// are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

#[derive(Debug)]
pub enum CartRequest {
    AddProduct {
        product_id: ProductId,
        respond_to: CartResponse,
    },
    RemoveProduct {
        product_id: ProductId,
        respond_to: CartResponse,
    },
    UpdateProductAmount {
        update: UpdateProductAmount,
        respond_to: CartResponse,
    },
}
