use crate::domain::{ProductId, Stock};
use crate::error::CartError;

/// Checks a requested amount against the stock the catalog just reported.
///
/// Returns the amount as stored in a cart entry. Nothing is reserved; the check
/// only holds at the moment the stock was read.
pub fn ensure_within_stock(product_id: ProductId, requested: u64, stock: Stock) -> Result<u32, CartError> {
    if requested > u64::from(stock.amount) {
        return Err(CartError::StockExceeded {
            product_id,
            requested,
            available: stock.amount,
        });
    }
    // requested <= stock.amount, which is a u32
    Ok(requested as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_stock_passes() {
        assert_eq!(ensure_within_stock(1, 5, Stock { amount: 5 }), Ok(5));
        assert_eq!(ensure_within_stock(1, 1, Stock { amount: 9 }), Ok(1));
    }

    #[test]
    fn above_stock_fails() {
        assert_eq!(
            ensure_within_stock(7, 6, Stock { amount: 5 }),
            Err(CartError::StockExceeded { product_id: 7, requested: 6, available: 5 })
        );
        assert!(ensure_within_stock(7, 1, Stock { amount: 0 }).is_err());
        assert!(ensure_within_stock(7, u64::from(u32::MAX) + 1, Stock { amount: u32::MAX }).is_err());
    }
}
