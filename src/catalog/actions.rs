/// Custom actions for catalog items.
#[derive(Debug, Clone)]
pub enum CatalogAction {
    /// Reads the current stock level without modifying it.
    CheckStock,
}

/// Results from [`CatalogAction`]s, one variant per action.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogActionResult {
    StockLevel(u32),
}
