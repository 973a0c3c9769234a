use super::money::Money;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// A product offered in the store.
///
/// Items are created once when the catalog is built and never change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub regular_price: Money,
    /// `0` or anything at or above the regular price means "not on sale".
    pub sale_price: Money,
}

impl CatalogItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        regular_price: Money,
        sale_price: Money,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            regular_price,
            sale_price,
        }
    }

    pub fn on_sale(&self) -> bool {
        self.sale_price.is_positive() && self.sale_price < self.regular_price
    }

    /// The unit price actually charged.
    pub fn effective_price(&self) -> Money {
        if self.on_sale() {
            self.sale_price
        } else {
            self.regular_price
        }
    }
}

/// The fixed set of items customers can buy.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    /// The store's standard product line.
    pub fn standard() -> Self {
        Self::new(vec![
            CatalogItem::new(
                "M001",
                "Laptop Pro",
                "High-performance laptop",
                Money::new(dec!(1200.00)),
                Money::new(dec!(1000.00)),
            ),
            CatalogItem::new(
                "M002",
                "Mechanical Keyboard",
                "RGB gaming keyboard",
                Money::new(dec!(80.00)),
                Money::ZERO,
            ),
            CatalogItem::new(
                "M003",
                "Wireless Mouse",
                "Ergonomic wireless mouse",
                Money::new(dec!(35.00)),
                Money::new(dec!(25.00)),
            ),
            CatalogItem::new(
                "M004",
                "USB-C Hub",
                "Multi-port adapter",
                Money::new(dec!(50.00)),
                Money::ZERO,
            ),
            CatalogItem::new(
                "M005",
                "External SSD 1TB",
                "Portable solid state drive",
                Money::new(dec!(150.00)),
                Money::new(dec!(130.00)),
            ),
        ])
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Looks an item up by ID, ignoring ASCII case.
    pub fn find(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id.eq_ignore_ascii_case(id))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}
