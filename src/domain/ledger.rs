use super::catalog::CatalogItem;
use super::money::Money;
use super::order::OrderLine;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Sales tax applied to the cart subtotal.
pub const TAX_RATE: Decimal = dec!(0.08);

/// One entry in the cart: an item snapshot and how many of it.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub item: CatalogItem,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> Money {
        self.item.effective_price() * self.quantity
    }
}

/// What `PricingLedger::remove_line` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// The quantity was not positive, nothing changed.
    Ignored,
    NotInCart,
    Removed,
    Decremented { remaining: u32 },
}

/// The pre-checkout cart of one shopping session.
///
/// Lines are keyed by item ID and kept in insertion order. Every stored
/// quantity is strictly positive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricingLedger {
    lines: Vec<CartLine>,
}

impl PricingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` of `item`, accumulating onto an existing line.
    ///
    /// Non-positive quantities are ignored.
    pub fn add_line(&mut self, item: &CatalogItem, quantity: i32) {
        let Ok(quantity) = u32::try_from(quantity) else {
            return;
        };
        if quantity == 0 {
            return;
        }

        match self.position(&item.id) {
            Some(idx) => {
                let line = &mut self.lines[idx];
                line.quantity = line.quantity.saturating_add(quantity);
            }
            None => self.lines.push(CartLine {
                item: item.clone(),
                quantity,
            }),
        }
    }

    /// Removes `quantity` of `item`. Removing at least the current quantity
    /// drops the line entirely.
    pub fn remove_line(&mut self, item: &CatalogItem, quantity: i32) -> Removal {
        let Ok(quantity) = u32::try_from(quantity) else {
            return Removal::Ignored;
        };
        if quantity == 0 {
            return Removal::Ignored;
        }
        let Some(idx) = self.position(&item.id) else {
            return Removal::NotInCart;
        };

        let line = &mut self.lines[idx];
        if quantity >= line.quantity {
            self.lines.remove(idx);
            Removal::Removed
        } else {
            line.quantity -= quantity;
            Removal::Decremented {
                remaining: line.quantity,
            }
        }
    }

    pub fn quantity_of(&self, item_id: &str) -> u32 {
        self.position(item_id)
            .map(|idx| self.lines[idx].quantity)
            .unwrap_or(0)
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    pub fn tax_amount(&self) -> Money {
        self.subtotal().percent_of(TAX_RATE)
    }

    pub fn total(&self) -> Money {
        self.subtotal() + self.tax_amount()
    }

    /// The ordered `(item id, quantity)` pairs an order is built from.
    pub fn snapshot(&self) -> Vec<OrderLine> {
        self.lines
            .iter()
            .map(|line| OrderLine {
                item_id: line.item.id.clone(),
                quantity: line.quantity,
            })
            .collect()
    }

    fn position(&self, item_id: &str) -> Option<usize> {
        self.lines.iter().position(|line| line.item.id == item_id)
    }
}
