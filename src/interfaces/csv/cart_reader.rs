use crate::domain::catalog::{Catalog, CatalogItem};
use crate::error::{Result, StorefrontError};
use serde::Deserialize;
use std::io::Read;

/// One `item,quantity` row of a cart file.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct CartRow {
    pub item: String,
    pub quantity: i32,
}

impl CartRow {
    /// Looks the item up in `catalog` and checks the quantity is positive.
    pub fn resolve<'c>(&self, catalog: &'c Catalog) -> Result<(&'c CatalogItem, i32)> {
        let item = catalog
            .find(&self.item)
            .ok_or_else(|| StorefrontError::UnknownItem(self.item.clone()))?;
        if self.quantity <= 0 {
            return Err(StorefrontError::InvalidQuantity {
                item: self.item.clone(),
                quantity: self.quantity.to_string(),
            });
        }
        Ok((item, self.quantity))
    }
}

/// Reads cart rows from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over `Result<CartRow>`.
/// It handles whitespace trimming and flexible record lengths automatically.
pub struct CartReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CartReader<R> {
    /// Creates a new `CartReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes cart rows.
    pub fn rows(self) -> impl Iterator<Item = Result<CartRow>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(StorefrontError::from))
    }
}
