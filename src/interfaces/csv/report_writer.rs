use crate::domain::catalog::CatalogItem;
use crate::domain::money::Money;
use crate::domain::order::OrderRecord;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct CatalogRow<'a> {
    id: &'a str,
    name: &'a str,
    description: &'a str,
    regular_price: String,
    sale_price: String,
    price: String,
}

#[derive(Serialize)]
struct OrderRow<'a> {
    order_id: &'a str,
    created_at: String,
    customer_id: &'a str,
    items: String,
    delivery_method: &'a str,
    delivery_fee: String,
    total: String,
    authorization: String,
}

fn sale_column(item: &CatalogItem) -> String {
    if item.on_sale() {
        item.sale_price.to_string()
    } else {
        String::new()
    }
}

fn money(value: Money) -> String {
    value.to_string()
}

/// Writes catalog and order listings as CSV.
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_catalog<'a, I>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a CatalogItem>,
    {
        for item in items {
            self.writer.serialize(CatalogRow {
                id: &item.id,
                name: &item.name,
                description: &item.description,
                regular_price: money(item.regular_price),
                sale_price: sale_column(item),
                price: money(item.effective_price()),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_orders<'a, I>(&mut self, orders: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a OrderRecord>,
    {
        for order in orders {
            let items = order
                .lines
                .iter()
                .map(|line| format!("{}x{}", line.item_id, line.quantity))
                .collect::<Vec<_>>()
                .join(";");
            self.writer.serialize(OrderRow {
                order_id: order.order_id.as_str(),
                created_at: order.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                customer_id: &order.customer_id,
                items,
                delivery_method: order.delivery_method.label(),
                delivery_fee: money(order.delivery_fee),
                total: money(order.total_amount),
                authorization: order
                    .authorization
                    .map(|token| token.to_string())
                    .unwrap_or_else(|| "Pending".to_string()),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
