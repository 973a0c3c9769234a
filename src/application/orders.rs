use crate::domain::order::{OrderId, OrderRecord};
use crate::infrastructure::persistence::PersistenceStore;

/// Read-only view over the stored orders.
pub struct OrderHistory {
    orders: Vec<OrderRecord>,
}

impl OrderHistory {
    pub async fn load(store: &PersistenceStore<OrderRecord>) -> Self {
        Self {
            orders: store.load().await,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// A customer's orders, most recent first.
    pub fn for_customer(&self, customer_id: &str) -> Vec<&OrderRecord> {
        let mut orders: Vec<&OrderRecord> = self
            .orders
            .iter()
            .filter(|order| order.customer_id == customer_id)
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }

    pub fn find(&self, order_id: &OrderId) -> Option<&OrderRecord> {
        self.orders.iter().find(|order| &order.order_id == order_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Money;
    use crate::domain::order::{DeliveryMethod, OrderLine};
    use crate::infrastructure::in_memory::InMemoryBackend;
    use crate::infrastructure::persistence::ORDERS;
    use chrono::{Duration, Utc};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn order(id: &str, customer: &str, minutes_ago: i64) -> OrderRecord {
        let mut order = OrderRecord::new(
            id.parse::<OrderId>().unwrap(),
            customer,
            vec![OrderLine {
                item_id: "M002".to_string(),
                quantity: 1,
            }],
            Money::new(dec!(86.40)),
            DeliveryMethod::InStorePickup,
            Money::ZERO,
        );
        order.created_at = Utc::now() - Duration::minutes(minutes_ago);
        order
    }

    #[tokio::test]
    async fn test_for_customer_newest_first() {
        let store: PersistenceStore<OrderRecord> =
            PersistenceStore::new(Arc::new(InMemoryBackend::new()), ORDERS);
        store
            .save(&[
                order("ORD-AAAAAAA1", "alice", 30),
                order("ORD-BBBBBBB2", "bob", 20),
                order("ORD-CCCCCCC3", "alice", 10),
            ])
            .await;

        let history = OrderHistory::load(&store).await;
        assert_eq!(history.for_customer("bob").len(), 1);

        let ids: Vec<&str> = history
            .for_customer("alice")
            .into_iter()
            .map(|o| o.order_id.as_str())
            .collect();
        assert_eq!(ids, ["ORD-CCCCCCC3", "ORD-AAAAAAA1"]);
        assert!(history.for_customer("carol").is_empty());

        let found = history.find(&"ORD-BBBBBBB2".parse::<OrderId>().unwrap()).unwrap();
        assert_eq!(found.customer_id, "bob");
        assert!(history.find(&"ORD-ZZZZZZZZ".parse::<OrderId>().unwrap()).is_none());
    }

    #[tokio::test]
    async fn test_empty_history() {
        let store: PersistenceStore<OrderRecord> =
            PersistenceStore::new(Arc::new(InMemoryBackend::new()), ORDERS);
        let history = OrderHistory::load(&store).await;
        assert!(history.is_empty());
    }
}
