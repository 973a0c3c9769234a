use crate::domain::customer::CustomerAccount;
use crate::error::{Result, StorefrontError};
use crate::infrastructure::persistence::{Durability, PersistenceStore};
use tracing::info;

/// The registered customers, loaded once and written back on every change.
///
/// The in-memory list is authoritative for the rest of the process even if a
/// save fails.
pub struct CustomerDirectory {
    store: PersistenceStore<CustomerAccount>,
    customers: Vec<CustomerAccount>,
}

impl CustomerDirectory {
    pub async fn open(store: PersistenceStore<CustomerAccount>) -> Self {
        let customers = store.load().await;
        Self { store, customers }
    }

    pub fn all(&self) -> &[CustomerAccount] {
        &self.customers
    }

    pub fn find(&self, id: &str) -> Option<&CustomerAccount> {
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn is_id_available(&self, id: &str) -> bool {
        self.find(id).is_none()
    }

    /// Adds a new account. IDs must be unique.
    pub async fn register(&mut self, account: CustomerAccount) -> Result<Durability> {
        if !self.is_id_available(&account.id) {
            return Err(StorefrontError::DuplicateCustomer(account.id));
        }
        info!(customer = %account.id, "customer registered");
        self.customers.push(account);
        Ok(self.store.save(&self.customers).await)
    }

    /// Replaces the card on file for `id`.
    pub async fn update_card(&mut self, id: &str, card: &str) -> Result<Durability> {
        let account = self
            .customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StorefrontError::CustomerNotFound(id.to_string()))?;
        account.replace_card(card);
        info!(customer = %id, "card on file updated");
        Ok(self.store.save(&self.customers).await)
    }

    /// Checks the password (exact) and the security answer (case-insensitive).
    pub fn authenticate(&self, id: &str, password: &str, answer: &str) -> Result<&CustomerAccount> {
        let account = self
            .find(id)
            .ok_or_else(|| StorefrontError::CustomerNotFound(id.to_string()))?;

        if account.verify_password(password) && account.verify_security_answer(answer) {
            Ok(account)
        } else {
            Err(StorefrontError::AuthenticationFailed(id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::customer::fixtures::customer;
    use crate::domain::ports::CollectionBackendRef;
    use crate::infrastructure::in_memory::InMemoryBackend;
    use crate::infrastructure::persistence::CUSTOMERS;
    use std::sync::Arc;

    fn store(backend: &CollectionBackendRef) -> PersistenceStore<CustomerAccount> {
        PersistenceStore::new(backend.clone(), CUSTOMERS)
    }

    #[tokio::test]
    async fn test_register_persists_and_rejects_duplicates() {
        let backend: CollectionBackendRef = Arc::new(InMemoryBackend::new());
        let mut directory = CustomerDirectory::open(store(&backend)).await;
        assert!(directory.all().is_empty());

        let durability = directory.register(customer("alice", "4111")).await.unwrap();
        assert_eq!(durability, Durability::Persisted);
        assert!(!directory.is_id_available("alice"));

        let dup = directory.register(customer("alice", "5500")).await;
        assert!(matches!(dup, Err(StorefrontError::DuplicateCustomer(id)) if id == "alice"));

        // A fresh directory sees the saved account
        let reopened = CustomerDirectory::open(store(&backend)).await;
        assert_eq!(reopened.all().len(), 1);
        assert_eq!(reopened.find("alice").unwrap().card, "4111");
    }

    #[tokio::test]
    async fn test_update_card() {
        let backend: CollectionBackendRef = Arc::new(InMemoryBackend::new());
        let mut directory = CustomerDirectory::open(store(&backend)).await;
        directory.register(customer("alice", "4111")).await.unwrap();

        directory.update_card("alice", "6011").await.unwrap();
        assert_eq!(directory.find("alice").unwrap().card, "6011");

        let reopened = CustomerDirectory::open(store(&backend)).await;
        assert_eq!(reopened.find("alice").unwrap().card, "6011");

        assert!(matches!(
            directory.update_card("bob", "6011").await,
            Err(StorefrontError::CustomerNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_authenticate() {
        let backend: CollectionBackendRef = Arc::new(InMemoryBackend::new());
        let mut directory = CustomerDirectory::open(store(&backend)).await;
        directory.register(customer("alice", "4111")).await.unwrap();

        assert!(directory.authenticate("alice", "Secret#1", "REX").is_ok());
        assert!(matches!(
            directory.authenticate("alice", "wrong", "Rex"),
            Err(StorefrontError::AuthenticationFailed(_))
        ));
        assert!(matches!(
            directory.authenticate("alice", "Secret#1", "Max"),
            Err(StorefrontError::AuthenticationFailed(_))
        ));
        assert!(matches!(
            directory.authenticate("bob", "Secret#1", "Rex"),
            Err(StorefrontError::CustomerNotFound(_))
        ));
    }
}
