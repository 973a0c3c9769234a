use crate::domain::ports::CollectionBackend;
use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory collection backend.
///
/// Uses `Arc<RwLock<HashMap<String, Vec<u8>>>>` so clones share the same
/// snapshots. Ideal for testing or for runs where persistence is not required.
#[derive(Debug, Default, Clone)]
pub struct InMemoryBackend {
    collections: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryBackend {
    /// Creates a new, empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CollectionBackend for InMemoryBackend {
    async fn read(&self, name: &str) -> io::Result<Option<Vec<u8>>> {
        let collections = self.collections.read().await;
        Ok(collections.get(name).cloned())
    }

    async fn write(&self, name: &str, bytes: Vec<u8>) -> io::Result<()> {
        let mut collections = self.collections.write().await;
        collections.insert(name.to_string(), bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_read_write() {
        let backend = InMemoryBackend::new();
        assert!(backend.read("orders").await.unwrap().is_none());

        backend.write("orders", b"[1]".to_vec()).await.unwrap();
        assert_eq!(backend.read("orders").await.unwrap(), Some(b"[1]".to_vec()));

        // Locations are independent
        assert!(backend.read("customers").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_in_memory_clones_share_state() {
        let backend = InMemoryBackend::new();
        let clone = backend.clone();
        clone.write("customers", b"[]".to_vec()).await.unwrap();
        assert!(backend.read("customers").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_write_overwrites_snapshot() {
        let backend = InMemoryBackend::new();
        backend.write("orders", b"[1]".to_vec()).await.unwrap();
        backend.write("orders", b"[1,2]".to_vec()).await.unwrap();
        assert_eq!(
            backend.read("orders").await.unwrap(),
            Some(b"[1,2]".to_vec())
        );
    }
}
