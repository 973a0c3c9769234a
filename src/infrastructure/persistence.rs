use crate::domain::ports::CollectionBackendRef;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use tracing::{debug, warn};

/// Collection name used for customer accounts.
pub const CUSTOMERS: &str = "customers";
/// Collection name used for order records.
pub const ORDERS: &str = "orders";

/// Whether a `save` reached durable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Durability {
    Persisted,
    /// The write failed; the caller's in-memory collection is the only copy.
    MemoryOnly,
}

impl Durability {
    pub fn is_persisted(&self) -> bool {
        *self == Durability::Persisted
    }
}

/// A durable, ordered collection of one record kind.
///
/// `load` and `save` never fail towards the caller: a missing or unreadable
/// location loads as empty and a failed write is logged. Each instance owns
/// one named location; two stores never write atomically with each other.
pub struct PersistenceStore<T> {
    backend: CollectionBackendRef,
    name: String,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for PersistenceStore<T> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            name: self.name.clone(),
            _record: PhantomData,
        }
    }
}

impl<T> PersistenceStore<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(backend: CollectionBackendRef, name: impl Into<String>) -> Self {
        Self {
            backend,
            name: name.into(),
            _record: PhantomData,
        }
    }

    /// Reads the whole collection.
    pub async fn load(&self) -> Vec<T> {
        let bytes = match self.backend.read(&self.name).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(collection = %self.name, "no stored collection, starting empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(collection = %self.name, error = %e, "failed to read collection, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(records) => records,
            Err(e) => {
                warn!(collection = %self.name, error = %e, "stored collection has an unexpected shape, starting empty");
                Vec::new()
            }
        }
    }

    /// Overwrites the stored collection with `records`.
    pub async fn save(&self, records: &[T]) -> Durability {
        let bytes = match serde_json::to_vec_pretty(records) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(collection = %self.name, error = %e, "failed to encode collection");
                return Durability::MemoryOnly;
            }
        };

        match self.backend.write(&self.name, bytes).await {
            Ok(()) => {
                debug!(collection = %self.name, records = records.len(), "collection saved");
                Durability::Persisted
            }
            Err(e) => {
                warn!(collection = %self.name, error = %e, "failed to save collection, keeping it in memory only");
                Durability::MemoryOnly
            }
        }
    }
}
