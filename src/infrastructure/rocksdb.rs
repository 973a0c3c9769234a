use crate::domain::ports::CollectionBackend;
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::io;
use std::path::Path;
use std::sync::Arc;

/// Column Family holding one snapshot per collection name.
pub const CF_COLLECTIONS: &str = "collections";

/// A persistent collection backend using RocksDB.
///
/// Each collection snapshot is stored as a single value keyed by the
/// collection name, so a save replaces the whole collection in one put.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbBackend {
    db: Arc<DB>,
}

impl RocksDbBackend {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the "collections" column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_collections = ColumnFamilyDescriptor::new(CF_COLLECTIONS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_collections])
            .map_err(io::Error::other)?;

        Ok(Self { db: Arc::new(db) })
    }
}

fn missing_cf() -> io::Error {
    io::Error::other("Collections column family not found")
}

#[async_trait]
impl CollectionBackend for RocksDbBackend {
    async fn read(&self, name: &str) -> io::Result<Option<Vec<u8>>> {
        let cf = self.db.cf_handle(CF_COLLECTIONS).ok_or_else(missing_cf)?;
        self.db
            .get_cf(&cf, name.as_bytes())
            .map_err(io::Error::other)
    }

    async fn write(&self, name: &str, bytes: Vec<u8>) -> io::Result<()> {
        let cf = self.db.cf_handle(CF_COLLECTIONS).ok_or_else(missing_cf)?;
        self.db
            .put_cf(&cf, name.as_bytes(), bytes)
            .map_err(io::Error::other)
    }
}
