//! Storage backends, the generic persistence store and the simulated payer.

pub mod file;
pub mod gateway;
pub mod in_memory;
pub mod persistence;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
