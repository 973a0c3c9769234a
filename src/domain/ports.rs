use super::money::Money;
use super::payment::ChargeResult;
use async_trait::async_trait;
use std::io;
use std::sync::Arc;

/// Raw storage for named, whole-collection snapshots.
///
/// `read` distinguishes a location that was never written (`Ok(None)`) from one
/// that could not be read (`Err`).
#[async_trait]
pub trait CollectionBackend: Send + Sync {
    async fn read(&self, name: &str) -> io::Result<Option<Vec<u8>>>;
    async fn write(&self, name: &str, bytes: Vec<u8>) -> io::Result<()>;
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, card: &str, amount: Money) -> ChargeResult;
}

pub type CollectionBackendRef = Arc<dyn CollectionBackend>;
pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
