use super::money::Money;
use crate::error::StorefrontError;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const ORDER_ID_PREFIX: &str = "ORD-";
const ORDER_ID_LEN: usize = 8;
const ORDER_ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Order identifier of the form `ORD-XXXXXXXX` (uppercase alphanumerics).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderId(String);

impl OrderId {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let suffix: String = (0..ORDER_ID_LEN)
            .map(|_| ORDER_ID_CHARSET[rng.gen_range(0..ORDER_ID_CHARSET.len())] as char)
            .collect();
        Self(format!("{ORDER_ID_PREFIX}{suffix}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for OrderId {
    type Err = StorefrontError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = s
            .strip_prefix(ORDER_ID_PREFIX)
            .is_some_and(|suffix| {
                suffix.len() == ORDER_ID_LEN
                    && suffix
                        .bytes()
                        .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
            });
        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(StorefrontError::InvalidOrderId(s.to_string()))
        }
    }
}

impl TryFrom<String> for OrderId {
    type Error = StorefrontError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OrderId> for String {
    fn from(id: OrderId) -> Self {
        id.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Proof of payment returned by the payer: exactly four digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AuthorizationToken(u16);

impl AuthorizationToken {
    pub const MAX: u16 = 9999;

    pub fn new(code: u16) -> Option<Self> {
        (code <= Self::MAX).then_some(Self(code))
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(0..=Self::MAX))
    }
}

impl fmt::Display for AuthorizationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

impl TryFrom<String> for AuthorizationToken {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.len() != 4 || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("authorization token must be 4 digits, got {value:?}"));
        }
        value
            .parse::<u16>()
            .map(Self)
            .map_err(|e| e.to_string())
    }
}

impl From<AuthorizationToken> for String {
    fn from(token: AuthorizationToken) -> Self {
        token.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryMethod {
    #[serde(rename = "Mail Delivery")]
    Mail,
    #[serde(rename = "In-store Pickup")]
    InStorePickup,
}

impl DeliveryMethod {
    pub fn label(&self) -> &'static str {
        match self {
            DeliveryMethod::Mail => "Mail Delivery",
            DeliveryMethod::InStorePickup => "In-store Pickup",
        }
    }
}

impl fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub item_id: String,
    pub quantity: u32,
}

/// A committed purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: OrderId,
    pub created_at: DateTime<Utc>,
    pub customer_id: String,
    pub lines: Vec<OrderLine>,
    /// Items + tax + delivery fee.
    pub total_amount: Money,
    pub delivery_method: DeliveryMethod,
    pub delivery_fee: Money,
    pub authorization: Option<AuthorizationToken>,
}

impl OrderRecord {
    pub fn new(
        order_id: OrderId,
        customer_id: impl Into<String>,
        lines: Vec<OrderLine>,
        total_amount: Money,
        delivery_method: DeliveryMethod,
        delivery_fee: Money,
    ) -> Self {
        Self {
            order_id,
            created_at: Utc::now(),
            customer_id: customer_id.into(),
            lines,
            total_amount,
            delivery_method,
            delivery_fee,
            authorization: None,
        }
    }

    /// Attaches the payer's authorization. Called once, before the record is
    /// persisted.
    pub fn with_authorization(mut self, token: AuthorizationToken) -> Self {
        self.authorization = Some(token);
        self
    }
}
