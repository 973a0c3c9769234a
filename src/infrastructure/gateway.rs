use crate::domain::money::Money;
use crate::domain::order::AuthorizationToken;
use crate::domain::payment::{ChargeResult, DenialReason};
use crate::domain::ports::PaymentGateway;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};
use tracing::info;

/// Marker that makes a card number fail format checks.
pub const INVALID_CARD_MARKER: &str = "invalid";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GatewayConfig {
    /// Chance that a well-formed card is declined, in `0.0..=1.0`.
    pub decline_probability: f64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            decline_probability: 0.2,
        }
    }
}

/// A stand-in for the external payer.
///
/// Malformed cards are always declined; well-formed cards are declined at
/// random with `decline_probability`, otherwise approved with a fresh
/// four-digit authorization token.
pub struct SimulatedGateway<R = StdRng> {
    config: GatewayConfig,
    rng: Mutex<R>,
}

impl SimulatedGateway<StdRng> {
    /// Creates a gateway seeded from the operating system.
    pub fn new(config: GatewayConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Creates a gateway whose decisions are reproducible for a given seed.
    pub fn seeded(config: GatewayConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SimulatedGateway<R> {
    pub fn with_rng(config: GatewayConfig, rng: R) -> Self {
        let decline_probability = if config.decline_probability.is_nan() {
            GatewayConfig::default().decline_probability
        } else {
            config.decline_probability.clamp(0.0, 1.0)
        };
        Self {
            config: GatewayConfig {
                decline_probability,
            },
            rng: Mutex::new(rng),
        }
    }

    pub fn config(&self) -> GatewayConfig {
        self.config
    }

    fn decide(&self, card: &str) -> ChargeResult {
        if card.trim().is_empty() || card.contains(INVALID_CARD_MARKER) {
            return ChargeResult::Declined {
                reason: DenialReason::InvalidCardFormat,
            };
        }

        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        if rng.gen_bool(self.config.decline_probability) {
            ChargeResult::Declined {
                reason: DenialReason::InsufficientFunds,
            }
        } else {
            ChargeResult::Approved {
                token: AuthorizationToken::random(&mut *rng),
            }
        }
    }
}

/// Shows only the last four characters of a card number.
pub fn mask_card(card: &str) -> String {
    let chars: Vec<char> = card.chars().collect();
    let visible = chars.len().min(4);
    let hidden = chars.len() - visible;
    let tail: String = chars[hidden..].iter().collect();
    format!("{}{}", "*".repeat(hidden), tail)
}

#[async_trait]
impl<R: Rng + Send> PaymentGateway for SimulatedGateway<R> {
    async fn charge(&self, card: &str, amount: Money) -> ChargeResult {
        let result = self.decide(card);
        match &result {
            ChargeResult::Approved { token } => {
                info!(card = %mask_card(card), %amount, %token, "charge approved");
            }
            ChargeResult::Declined { reason } => {
                info!(card = %mask_card(card), %amount, %reason, "charge declined");
            }
        }
        result
    }
}
