use crate::application::customers::CustomerDirectory;
use crate::domain::customer::CustomerAccount;
use crate::domain::ledger::PricingLedger;
use crate::domain::money::Money;
use crate::domain::order::{AuthorizationToken, DeliveryMethod, OrderId, OrderRecord};
use crate::domain::payment::{ChargeResult, DenialReason};
use crate::domain::ports::PaymentGatewayBox;
use crate::error::{Result, StorefrontError};
use crate::infrastructure::gateway::mask_card;
use crate::infrastructure::persistence::{Durability, PersistenceStore};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal_macros::dec;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Tunable limits of the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckoutPolicy {
    /// Charge attempts before the order is abandoned.
    pub max_attempts: u32,
    /// Flat fee for mail delivery. Pickup is always free.
    pub mail_fee: Money,
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            mail_fee: Money::new(dec!(3.00)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    Start,
    DeliverySelect,
    PaymentAttempt,
    Committed,
    Aborted,
}

/// Cart totals and delivery prices shown when choosing a delivery method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliveryQuote {
    pub subtotal: Money,
    pub tax: Money,
    pub cart_total: Money,
    pub mail_fee: Money,
}

impl DeliveryQuote {
    pub fn fee_for(&self, method: DeliveryMethod) -> Money {
        match method {
            DeliveryMethod::Mail => self.mail_fee,
            DeliveryMethod::InStorePickup => Money::ZERO,
        }
    }

    pub fn total_with(&self, method: DeliveryMethod) -> Money {
        self.cart_total + self.fee_for(method)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryChoice {
    Method(DeliveryMethod),
    Abort,
}

/// A declined charge that can still be retried.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decline {
    pub attempt: u32,
    pub attempts_left: u32,
    pub reason: DenialReason,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Try again with this card; it also becomes the card on file.
    RetryWith(String),
    Abort,
}

/// Supplies the customer's choices while a checkout is in progress.
pub trait CheckoutDriver {
    fn select_delivery(&mut self, quote: &DeliveryQuote) -> DeliveryChoice;
    fn after_decline(&mut self, decline: &Decline) -> RetryDecision;
}

/// A driver that replays a fixed delivery choice and a queue of
/// replacement cards. Once the queue runs dry, the next decline aborts.
#[derive(Debug, Clone)]
pub struct ScriptedDriver {
    delivery: DeliveryChoice,
    replacement_cards: VecDeque<String>,
    declines: Vec<Decline>,
}

impl ScriptedDriver {
    pub fn new(delivery: DeliveryChoice) -> Self {
        Self {
            delivery,
            replacement_cards: VecDeque::new(),
            declines: Vec::new(),
        }
    }

    pub fn with_replacement_cards<I, S>(mut self, cards: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.replacement_cards
            .extend(cards.into_iter().map(Into::into));
        self
    }

    /// Every decline the driver was asked about, in order.
    pub fn declines(&self) -> &[Decline] {
        &self.declines
    }
}

impl CheckoutDriver for ScriptedDriver {
    fn select_delivery(&mut self, _quote: &DeliveryQuote) -> DeliveryChoice {
        self.delivery
    }

    fn after_decline(&mut self, decline: &Decline) -> RetryDecision {
        self.declines.push(*decline);
        match self.replacement_cards.pop_front() {
            Some(card) => RetryDecision::RetryWith(card),
            None => RetryDecision::Abort,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The customer backed out while choosing delivery.
    DeliveryCancelled,
    /// The customer gave up after a declined charge.
    PaymentCancelled { attempts: u32 },
    /// Every allowed charge attempt was declined.
    MaxAttemptsReached {
        attempts: u32,
        last_reason: DenialReason,
    },
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::DeliveryCancelled => write!(f, "checkout cancelled at delivery selection"),
            AbortReason::PaymentCancelled { attempts } => {
                write!(f, "payment cancelled after {attempts} declined attempt(s)")
            }
            AbortReason::MaxAttemptsReached {
                attempts,
                last_reason,
            } => write!(
                f,
                "maximum payment attempts reached ({attempts}), last decline: {last_reason}"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    pub order: OrderRecord,
    /// `MemoryOnly` when the orders collection could not be written.
    pub durability: Durability,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutOutcome {
    Committed(PlacedOrder),
    Aborted(AbortReason),
}

impl CheckoutOutcome {
    pub fn state(&self) -> CheckoutState {
        match self {
            CheckoutOutcome::Committed(_) => CheckoutState::Committed,
            CheckoutOutcome::Aborted(_) => CheckoutState::Aborted,
        }
    }
}

/// Runs a cart through delivery selection, payment and order commit.
///
/// The ledger is only ever emptied by a successful commit; every other exit
/// leaves it exactly as it was.
pub struct CheckoutEngine {
    customers: PersistenceStore<CustomerAccount>,
    orders: PersistenceStore<OrderRecord>,
    gateway: PaymentGatewayBox,
    policy: CheckoutPolicy,
    order_ids: Mutex<StdRng>,
}

impl CheckoutEngine {
    pub fn new(
        customers: PersistenceStore<CustomerAccount>,
        orders: PersistenceStore<OrderRecord>,
        gateway: PaymentGatewayBox,
    ) -> Self {
        Self::with_policy(customers, orders, gateway, CheckoutPolicy::default())
    }

    pub fn with_policy(
        customers: PersistenceStore<CustomerAccount>,
        orders: PersistenceStore<OrderRecord>,
        gateway: PaymentGatewayBox,
        policy: CheckoutPolicy,
    ) -> Self {
        Self {
            customers,
            orders,
            gateway,
            policy,
            order_ids: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Makes generated order ids reproducible for a given seed.
    pub fn with_order_id_seed(mut self, seed: u64) -> Self {
        self.order_ids = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Checks out `ledger` for `customer_id`, charging `card` first.
    ///
    /// Returns `StorefrontError::EmptyCart` without contacting the payer when
    /// there is nothing to buy. Declines and cancellations are reported as
    /// `CheckoutOutcome::Aborted`.
    #[tracing::instrument(
        name = "checkout",
        skip(self, card, ledger, driver),
        fields(customer = %customer_id, lines = ledger.len())
    )]
    pub async fn checkout(
        &self,
        customer_id: &str,
        card: &str,
        ledger: &mut PricingLedger,
        driver: &mut dyn CheckoutDriver,
    ) -> Result<CheckoutOutcome> {
        let mut state = CheckoutState::Start;

        if ledger.is_empty() {
            warn!("checkout requested with an empty cart");
            return Err(StorefrontError::EmptyCart);
        }

        advance(&mut state, CheckoutState::DeliverySelect);
        let quote = DeliveryQuote {
            subtotal: ledger.subtotal(),
            tax: ledger.tax_amount(),
            cart_total: ledger.total(),
            mail_fee: self.policy.mail_fee,
        };
        let method = match driver.select_delivery(&quote) {
            DeliveryChoice::Method(method) => method,
            DeliveryChoice::Abort => {
                advance(&mut state, CheckoutState::Aborted);
                return Ok(CheckoutOutcome::Aborted(AbortReason::DeliveryCancelled));
            }
        };
        let delivery_fee = quote.fee_for(method);
        // Frozen for every attempt below, even if the card changes.
        let running_total = quote.total_with(method);
        info!(%method, %delivery_fee, %running_total, "delivery selected");

        advance(&mut state, CheckoutState::PaymentAttempt);
        let token = match self
            .authorize(customer_id, card, running_total, driver)
            .await
        {
            Ok(token) => token,
            Err(reason) => {
                advance(&mut state, CheckoutState::Aborted);
                return Ok(CheckoutOutcome::Aborted(reason));
            }
        };

        advance(&mut state, CheckoutState::Committed);
        let placed = self
            .commit(customer_id, ledger, method, delivery_fee, running_total, token)
            .await;
        Ok(CheckoutOutcome::Committed(placed))
    }

    async fn authorize(
        &self,
        customer_id: &str,
        card: &str,
        amount: Money,
        driver: &mut dyn CheckoutDriver,
    ) -> std::result::Result<AuthorizationToken, AbortReason> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut card = card.to_string();
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(attempt, max_attempts, card = %mask_card(&card), "charging card");

            let reason = match self.gateway.charge(&card, amount).await {
                ChargeResult::Approved { token } => return Ok(token),
                ChargeResult::Declined { reason } => reason,
            };

            let attempts_left = max_attempts - attempt;
            if attempts_left == 0 {
                warn!(attempts = attempt, %reason, "maximum payment attempts reached");
                return Err(AbortReason::MaxAttemptsReached {
                    attempts: attempt,
                    last_reason: reason,
                });
            }

            let decline = Decline {
                attempt,
                attempts_left,
                reason,
                amount,
            };
            match driver.after_decline(&decline) {
                RetryDecision::RetryWith(next_card) => {
                    if !self.store_card(customer_id, &next_card).await.is_persisted() {
                        warn!(customer = customer_id, "replacement card kept for this checkout only");
                    }
                    card = next_card;
                }
                RetryDecision::Abort => {
                    info!(attempts = attempt, "payment cancelled by customer");
                    return Err(AbortReason::PaymentCancelled { attempts: attempt });
                }
            }
        }
    }

    /// Writes a replacement card onto the customer's account before the
    /// next attempt is made.
    async fn store_card(&self, customer_id: &str, card: &str) -> Durability {
        let mut directory = CustomerDirectory::open(self.customers.clone()).await;
        match directory.update_card(customer_id, card).await {
            Ok(durability) => durability,
            Err(e) => {
                warn!(error = %e, "replacement card not saved");
                Durability::MemoryOnly
            }
        }
    }

    async fn commit(
        &self,
        customer_id: &str,
        ledger: &mut PricingLedger,
        method: DeliveryMethod,
        delivery_fee: Money,
        total: Money,
        token: AuthorizationToken,
    ) -> PlacedOrder {
        let mut orders = self.orders.load().await;
        let order_id = {
            let mut rng = self.order_ids.lock().unwrap_or_else(PoisonError::into_inner);
            unused_order_id(&orders, &mut *rng)
        };
        let order = OrderRecord::new(
            order_id,
            customer_id,
            ledger.snapshot(),
            total,
            method,
            delivery_fee,
        )
        .with_authorization(token);

        orders.push(order.clone());
        let durability = self.orders.save(&orders).await;
        if !durability.is_persisted() {
            warn!(order = %order.order_id, "order placed but not persisted");
        }
        ledger.clear();

        info!(order = %order.order_id, total = %order.total_amount, "order committed");
        PlacedOrder { order, durability }
    }
}

fn advance(state: &mut CheckoutState, next: CheckoutState) {
    debug!(from = ?*state, to = ?next, "checkout transition");
    *state = next;
}

fn unused_order_id<R: Rng + ?Sized>(existing: &[OrderRecord], rng: &mut R) -> OrderId {
    loop {
        let id = OrderId::generate(rng);
        if existing.iter().all(|order| order.order_id != id) {
            return id;
        }
    }
}
