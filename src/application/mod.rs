//! Application layer containing the storefront's use cases.
//!
//! `CheckoutEngine` drives a cart through delivery selection, bounded payment
//! retries and order commit. `CustomerDirectory` and `OrderHistory` cover the
//! account and order lookups around it.

pub mod checkout;
pub mod customers;
pub mod orders;
