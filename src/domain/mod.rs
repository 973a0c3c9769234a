//! Domain model: catalog, cart pricing, customers, orders and the ports the
//! application layer talks through.

pub mod catalog;
pub mod customer;
pub mod ledger;
pub mod money;
pub mod order;
pub mod payment;
pub mod ports;
