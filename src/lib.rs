//! Tariff
//!
//! Tariff prices a checkout by folding an ordered list of pricing rules over a
//! basket of item counts. Customers get their own rules applied ahead of a
//! shared default rule set.

pub mod basket;
pub mod calculator;
pub mod checkout;
pub mod config;
pub mod items;
pub mod loader;
pub mod logging;
pub mod prelude;
pub mod products;
pub mod receipt;
pub mod repository;
pub mod rules;
