//! Pooled binary-option markets.
//!
//! A [`MarketManager`] deploys [`Market`]s against an oracle key and strike.
//! Participants bid long or short while bidding is open, the market resolves
//! from the price feed at maturity, and winning options redeem against the
//! pooled deposits. Custody and prices come from injected [`utils::Ledger`]
//! and [`utils::PriceFeed`] implementations.

use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;
pub mod utils;

#[cfg(test)]
mod test_utils;

pub use errors::BinaryOptionError;
pub use instructions::*;
pub use state::*;

declare_id!("7dJVP79XrQxqEAbakdyJN6DVa3FzB2KCF4jdAxJPD7AQ");
