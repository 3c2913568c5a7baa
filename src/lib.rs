//! Deposits token balances into vault contracts across several EVM networks.
//!
//! For each configured vault and network the account balance is read, the router's
//! allowance topped up when needed, and the balance deposited through the router.

pub mod account;
pub mod bindings;
pub mod calls;
pub mod chain;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod retry;
