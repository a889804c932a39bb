//! Vending Machine Simulation Framework
//!
//! Drives the peanut vending machine contract with seeded random customers
//! and hostile receivers, checking solvency after every call.
//!
//! # Modules
//! - `bots` — Random customers and re-entrant / refusing attackers
//! - `scenarios` — Random workload, re-entrancy attack, failing receiver
//! - `metrics` — Call, value and rejection counters
//! - `export` — JSON export of scenario results

pub mod bots;
pub mod scenarios;
pub mod metrics;
pub mod export;

/// Crate version constant
pub const VERSION: &str = "1.0.0";
