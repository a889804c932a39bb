//! Peanut Vending Machine Contract
//!
//! This crate implements a single-contract custody and inventory state
//! machine: consumers deposit ether, buy peanuts at a fixed price out of
//! their credited balance, and withdraw what is left; the owner restocks.
//! The contract can report whether its real balance still covers its ledger.
//!
//! # Modules
//! - `machine`: Contract state and its five operations plus queries
//! - `host`: Port through which the contract reads its balance and pays out
//! - `chain`: In-process runtime (balances, atomic calls, re-entrant receivers)
//! - `security`: Owner-only access control
//! - `audit`: Held balance versus obligations
//! - `events`: Contract events
//! - `errors`: Contract-specific error types
//!
//! # Version
//! v0.1.0 — initial implementation

pub mod errors;
pub mod events;
pub mod security;
pub mod audit;
pub mod host;
pub mod machine;
pub mod chain;

/// Contract ABI version — frozen after release
pub const CONTRACT_ABI_VERSION: &str = "1.0.0";
