//! Simulated participants
//!
//! - `customer`: random deposit / purchase / withdraw flow
//! - `attacker`: receivers that re-enter or refuse payment

pub mod customer;
pub mod attacker;
