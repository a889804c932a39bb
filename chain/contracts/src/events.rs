//! Contract events
//!
//! Events are immutable records emitted by successful contract operations.
//! A rejected call emits nothing, and a rolled-back call takes its events
//! with it.

use serde::{Deserialize, Serialize};
use types::ids::Address;
use types::numeric::Wei;

/// Contract constructed with the operator's reserve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployed {
    pub owner: Address,
    pub reserve: Wei,
}

/// Deposit credited to a consumer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposited {
    pub account: Address,
    pub amount: Wei,
    /// Credited balance after the deposit
    pub balance: Wei,
}

/// Peanuts bought out of a consumer's credited balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeanutsPurchased {
    pub account: Address,
    pub count: u64,
    pub cost: Wei,
    pub remaining_stock: u64,
}

/// Credited balance paid back to a consumer. `amount` is zero for a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawn {
    pub account: Address,
    pub amount: Wei,
}

/// Inventory replenished by the owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restocked {
    pub count: u64,
    pub stock: u64,
}

/// Enum wrapper for all contract events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractEvent {
    Deployed(Deployed),
    Deposited(Deposited),
    PeanutsPurchased(PeanutsPurchased),
    Withdrawn(Withdrawn),
    Restocked(Restocked),
}
