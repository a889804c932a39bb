//! Contract-specific error types
//!
//! Error taxonomy for the vending machine, its transfer port, and the
//! in-process chain runtime. Display strings are stable and safe to match on.

use thiserror::Error;
use types::ids::Address;
use types::numeric::Wei;

/// Vending machine errors. Every variant is an atomic rejection.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VendingError {
    #[error("You must have at least {} ether to initiate transaction", .minimum.ether())]
    InsufficientDeposit { minimum: Wei },

    #[error("Ownable: caller is not the owner")]
    Unauthorized,

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: Wei, available: Wei },

    #[error("Not enough peanuts in stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u64, available: u64 },

    #[error("Peanut count must be positive")]
    InvalidCount,

    #[error("Failed to send Ether: {0}")]
    TransferFailed(#[from] TransferError),

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,
}

/// Outbound transfer failures reported by a `Host`
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransferError {
    #[error("Recipient rejected transfer: {reason}")]
    Rejected { reason: String },

    #[error("Contract balance too low for transfer")]
    InsufficientBalance,

    #[error("Arithmetic overflow crediting recipient")]
    Overflow,
}

/// Runtime errors from the in-process chain
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChainError {
    #[error("Insufficient balance for {account}: required {required}, available {available}")]
    InsufficientBalance {
        account: Address,
        required: Wei,
        available: Wei,
    },

    #[error("Contract not deployed")]
    NotDeployed,

    #[error("Contract already deployed")]
    AlreadyDeployed,

    #[error("Arithmetic overflow in account balance")]
    Overflow,

    #[error("{0}")]
    Contract(#[from] VendingError),
}

impl VendingError {
    /// Short machine-readable name of the rejection kind.
    pub fn kind(&self) -> &'static str {
        match self {
            VendingError::InsufficientDeposit { .. } => "insufficient_deposit",
            VendingError::Unauthorized => "unauthorized",
            VendingError::InsufficientFunds { .. } => "insufficient_funds",
            VendingError::InsufficientStock { .. } => "insufficient_stock",
            VendingError::InvalidCount => "invalid_count",
            VendingError::TransferFailed(_) => "transfer_failed",
            VendingError::Overflow => "overflow",
        }
    }
}

impl ChainError {
    /// Short machine-readable name; contract rejections keep their own kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ChainError::InsufficientBalance { .. } => "insufficient_balance",
            ChainError::NotDeployed => "not_deployed",
            ChainError::AlreadyDeployed => "already_deployed",
            ChainError::Overflow => "balance_overflow",
            ChainError::Contract(err) => err.kind(),
        }
    }
}
