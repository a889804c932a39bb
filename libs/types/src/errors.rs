//! Error types for primitive value parsing
//!
//! Comprehensive error taxonomy using thiserror

use thiserror::Error;

/// Errors produced when parsing or converting asset amounts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Invalid ether amount: {0}")]
    Invalid(String),

    #[error("Ether amount must not be negative: {0}")]
    Negative(String),

    #[error("Ether amount has more than 18 decimal places: {0}")]
    TooPrecise(String),

    #[error("Amount out of range")]
    OutOfRange,
}

/// Errors produced when parsing an address
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Address must be 40 hex characters, got {len}")]
    InvalidLength { len: usize },

    #[error("Address contains non-hex characters: {0}")]
    InvalidHex(String),
}
