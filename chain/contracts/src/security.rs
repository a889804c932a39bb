//! Access control for owner-only operations
//!
//! The contract has exactly one privileged identity, fixed at construction.
//! Authorization is a plain address comparison; there are no roles and no
//! ownership transfer.

use serde::{Deserialize, Serialize};
use types::ids::Address;

use crate::errors::VendingError;

/// Single-owner access control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ownable {
    owner: Address,
}

impl Ownable {
    /// Create access control owned by `owner`.
    pub fn new(owner: Address) -> Self {
        Self { owner }
    }

    /// Check if a caller is the owner.
    pub fn is_owner(&self, caller: &Address) -> bool {
        *caller == self.owner
    }

    /// Reject any caller other than the owner.
    pub fn only_owner(&self, caller: &Address) -> Result<(), VendingError> {
        if !self.is_owner(caller) {
            return Err(VendingError::Unauthorized);
        }
        Ok(())
    }

    /// Get the owner address.
    pub fn owner(&self) -> Address {
        self.owner
    }
}
