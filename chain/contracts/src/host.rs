//! Host port — the contract's view of the surrounding runtime
//!
//! The contract never moves assets itself. It asks the host for its real
//! held balance and hands outbound payments to `Host::transfer`. A transfer
//! may run recipient code synchronously, and that code receives the machine
//! back, so it can call into the contract again before `transfer` returns.

use types::ids::Address;
use types::numeric::Wei;

use crate::errors::TransferError;
use crate::machine::VendingMachine;

/// Runtime capabilities injected into the contract.
pub trait Host {
    /// Asset balance actually held by the contract.
    fn self_balance(&self) -> Wei;

    /// Pay `amount` from the contract to `to`.
    ///
    /// Implementations may invoke recipient logic with `machine`, allowing
    /// re-entrant calls. On `Err` the implementation must have undone any
    /// balance movement and any state change made by that recipient logic.
    fn transfer(
        &mut self,
        machine: &mut VendingMachine,
        to: Address,
        amount: Wei,
    ) -> Result<(), TransferError>;
}
