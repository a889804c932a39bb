//! Hostile receivers
//!
//! Code attached to attacker addresses that runs when the contract pays
//! them. Counters live behind `Rc` so the scenario can read them after
//! the receiver has been handed to the chain.

use std::cell::Cell;
use std::rc::Rc;

use types::numeric::Wei;
use vending_machine::chain::{Payment, Receiver, Reentry};
use vending_machine::errors::TransferError;
use vending_machine::events::ContractEvent;

/// What an attacker managed during its callbacks.
#[derive(Debug, Default)]
pub struct AttackStats {
    /// Times the receiver ran
    pub callbacks: Cell<u32>,
    /// Nested withdraw calls made
    pub reentries: Cell<u32>,
    /// Value paid out by nested withdraws
    pub extracted: Cell<Wei>,
}

impl AttackStats {
    fn add_extracted(&self, amount: Wei) {
        let total = self.extracted.get().checked_add(amount).unwrap_or(Wei::new(u128::MAX));
        self.extracted.set(total);
    }
}

/// Calls `withdraw` again from inside every payment, up to `depth` times.
pub struct ReentrantWithdrawer {
    depth: u32,
    stats: Rc<AttackStats>,
}

impl ReentrantWithdrawer {
    pub fn new(depth: u32) -> (Self, Rc<AttackStats>) {
        let stats = Rc::new(AttackStats::default());
        (
            Self {
                depth,
                stats: Rc::clone(&stats),
            },
            stats,
        )
    }
}

impl Receiver for ReentrantWithdrawer {
    fn on_receive(&mut self, _payment: Payment, mut call: Reentry<'_>) -> Result<(), TransferError> {
        self.stats.callbacks.set(self.stats.callbacks.get() + 1);

        for _ in 0..self.depth {
            self.stats.reentries.set(self.stats.reentries.get() + 1);
            match call.withdraw() {
                Ok(ContractEvent::Withdrawn(w)) => self.stats.add_extracted(w.amount),
                Ok(_) => {}
                // A failed nested call leaves the outer payment intact.
                Err(_) => break,
            }
        }
        Ok(())
    }
}

/// Refuses every payment, like an address with no way to accept value.
pub struct RejectingReceiver {
    reason: String,
    stats: Rc<AttackStats>,
}

impl RejectingReceiver {
    pub fn new(reason: impl Into<String>) -> (Self, Rc<AttackStats>) {
        let stats = Rc::new(AttackStats::default());
        (
            Self {
                reason: reason.into(),
                stats: Rc::clone(&stats),
            },
            stats,
        )
    }
}

impl Receiver for RejectingReceiver {
    fn on_receive(&mut self, _payment: Payment, _call: Reentry<'_>) -> Result<(), TransferError> {
        self.stats.callbacks.set(self.stats.callbacks.get() + 1);
        Err(TransferError::Rejected {
            reason: self.reason.clone(),
        })
    }
}
