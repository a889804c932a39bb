//! Solvency audit
//!
//! Compares what the contract actually holds against what it owes: the
//! operator reserve plus every outstanding consumer deposit. A held balance
//! below that sum means value left the contract outside the ledger.

use serde::{Deserialize, Serialize};
use types::numeric::Wei;

/// Snapshot of held assets versus tracked obligations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolvencyReport {
    /// Asset balance actually held by the contract
    pub held: Wei,
    /// Operator reserve attached at construction
    pub reserve: Wei,
    /// Sum of all credited consumer deposits
    pub outstanding: Wei,
}

impl SolvencyReport {
    /// Reserve plus outstanding deposits. `None` if the sum overflows.
    pub fn obligations(&self) -> Option<Wei> {
        self.reserve.checked_add(self.outstanding)
    }

    /// `true` iff held assets cover every obligation.
    pub fn is_solvent(&self) -> bool {
        self.obligations().map_or(false, |owed| self.held >= owed)
    }

    /// Held assets above obligations (includes untracked purchase revenue).
    pub fn surplus(&self) -> Wei {
        self.obligations()
            .map_or(Wei::ZERO, |owed| self.held.saturating_sub(owed))
    }

    /// Obligations not covered by held assets.
    pub fn shortfall(&self) -> Wei {
        match self.obligations() {
            Some(owed) => owed.saturating_sub(self.held),
            None => Wei::new(u128::MAX),
        }
    }
}
