//! Counters for simulation runs
//!
//! Tracks accepted calls per event kind, rejected calls per error kind,
//! value moved in and out, and how often the solvency check ran.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use types::numeric::Wei;
use vending_machine::errors::ChainError;
use vending_machine::events::ContractEvent;

/// Aggregated simulation metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimMetrics {
    pub total_calls: u64,
    pub deposits: u64,
    pub purchases: u64,
    pub withdrawals: u64,
    pub restocks: u64,
    pub deposited: Wei,
    pub withdrawn: Wei,
    pub revenue: Wei,
    pub peanuts_sold: u64,
    pub peanuts_restocked: u64,
    /// Rejections keyed by error kind
    pub rejected: BTreeMap<String, u64>,
    pub invariant_checks: u64,
    pub invariant_failures: u64,
}

impl SimMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one chain call.
    pub fn record_call(&mut self, outcome: &Result<ContractEvent, ChainError>) {
        self.total_calls += 1;
        match outcome {
            Ok(event) => self.record_event(event),
            Err(err) => {
                *self.rejected.entry(err.kind().to_string()).or_insert(0) += 1;
            }
        }
    }

    /// Record a successful call's event.
    pub fn record_event(&mut self, event: &ContractEvent) {
        match event {
            ContractEvent::Deployed(_) => {}
            ContractEvent::Deposited(e) => {
                self.deposits += 1;
                self.deposited = add(self.deposited, e.amount);
            }
            ContractEvent::PeanutsPurchased(e) => {
                self.purchases += 1;
                self.peanuts_sold += e.count;
                self.revenue = add(self.revenue, e.cost);
            }
            ContractEvent::Withdrawn(e) => {
                self.withdrawals += 1;
                self.withdrawn = add(self.withdrawn, e.amount);
            }
            ContractEvent::Restocked(e) => {
                self.restocks += 1;
                self.peanuts_restocked += e.count;
            }
        }
    }

    /// Record one solvency check.
    pub fn record_invariant(&mut self, held: bool) {
        self.invariant_checks += 1;
        if !held {
            self.invariant_failures += 1;
        }
    }

    pub fn accepted_calls(&self) -> u64 {
        self.total_calls - self.rejected_calls()
    }

    pub fn rejected_calls(&self) -> u64 {
        self.rejected.values().sum()
    }

    /// Build a summary string.
    pub fn summary(&self) -> String {
        format!(
            "Calls: {} | Rejected: {} | Deposited: {} ETH | Withdrawn: {} ETH | Sold: {} | Revenue: {} ETH | Invariant failures: {}",
            self.total_calls,
            self.rejected_calls(),
            self.deposited.ether(),
            self.withdrawn.ether(),
            self.peanuts_sold,
            self.revenue.ether(),
            self.invariant_failures,
        )
    }
}

fn add(total: Wei, amount: Wei) -> Wei {
    total.checked_add(amount).unwrap_or(Wei::new(u128::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::Address;
    use vending_machine::errors::VendingError;
    use vending_machine::events::{Deposited, PeanutsPurchased};

    #[test]
    fn test_metrics_creation() {
        let metrics = SimMetrics::new();
        assert_eq!(metrics.total_calls, 0);
        assert_eq!(metrics.rejected_calls(), 0);
        assert_eq!(metrics.deposited, Wei::ZERO);
    }

    #[test]
    fn test_record_accepted_calls() {
        let mut metrics = SimMetrics::new();
        let account = Address::from_seed("alice");
        metrics.record_call(&Ok(ContractEvent::Deposited(Deposited {
            account,
            amount: Wei::from_ether(1),
            balance: Wei::from_ether(1),
        })));
        metrics.record_call(&Ok(ContractEvent::PeanutsPurchased(PeanutsPurchased {
            account,
            count: 3,
            cost: Wei::from_ether_str("0.3").unwrap(),
            remaining_stock: 7,
        })));

        assert_eq!(metrics.total_calls, 2);
        assert_eq!(metrics.accepted_calls(), 2);
        assert_eq!(metrics.peanuts_sold, 3);
        assert_eq!(metrics.revenue, Wei::from_ether_str("0.3").unwrap());
        assert_eq!(metrics.deposited, Wei::from_ether(1));
    }

    #[test]
    fn test_record_rejections_by_kind() {
        let mut metrics = SimMetrics::new();
        metrics.record_call(&Err(ChainError::Contract(VendingError::Unauthorized)));
        metrics.record_call(&Err(ChainError::Contract(VendingError::Unauthorized)));
        metrics.record_call(&Err(ChainError::NotDeployed));

        assert_eq!(metrics.rejected_calls(), 3);
        assert_eq!(metrics.rejected.get("unauthorized"), Some(&2));
        assert_eq!(metrics.rejected.get("not_deployed"), Some(&1));
        assert_eq!(metrics.accepted_calls(), 0);
    }

    #[test]
    fn test_invariant_failures_counted() {
        let mut metrics = SimMetrics::new();
        metrics.record_invariant(true);
        metrics.record_invariant(false);
        assert_eq!(metrics.invariant_checks, 2);
        assert_eq!(metrics.invariant_failures, 1);
    }

    #[test]
    fn test_summary_format() {
        let metrics = SimMetrics::new();
        let s = metrics.summary();
        assert!(s.contains("Calls: 0"));
        assert!(s.contains("Invariant failures: 0"));
    }
}
