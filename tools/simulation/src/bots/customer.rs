//! Random customer bot
//!
//! Picks deposit, purchase and withdraw calls with a deterministic seeded
//! RNG. Deposit sizes are drawn around the minimum so a share of them
//! bounce off it.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::errors::AmountError;
use types::ids::Address;
use types::numeric::Wei;
use vending_machine::chain::Chain;
use vending_machine::errors::ChainError;
use vending_machine::events::ContractEvent;

/// Configuration for the random customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerConfig {
    /// Smallest deposit attempted, in ether
    pub min_deposit: Decimal,
    /// Largest deposit attempted, in ether
    pub max_deposit: Decimal,
    /// Largest peanut count asked for in one purchase
    pub max_purchase: u64,
    /// Probability of depositing when some credit is already held (0.0 to 1.0)
    pub deposit_ratio: f64,
    /// Probability of withdrawing instead of buying (0.0 to 1.0)
    pub withdraw_ratio: f64,
}

impl Default for CustomerConfig {
    fn default() -> Self {
        Self {
            min_deposit: Decimal::new(5, 2),
            max_deposit: Decimal::new(15, 1),
            max_purchase: 6,
            deposit_ratio: 0.3,
            withdraw_ratio: 0.15,
        }
    }
}

/// One call a customer decided to make.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerAction {
    Deposit(Wei),
    Purchase(u64),
    Withdraw,
}

/// Random customer with deterministic seeded RNG.
pub struct Customer {
    pub address: Address,
    pub config: CustomerConfig,
    pub actions_taken: usize,
    rng: ChaCha8Rng,
    min_deposit: Wei,
    max_deposit: Wei,
}

impl Customer {
    /// Create a customer with a deterministic seed.
    pub fn new(address: Address, config: CustomerConfig, seed: u64) -> Result<Self, AmountError> {
        let min_deposit = Wei::from_ether_decimal(config.min_deposit)?;
        let max_deposit = Wei::from_ether_decimal(config.max_deposit)?.max(min_deposit);
        Ok(Self {
            address,
            config,
            actions_taken: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            min_deposit,
            max_deposit,
        })
    }

    /// Pick the next call given the customer's current credited balance.
    ///
    /// Without credit the customer always deposits.
    pub fn next_action(&mut self, credited: Wei) -> CustomerAction {
        self.actions_taken += 1;

        if credited.is_zero() || self.rng.gen_bool(self.config.deposit_ratio) {
            return CustomerAction::Deposit(self.deposit_amount());
        }
        if self.rng.gen_bool(self.config.withdraw_ratio) {
            return CustomerAction::Withdraw;
        }
        let count = self.rng.gen_range(1..=self.config.max_purchase.max(1));
        CustomerAction::Purchase(count)
    }

    /// Decide and submit one call on `chain`.
    pub fn tick(&mut self, chain: &mut Chain) -> Result<ContractEvent, ChainError> {
        let credited = chain.machine()?.consumer_deposit_of(&self.address);
        match self.next_action(credited) {
            CustomerAction::Deposit(amount) => chain.deposit(self.address, amount),
            CustomerAction::Purchase(count) => chain.purchase(self.address, count),
            CustomerAction::Withdraw => chain.withdraw(self.address),
        }
    }

    fn deposit_amount(&mut self) -> Wei {
        // Whole milli-ether keeps logged amounts readable.
        const MILLI_ETHER: u128 = 1_000_000_000_000_000;
        let low = self.min_deposit.as_u128() / MILLI_ETHER;
        let high = (self.max_deposit.as_u128() / MILLI_ETHER).max(low);
        Wei::new(self.rng.gen_range(low..=high) * MILLI_ETHER)
    }
}
