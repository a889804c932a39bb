//! Scenario simulation modules
//!
//! Each scenario deploys a fresh machine on its own chain and checks that
//! the contract's balance covers reserve plus deposits throughout.

pub mod random_workload;
pub mod reentrancy_attack;
pub mod failing_receiver;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use types::errors::AmountError;
use types::ids::Address;
use types::numeric::Wei;
use vending_machine::audit::SolvencyReport;
use vending_machine::chain::Chain;
use vending_machine::errors::ChainError;

use crate::bots::customer::CustomerConfig;
use crate::metrics::SimMetrics;

/// Errors that stop a scenario from running at all.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Invalid amount in scenario config: {0}")]
    Amount(#[from] AmountError),

    #[error("Chain setup failed: {0}")]
    Chain(#[from] ChainError),

    #[error("Invalid scenario config: {0}")]
    Config(String),

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared scenario parameters, loadable from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Root seed; each bot derives its own from it
    pub seed: u64,
    /// Number of random customers
    pub customers: usize,
    /// Customer calls in the random workload
    pub steps: u64,
    /// Ether the owner sends at deployment
    pub reserve: Decimal,
    /// Ether minted to the owner and to every customer and attacker
    pub account_funding: Decimal,
    /// Owner restocks every this many steps (0 disables)
    pub restock_every: u64,
    /// Peanuts added per restock
    pub restock_count: u64,
    /// Number of re-entrant attackers
    pub attackers: usize,
    /// Nested withdraw calls each attacker makes per payment
    pub reentry_depth: u32,
    /// Ether each attacker deposits before withdrawing
    pub attacker_deposit: Decimal,
    pub customer: CustomerConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            customers: 5,
            steps: 500,
            reserve: Decimal::ONE,
            account_funding: Decimal::from(100),
            restock_every: 25,
            restock_count: 10,
            attackers: 2,
            reentry_depth: 3,
            attacker_deposit: Decimal::ONE,
            customer: CustomerConfig::default(),
        }
    }
}

impl ScenarioConfig {
    /// Parse a config from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file.
    pub fn load(path: &str) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.customer.max_purchase == 0 {
            return Err(SimError::Config("customer.max_purchase must be at least 1".into()));
        }
        for (name, p) in [
            ("customer.deposit_ratio", self.customer.deposit_ratio),
            ("customer.withdraw_ratio", self.customer.withdraw_ratio),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(SimError::Config(format!("{name} must be within 0.0..=1.0")));
            }
        }
        Ok(())
    }
}

/// Result of a scenario run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub seed: u64,
    pub steps_run: u64,
    pub events_emitted: usize,
    pub metrics: SimMetrics,
    pub final_report: SolvencyReport,
    pub passed: bool,
    pub details: String,
}

/// A chain with the machine deployed and the owner known.
pub struct Deployment {
    pub chain: Chain,
    pub owner: Address,
}

/// Fund the owner, deploy the machine with `config.reserve`, and log the
/// deployment the way a deploy script would.
pub fn deploy(config: &ScenarioConfig) -> Result<Deployment, SimError> {
    let owner = Address::from_seed("deployer");
    let mut chain = Chain::new(Address::from_seed("vending-machine"));
    chain.fund(owner, Wei::from_ether_decimal(config.account_funding)?)?;

    info!(account = %owner, "deploying contracts with the account");
    info!(balance = %chain.balance_of(&owner).ether(), "account balance");

    chain.deploy(owner, Wei::from_ether_decimal(config.reserve)?)?;
    info!(address = %chain.contract_address(), "contract deployed");

    Ok(Deployment { chain, owner })
}

/// Derive a per-bot seed from the root seed.
pub(crate) fn bot_seed(root: u64, index: usize) -> u64 {
    root.wrapping_mul(6_364_136_223_846_793_005)
        .wrapping_add(index as u64)
}

/// Run every scenario with the same config.
pub fn run_all(config: &ScenarioConfig) -> Result<Vec<ScenarioResult>, SimError> {
    Ok(vec![
        random_workload::run(config)?,
        reentrancy_attack::run(config)?,
        failing_receiver::run(config)?,
    ])
}
