//! Re-entrancy attack scenario
//!
//! Attackers deposit, attach a receiver that calls `withdraw` again from
//! inside the payment, then withdraw. Each must end with exactly its
//! starting wallet balance and the contract must stay solvent.

use std::rc::Rc;

use tracing::{info, warn};
use types::ids::Address;
use types::numeric::Wei;

use crate::bots::attacker::{AttackStats, ReentrantWithdrawer};
use crate::metrics::SimMetrics;
use crate::scenarios::{deploy, ScenarioConfig, ScenarioResult, SimError};

pub const NAME: &str = "reentrancy_attack";

/// Run the re-entrancy attack scenario.
pub fn run(config: &ScenarioConfig) -> Result<ScenarioResult, SimError> {
    let mut deployment = deploy(config)?;
    let chain = &mut deployment.chain;
    let mut metrics = SimMetrics::new();
    let funding = Wei::from_ether_decimal(config.account_funding)?;
    let stake = Wei::from_ether_decimal(config.attacker_deposit)?;

    let mut attackers: Vec<(Address, Rc<AttackStats>)> = Vec::with_capacity(config.attackers);
    for i in 0..config.attackers {
        let address = Address::from_seed(&format!("attacker-{i}"));
        chain.fund(address, funding)?;
        metrics.record_call(&chain.deposit(address, stake));

        let (receiver, stats) = ReentrantWithdrawer::new(config.reentry_depth);
        chain.register_receiver(address, Box::new(receiver));
        attackers.push((address, stats));
    }

    let mut problems = Vec::new();
    let mut steps_run = 0;
    for (address, stats) in &attackers {
        let outcome = chain.withdraw(*address);
        metrics.record_call(&outcome);
        steps_run += 1;

        let held = chain.has_not_been_compromised()?;
        metrics.record_invariant(held);

        let wallet = chain.balance_of(address);
        if wallet != funding {
            warn!(attacker = %address, wallet = %wallet.ether(), "attacker balance changed");
            problems.push(format!(
                "{address} ended with {} ETH instead of {} ETH",
                wallet.ether(),
                funding.ether()
            ));
        }
        if !stats.extracted.get().is_zero() {
            problems.push(format!(
                "{address} pulled {} ETH through nested withdraws",
                stats.extracted.get().ether()
            ));
        }
        if !held {
            problems.push(format!("solvency check failed after {address} withdrew"));
        }
    }

    let reentries: u32 = attackers.iter().map(|(_, s)| s.reentries.get()).sum();
    let report = chain.audit()?;
    if report.held != chain.machine()?.reserve_amount() {
        problems.push(format!(
            "contract holds {} ETH after all attackers left",
            report.held.ether()
        ));
    }

    let passed = problems.is_empty();
    let details = if passed {
        format!(
            "{} attackers, {reentries} nested withdraws, nothing extracted",
            attackers.len()
        )
    } else {
        problems.join("; ")
    };
    info!(scenario = NAME, passed, %details, "scenario finished");

    Ok(ScenarioResult {
        name: NAME.to_string(),
        seed: config.seed,
        steps_run,
        events_emitted: chain.machine()?.events().len(),
        metrics,
        final_report: report,
        passed,
        details,
    })
}
