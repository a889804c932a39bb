//! Failing receiver scenario
//!
//! A customer whose address refuses payments deposits, buys, and then tries
//! to withdraw. The withdraw must revert as a whole: credit kept, wallet
//! untouched, contract still solvent.

use tracing::info;
use types::ids::Address;
use types::numeric::Wei;

use crate::bots::attacker::RejectingReceiver;
use crate::metrics::SimMetrics;
use crate::scenarios::{deploy, ScenarioConfig, ScenarioResult, SimError};

pub const NAME: &str = "failing_receiver";

/// Run the failing receiver scenario.
pub fn run(config: &ScenarioConfig) -> Result<ScenarioResult, SimError> {
    let mut deployment = deploy(config)?;
    let owner = deployment.owner;
    let chain = &mut deployment.chain;
    let mut metrics = SimMetrics::new();
    let funding = Wei::from_ether_decimal(config.account_funding)?;
    let stake = Wei::from_ether_decimal(config.attacker_deposit)?;

    let customer = Address::from_seed("unpayable-customer");
    chain.fund(customer, funding)?;
    let (receiver, stats) = RejectingReceiver::new("no receive function");
    chain.register_receiver(customer, Box::new(receiver));

    metrics.record_call(&chain.restock(owner, config.restock_count));
    metrics.record_call(&chain.deposit(customer, stake));
    metrics.record_call(&chain.purchase(customer, 1));

    let credited = chain.machine()?.consumer_deposit_of(&customer);
    let wallet = chain.balance_of(&customer);

    let outcome = chain.withdraw(customer);
    let reverted = outcome.is_err();
    metrics.record_call(&outcome);

    let held = chain.has_not_been_compromised()?;
    metrics.record_invariant(held);

    let mut problems = Vec::new();
    if !reverted {
        problems.push("withdraw to a refusing address succeeded".to_string());
    }
    if stats.callbacks.get() != 1 {
        problems.push(format!("receiver ran {} times", stats.callbacks.get()));
    }
    let credited_after = chain.machine()?.consumer_deposit_of(&customer);
    if credited_after != credited {
        problems.push(format!(
            "credit changed from {} ETH to {} ETH",
            credited.ether(),
            credited_after.ether()
        ));
    }
    if chain.balance_of(&customer) != wallet {
        problems.push("wallet balance changed".to_string());
    }
    if !held {
        problems.push("solvency check failed".to_string());
    }

    let report = chain.audit()?;
    let passed = problems.is_empty();
    let details = if passed {
        format!("withdraw reverted, {} ETH still credited", credited.ether())
    } else {
        problems.join("; ")
    };
    info!(scenario = NAME, passed, %details, "scenario finished");

    Ok(ScenarioResult {
        name: NAME.to_string(),
        seed: config.seed,
        steps_run: 1,
        events_emitted: chain.machine()?.events().len(),
        metrics,
        final_report: report,
        passed,
        details,
    })
}
