//! Random workload scenario
//!
//! Customers make random deposit, purchase and withdraw calls while the
//! owner restocks on a fixed cadence. The solvency check runs after every
//! call. At the end everyone withdraws and the contract must hold exactly
//! reserve plus sales revenue.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};
use types::ids::Address;
use types::numeric::Wei;

use crate::bots::customer::Customer;
use crate::metrics::SimMetrics;
use crate::scenarios::{bot_seed, deploy, ScenarioConfig, ScenarioResult, SimError};

pub const NAME: &str = "random_workload";

/// Run the random workload scenario.
pub fn run(config: &ScenarioConfig) -> Result<ScenarioResult, SimError> {
    config.validate()?;
    let mut deployment = deploy(config)?;
    let chain = &mut deployment.chain;
    let owner = deployment.owner;
    let mut metrics = SimMetrics::new();
    let funding = Wei::from_ether_decimal(config.account_funding)?;

    let mut customers = Vec::with_capacity(config.customers);
    for i in 0..config.customers {
        let address = Address::from_seed(&format!("customer-{i}"));
        chain.fund(address, funding)?;
        customers.push(Customer::new(
            address,
            config.customer.clone(),
            bot_seed(config.seed, i),
        )?);
    }

    let mut scheduler = ChaCha8Rng::seed_from_u64(config.seed);
    let mut steps_run = 0;

    for step in 0..config.steps {
        if config.restock_every > 0 && step % config.restock_every == 0 {
            let outcome = chain.restock(owner, config.restock_count);
            metrics.record_call(&outcome);
        }

        if customers.is_empty() {
            break;
        }
        let idx = scheduler.gen_range(0..customers.len());
        let outcome = customers[idx].tick(chain);
        if let Err(err) = &outcome {
            debug!(step, customer = idx, error = %err, "call rejected");
        }
        metrics.record_call(&outcome);

        let held = chain.has_not_been_compromised()?;
        metrics.record_invariant(held);
        if !held {
            warn!(step, "solvency check failed");
        }
        steps_run += 1;
    }

    // Everyone cashes out.
    for customer in &customers {
        let outcome = chain.withdraw(customer.address);
        metrics.record_call(&outcome);
    }

    let machine = chain.machine()?;
    let report = chain.audit()?;
    let expected_held = machine
        .reserve_amount()
        .checked_add(metrics.revenue)
        .ok_or_else(|| SimError::Config("revenue overflow".into()))?;

    let mut problems = Vec::new();
    if metrics.invariant_failures > 0 {
        problems.push(format!("{} solvency failures", metrics.invariant_failures));
    }
    if !machine.outstanding_deposits().is_zero() {
        problems.push(format!(
            "{} ETH still credited after full withdrawal",
            machine.outstanding_deposits().ether()
        ));
    }
    if report.held != expected_held {
        problems.push(format!(
            "held {} ETH, expected reserve plus revenue {} ETH",
            report.held.ether(),
            expected_held.ether()
        ));
    }
    let sold: u64 = customers
        .iter()
        .map(|c| machine.purchased_count_of(&c.address))
        .sum();
    if sold != metrics.peanuts_sold {
        problems.push(format!(
            "purchase counters total {sold}, events report {}",
            metrics.peanuts_sold
        ));
    }

    let passed = problems.is_empty();
    let details = if passed {
        metrics.summary()
    } else {
        problems.join("; ")
    };
    info!(scenario = NAME, passed, %details, "scenario finished");

    Ok(ScenarioResult {
        name: NAME.to_string(),
        seed: config.seed,
        steps_run,
        events_emitted: machine.events().len(),
        metrics,
        final_report: report,
        passed,
        details,
    })
}
