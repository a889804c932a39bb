//! Scenario result export
//!
//! Serializes scenario results to JSON for external consumption.

use serde::{Deserialize, Serialize};

use crate::scenarios::{ScenarioConfig, ScenarioResult, SimError};

/// Combined export containing all simulation outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationExport {
    pub version: String,
    pub contract_abi_version: String,
    pub config: ScenarioConfig,
    pub results: Vec<ScenarioResult>,
    pub all_passed: bool,
}

/// Build a complete simulation export.
pub fn build_export(config: &ScenarioConfig, results: Vec<ScenarioResult>) -> SimulationExport {
    SimulationExport {
        version: crate::VERSION.to_string(),
        contract_abi_version: vending_machine::CONTRACT_ABI_VERSION.to_string(),
        config: config.clone(),
        all_passed: results.iter().all(|r| r.passed),
        results,
    }
}

/// Export complete simulation data as JSON.
pub fn export_json(export: &SimulationExport) -> Result<String, SimError> {
    Ok(serde_json::to_string_pretty(export)?)
}

/// Write export to a file path.
pub fn write_to_file(export: &SimulationExport, path: &str) -> Result<(), SimError> {
    let json = export_json(export)?;
    std::fs::write(path, json)?;
    Ok(())
}
