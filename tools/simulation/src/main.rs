use clap::Parser;
use simulation::export::{build_export, export_json, write_to_file};
use simulation::scenarios::{self, ScenarioConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "vending-sim")]
#[command(version = simulation::VERSION)]
#[command(about = "Run vending machine scenarios and report solvency", long_about = None)]
struct Cli {
    /// JSON scenario config; defaults apply when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// Override the root seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the number of random workload steps
    #[arg(long)]
    steps: Option<u64>,

    /// Write the JSON export here instead of stdout
    #[arg(short, long)]
    output: Option<String>,
}

fn main() -> Result<(), anyhow::Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ScenarioConfig::load(path)?,
        None => ScenarioConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(steps) = cli.steps {
        config.steps = steps;
    }

    info!(seed = config.seed, steps = config.steps, "starting vending machine simulation");

    let results = scenarios::run_all(&config)?;
    for result in &results {
        if result.passed {
            info!(scenario = %result.name, details = %result.details, "passed");
        } else {
            warn!(scenario = %result.name, details = %result.details, "FAILED");
        }
    }

    let export = build_export(&config, results);
    match &cli.output {
        Some(path) => {
            write_to_file(&export, path)?;
            info!(path = %path, "export written");
        }
        None => println!("{}", export_json(&export)?),
    }

    if !export.all_passed {
        anyhow::bail!("one or more scenarios failed");
    }
    Ok(())
}
