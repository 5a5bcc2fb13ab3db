//! CLI command handling
//!
//! Dispatches CLI commands and formats their output.

use std::path::Path;

use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::client::ApiClient;
use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::Result;
use crate::fixture::Fixture;
use crate::schema::SchemaStore;
use crate::testing::{build_request, run_scenario, RunOptions, TestScenario};

/// Seed used for the sample fixture shown by `check`
const CHECK_SEED: u64 = 0;

/// Dispatch a CLI command
///
/// Returns `Ok(false)` when the command ran but a scenario failed.
pub async fn dispatch(command: Commands, mut config: Config) -> Result<bool> {
    match command {
        Commands::Run {
            scenario,
            base_url,
            api_key,
            schema_dir,
            seed,
            json,
            verbose,
        } => {
            config.apply_overrides(base_url, api_key, schema_dir);

            let scenario = match scenario {
                Some(path) => TestScenario::load(&path)?,
                None => TestScenario::bundled()?,
            };
            let client = ApiClient::new(&config.api, &config.timeouts)?;
            let mut schemas = SchemaStore::new(config.schemas.dir.clone());
            let fixture = generate_fixture(seed);

            let options = RunOptions {
                verbose,
                quiet: json,
            };
            let report = run_scenario(&scenario, &client, &fixture, &mut schemas, options).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }

            Ok(report.passed)
        }

        Commands::Fixture { seed } => {
            let fixture = generate_fixture(seed);
            println!("{}", serde_json::to_string_pretty(&fixture)?);
            Ok(true)
        }

        Commands::Check { path } => {
            check_scenario(&path)?;
            Ok(true)
        }
    }
}

fn generate_fixture(seed: Option<u64>) -> Fixture {
    match seed {
        Some(seed) => Fixture::generate_with(&mut StdRng::seed_from_u64(seed)),
        None => Fixture::generate(),
    }
}

/// Render every step of a scenario without sending anything
fn check_scenario(path: &Path) -> Result<()> {
    let scenario = TestScenario::load(path)?;
    let fixture = generate_fixture(Some(CHECK_SEED));

    println!(
        "\n{} {}",
        "Scenario:".blue().bold(),
        scenario.name.white().bold()
    );
    if let Some(desc) = &scenario.description {
        println!("  {}", desc.dimmed());
    }
    println!(
        "  {} {}",
        "Sample fixture user:".cyan(),
        fixture.username.dimmed()
    );

    for (i, step) in scenario.steps.iter().enumerate() {
        let request = build_request(&step.request, &fixture)?;
        println!(
            "  {} Step {}: {} {}",
            "✓".green(),
            i + 1,
            step.name,
            request.describe().dimmed()
        );
        if let Some(schema) = &step.expect.schema {
            println!("      schema: {}", schema.dimmed());
        }
    }

    println!(
        "\n{} {} steps\n",
        "✓".green().bold(),
        scenario.steps.len()
    );
    Ok(())
}
