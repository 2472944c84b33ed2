//! Compliance Engine Binary
//!
//! Replays a recorded account scenario and prints the resulting report as
//! JSON on stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin compliance-engine -- scenario.json
//! ```
//!
//! # Environment Variables
//!
//! - `COMPLIANCE_CONFIG`: Path to the config file (default: config.yaml)
//! - `RUST_LOG`: Log filter (default: `observability.logging.level`)

use anyhow::{Context, Result};

use compliance_engine::application::dto::ScenarioDto;
use compliance_engine::application::use_cases::ReplayScenarioUseCase;
use compliance_engine::config::load_config;
use compliance_engine::telemetry::init_tracing;

fn main() -> Result<()> {
    let config_path = std::env::var("COMPLIANCE_CONFIG").ok();
    let config = load_config(config_path.as_deref()).context("loading configuration")?;

    init_tracing(&config.observability.logging)
        .map_err(|e| anyhow::anyhow!(e))
        .context("installing tracing subscriber")?;

    let scenario_path = std::env::args()
        .nth(1)
        .context("usage: compliance-engine <scenario.json>")?;

    tracing::info!(
        scenario = %scenario_path,
        templates = config.templates.len(),
        "Replaying scenario"
    );

    let contents = std::fs::read_to_string(&scenario_path)
        .with_context(|| format!("reading scenario file '{scenario_path}'"))?;
    let scenario: ScenarioDto = serde_json::from_str(&contents)
        .with_context(|| format!("parsing scenario file '{scenario_path}'"))?;

    let report = ReplayScenarioUseCase::run(&config, &scenario)
        .with_context(|| format!("replaying scenario '{scenario_path}'"))?;

    let output = serde_json::to_string_pretty(&report).context("serializing report")?;
    println!("{output}");

    Ok(())
}
