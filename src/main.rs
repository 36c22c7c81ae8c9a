use clap::Parser;
use std::path::Path;

use stepflow::adapters::{AutoGate, ConsolePrompt, LocalStorage};
use stepflow::config::scenario::ScenarioConfig;
use stepflow::config::{DriveMode, RunConfig};
use stepflow::core::driver::{self, SmokeDriver};
use stepflow::deck::{self, ParseContext};
use stepflow::domain::ports::{SimulatorControl, StepGate, SummarySink};
use stepflow::sim::BlackOilSimulator;
use stepflow::utils::error::{ErrorSeverity, SimError};
use stepflow::utils::{logger, validation::Validate};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = RunConfig::parse();

    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting stepflow smoke driver");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let mut parse_context = ParseContext::default();
    if let Some(path) = config.scenario.clone() {
        let scenario = match ScenarioConfig::from_file(&path) {
            Ok(scenario) => scenario,
            Err(e) => {
                eprintln!("❌ Failed to load scenario file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML");
                std::process::exit(1);
            }
        };
        parse_context = scenario.parse_context();
        config.apply_scenario(&scenario);
        tracing::info!("Applied scenario '{}'", scenario.scenario.name);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // First guard: the input case must be resolvable.
    let case_path = match config.resolve_case_path() {
        Ok(path) => path,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // Second guard: the requested engine must be registered.
    if let Err(e) = config.check_engine() {
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    match run_scenario(&config, &case_path, &parse_context) {
        Ok(outputs) => {
            tracing::info!("✅ Smoke drive completed");
            println!("✅ Smoke drive completed");
            for path in outputs {
                println!("📁 Summary saved to: {}", path);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Smoke drive failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn run_scenario(
    config: &RunConfig,
    case_path: &Path,
    parse_context: &ParseContext,
) -> stepflow::Result<Vec<String>> {
    println!("Reading deck file '{}'", case_path.display());
    let case = deck::parse_file(case_path, parse_context)?;

    // Phase dispatch: only the three-phase black-oil configuration is
    // wired up in this driver.
    let usage = case.state().usage;
    if usage.num_phases != 3 {
        return Err(SimError::UnsupportedPhases {
            reason: format!(
                "{} active phases; the blackoil engine needs OIL, GAS and WATER",
                usage.num_phases
            ),
        });
    }

    let mut simulator = BlackOilSimulator::new();
    driver::wire(&mut simulator, &case);
    tracing::info!(
        wells = case.schedule().wells.len(),
        report_steps = case.schedule().report_steps.len(),
        summary_keys = case.summary_config().len(),
        "simulator configured from case"
    );

    let table = match config.mode {
        DriveMode::Step => {
            let gate: Box<dyn StepGate> = match config.auto {
                Some(continues) => Box::new(AutoGate::new(continues)),
                None => Box::new(ConsolePrompt::new()),
            };
            let mut smoke = SmokeDriver::new(simulator, gate).with_passes(config.passes);
            let report = smoke.drive()?;
            tracing::info!(
                passes = report.passes.len(),
                steps = report.total_steps(),
                "step-wise drive finished"
            );
            smoke.into_simulator().take_summary()
        }
        DriveMode::Run => {
            let reports = simulator.run()?;
            tracing::info!(steps = reports.len(), "single-shot run finished");
            simulator.take_summary()
        }
    };

    if table.is_empty() {
        tracing::warn!("no summary rows recorded");
    }

    let storage = LocalStorage::new(config.output_path.clone());
    let mut written = Vec::new();
    for format in &config.formats {
        match format.as_str() {
            "csv" => written.push(storage.write_file("summary.csv", &table.to_csv()?)?),
            "json" => written.push(storage.write_file("summary.json", &table.to_json()?)?),
            other => tracing::warn!("unknown output format {}, skipped", other),
        }
    }

    Ok(written)
}
