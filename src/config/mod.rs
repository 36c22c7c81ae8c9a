pub mod scenario;

use crate::deck;
use crate::sim;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_subset_of,
    Validate,
};
use clap::{Parser, ValueEnum};
use self::scenario::{ScenarioConfig, SUPPORTED_FORMATS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DECK_DIR_ENV: &str = "STEPFLOW_DECK_DIR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DriveMode {
    /// Interactive init / step-loop / cleanup passes.
    Step,
    /// Single uninterruptible run call.
    Run,
}

impl std::fmt::Display for DriveMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriveMode::Step => write!(f, "step"),
            DriveMode::Run => write!(f, "run"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "stepflow")]
#[command(about = "Step-wise smoke driver for a black-oil reservoir case")]
pub struct RunConfig {
    /// Input case, resolved against the working directory and the deck
    /// search directory
    #[arg(long, default_value = "SPE1CASE1.DATA")]
    pub case: String,

    /// Directory searched for input decks (defaults to $STEPFLOW_DECK_DIR)
    #[arg(long)]
    pub deck_dir: Option<String>,

    /// Simulator engine to drive
    #[arg(long, default_value = "blackoil")]
    pub engine: String,

    #[arg(long, value_enum, default_value_t = DriveMode::Step)]
    pub mode: DriveMode,

    /// Number of init/step/cleanup passes in step mode
    #[arg(long, default_value = "2")]
    pub passes: usize,

    /// Answer the step prompt automatically: continue N times, then stop
    #[arg(long)]
    pub auto: Option<usize>,

    /// TOML scenario file overriding case, recovery and output settings
    #[arg(long)]
    pub scenario: Option<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Summary output formats
    #[arg(long, value_delimiter = ',', default_value = "csv")]
    pub formats: Vec<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

impl RunConfig {
    pub fn deck_search_dir(&self) -> Option<PathBuf> {
        self.deck_dir
            .clone()
            .or_else(|| std::env::var(DECK_DIR_ENV).ok())
            .map(PathBuf::from)
    }

    /// First preflight guard: the case must resolve to an existing file.
    pub fn resolve_case_path(&self) -> Result<PathBuf> {
        let dir = self.deck_search_dir();
        deck::canonical_case_path(&self.case, dir.as_deref())
    }

    /// Second preflight guard: the engine must be registered.
    pub fn check_engine(&self) -> Result<()> {
        if !sim::engine_registered(&self.engine) {
            return Err(crate::utils::error::SimError::UnknownEngine {
                engine: self.engine.clone(),
                available: sim::available_engines(),
            });
        }
        Ok(())
    }

    /// Folds scenario-file settings into the CLI configuration. Values
    /// present in the scenario win over the corresponding CLI fields.
    pub fn apply_scenario(&mut self, scenario: &ScenarioConfig) {
        if let Some(case) = &scenario.scenario.case {
            self.case = case.clone();
        }
        if let Some(passes) = scenario.scenario.passes {
            self.passes = passes;
        }
        if let Some(output) = &scenario.output {
            if let Some(directory) = &output.directory {
                self.output_path = directory.clone();
            }
            if let Some(formats) = &output.formats {
                self.formats = formats.clone();
            }
        }
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("case", &self.case)?;
        validate_non_empty_string("engine", &self.engine)?;
        validate_path("output_path", &self.output_path)?;
        validate_positive_number("passes", self.passes, 1)?;
        validate_subset_of("formats", &self.formats, SUPPORTED_FORMATS)?;
        Ok(())
    }
}
