use anyhow::Result;
use tempfile::TempDir;

use stepflow::config::{DriveMode, RunConfig, DECK_DIR_ENV};
use stepflow::utils::validation::Validate;

fn config_for(case: &str, deck_dir: Option<String>) -> RunConfig {
    RunConfig {
        case: case.to_string(),
        deck_dir,
        engine: "blackoil".to_string(),
        mode: DriveMode::Step,
        passes: 2,
        auto: None,
        scenario: None,
        output_path: "./output".to_string(),
        formats: vec!["csv".to_string()],
        verbose: false,
        log_json: false,
    }
}

/// First guard: an unresolvable case is reported with a remediation
/// hint naming the search-path environment variable.
#[test]
fn test_missing_case_diagnostic() -> Result<()> {
    let dir = TempDir::new()?;
    let config = config_for("NOWHERE.DATA", Some(dir.path().display().to_string()));

    let err = config.resolve_case_path().unwrap_err();
    assert!(err.user_friendly_message().contains("NOWHERE.DATA"));
    assert!(err.recovery_suggestion().contains(DECK_DIR_ENV));
    Ok(())
}

/// Second guard: an unregistered engine is reported with the list of
/// valid engine names.
#[test]
fn test_unknown_engine_diagnostic() {
    let mut config = config_for("SPE1CASE1.DATA", None);
    config.engine = "solvent".to_string();

    let err = config.check_engine().unwrap_err();
    assert!(err.user_friendly_message().contains("solvent"));
    assert!(err.recovery_suggestion().contains("blackoil"));
}

/// The deck search directory can come from the environment.
#[test]
fn test_case_resolution_from_environment() -> Result<()> {
    let dir = TempDir::new()?;
    std::fs::write(dir.path().join("ENVCASE.DATA"), "RUNSPEC\n")?;
    std::env::set_var(DECK_DIR_ENV, dir.path());

    let config = config_for("ENVCASE", None);
    let path = config.resolve_case_path()?;
    assert!(path.ends_with("ENVCASE.DATA"));

    std::env::remove_var(DECK_DIR_ENV);
    Ok(())
}

/// Configuration validation catches malformed requests before any
/// parsing happens.
#[test]
fn test_config_validation() {
    let mut config = config_for("SPE1CASE1.DATA", None);
    assert!(config.validate().is_ok());

    config.formats = vec!["yaml".to_string()];
    assert!(config.validate().is_err());

    let config = config_for("", None);
    assert!(config.validate().is_err());
}
