use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Scenario file error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Could not find input case '{case}' (searched in {search_dir})")]
    CaseNotFound { case: String, search_dir: String },

    #[error("Unknown engine '{engine}' (available: {available})")]
    UnknownEngine { engine: String, available: String },

    #[error("Deck error in keyword {keyword} (line {line}): {reason}")]
    DeckError {
        keyword: String,
        line: usize,
        reason: String,
    },

    #[error("Unsupported phase configuration: {reason}")]
    UnsupportedPhases { reason: String },

    #[error("Simulator is not fully configured: missing {missing}")]
    NotConfigured { missing: String },

    #[error("Cannot {operation} while simulator is {state}")]
    InvalidTransition { operation: String, state: String },

    #[error("Schedule exhausted after {steps} report steps")]
    ScheduleExhausted { steps: usize },

    #[error("run() is only supported on a freshly configured simulator")]
    RunAfterStepping,
}

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    Input,
    Deck,
    Simulator,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SimError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SimError::MissingConfigError { .. } | SimError::InvalidConfigValueError { .. } => {
                ErrorCategory::Config
            }
            SimError::CaseNotFound { .. } | SimError::UnknownEngine { .. } => ErrorCategory::Input,
            SimError::DeckError { .. } | SimError::UnsupportedPhases { .. } => ErrorCategory::Deck,
            SimError::NotConfigured { .. }
            | SimError::InvalidTransition { .. }
            | SimError::ScheduleExhausted { .. }
            | SimError::RunAfterStepping => ErrorCategory::Simulator,
            SimError::IoError(_)
            | SimError::CsvError(_)
            | SimError::SerializationError(_)
            | SimError::TomlError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SimError::ScheduleExhausted { .. } => ErrorSeverity::Low,
            SimError::InvalidTransition { .. } | SimError::RunAfterStepping => {
                ErrorSeverity::Medium
            }
            SimError::IoError(_) | SimError::CsvError(_) | SimError::SerializationError(_) => {
                ErrorSeverity::Critical
            }
            _ => ErrorSeverity::High,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SimError::CaseNotFound { case, .. } => {
                format!("Could not find the input case '{}'.", case)
            }
            SimError::UnknownEngine { engine, .. } => {
                format!("No simulator engine named '{}' is registered.", engine)
            }
            SimError::DeckError { keyword, line, .. } => format!(
                "The input deck could not be read (keyword {}, line {}).",
                keyword, line
            ),
            SimError::UnsupportedPhases { reason } => {
                format!("No suitable simulator configuration found: {}", reason)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SimError::CaseNotFound { search_dir, .. } => format!(
                "Set STEPFLOW_DECK_DIR to the directory holding your input decks \
                 (currently searching: {}). Typically something like the repository's \
                 cases/ directory or $HOME/decks.",
                search_dir
            ),
            SimError::UnknownEngine { available, .. } => {
                format!("Pick one of the registered engines: {}.", available)
            }
            SimError::MissingConfigError { field } => format!(
                "Provide a value for '{}' on the command line or in the scenario file.",
                field
            ),
            SimError::InvalidConfigValueError { field, .. } => {
                format!("Check the value passed for '{}'.", field)
            }
            SimError::DeckError { .. } => {
                "Check the deck against the supported keyword subset, or relax the \
                 parse recovery actions in the scenario file."
                    .to_string()
            }
            SimError::UnsupportedPhases { .. } => {
                "Only three-phase OIL/GAS/WATER cases are supported by the black-oil engine."
                    .to_string()
            }
            SimError::NotConfigured { missing } => {
                format!("Call the {} setter before step_init().", missing)
            }
            SimError::InvalidTransition { .. } | SimError::RunAfterStepping => {
                "Follow the step_init -> step -> step_cleanup order, or use run() on a \
                 fresh simulator."
                    .to_string()
            }
            SimError::ScheduleExhausted { .. } => {
                "The case has no report steps left; restart the driver to simulate again."
                    .to_string()
            }
            _ => "Check file permissions and available disk space.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_errors_are_input_category() {
        let e = SimError::CaseNotFound {
            case: "SPE1CASE1.DATA".to_string(),
            search_dir: ".".to_string(),
        };
        assert_eq!(e.category(), ErrorCategory::Input);
        assert!(e.recovery_suggestion().contains("STEPFLOW_DECK_DIR"));

        let e = SimError::UnknownEngine {
            engine: "polymer".to_string(),
            available: "blackoil".to_string(),
        };
        assert_eq!(e.category(), ErrorCategory::Input);
        assert!(e.recovery_suggestion().contains("blackoil"));
    }

    #[test]
    fn test_schedule_exhausted_is_low_severity() {
        let e = SimError::ScheduleExhausted { steps: 12 };
        assert_eq!(e.severity(), ErrorSeverity::Low);
    }
}
