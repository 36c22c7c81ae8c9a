use crate::utils::error::{Result, SimError};
use serde::{Deserialize, Serialize};

/// What to do when the scanner or a builder meets a recoverable
/// irregularity in the input deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorAction {
    Ignore,
    Warn,
    Error,
}

impl std::str::FromStr for ErrorAction {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ignore" => Ok(ErrorAction::Ignore),
            "warn" => Ok(ErrorAction::Warn),
            "error" => Ok(ErrorAction::Error),
            other => Err(SimError::InvalidConfigValueError {
                field: "recovery action".to_string(),
                value: other.to_string(),
                reason: "Allowed values: ignore, warn, error".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseEvent {
    RandomSlash,
    MissingDimsKeyword,
    SummaryUnknownWell,
}

impl std::fmt::Display for ParseEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseEvent::RandomSlash => write!(f, "random slash"),
            ParseEvent::MissingDimsKeyword => write!(f, "missing DIMENS keyword"),
            ParseEvent::SummaryUnknownWell => write!(f, "unknown well in SUMMARY section"),
        }
    }
}

/// Per-event recovery actions applied while reading a deck.
///
/// The defaults tolerate the known irregularities of the bundled case:
/// a stray slash is skipped silently, a missing DIMENS keyword and
/// summary vectors for undeclared wells are downgraded to warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseContext {
    pub random_slash: ErrorAction,
    pub missing_dims_keyword: ErrorAction,
    pub summary_unknown_well: ErrorAction,
}

impl Default for ParseContext {
    fn default() -> Self {
        ParseContext {
            random_slash: ErrorAction::Ignore,
            missing_dims_keyword: ErrorAction::Warn,
            summary_unknown_well: ErrorAction::Warn,
        }
    }
}

impl ParseContext {
    /// A context with every recovery action set to `Error`, for inputs
    /// that are expected to be pristine.
    pub fn strict() -> Self {
        ParseContext {
            random_slash: ErrorAction::Error,
            missing_dims_keyword: ErrorAction::Error,
            summary_unknown_well: ErrorAction::Error,
        }
    }

    pub fn action_for(&self, event: ParseEvent) -> ErrorAction {
        match event {
            ParseEvent::RandomSlash => self.random_slash,
            ParseEvent::MissingDimsKeyword => self.missing_dims_keyword,
            ParseEvent::SummaryUnknownWell => self.summary_unknown_well,
        }
    }

    pub fn handle(&self, event: ParseEvent, line: usize, detail: &str) -> Result<()> {
        match self.action_for(event) {
            ErrorAction::Ignore => Ok(()),
            ErrorAction::Warn => {
                tracing::warn!("{} (line {}): {}", event, line, detail);
                Ok(())
            }
            ErrorAction::Error => Err(SimError::DeckError {
                keyword: event.to_string(),
                line,
                reason: detail.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context_ignores_random_slash() {
        let ctx = ParseContext::default();
        assert!(ctx.handle(ParseEvent::RandomSlash, 10, "stray '/'").is_ok());
    }

    #[test]
    fn test_strict_context_errors() {
        let ctx = ParseContext::strict();
        let err = ctx
            .handle(ParseEvent::RandomSlash, 10, "stray '/'")
            .unwrap_err();
        assert!(err.to_string().contains("line 10"));
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!("ignore".parse::<ErrorAction>().unwrap(), ErrorAction::Ignore);
        assert_eq!("WARN".parse::<ErrorAction>().unwrap(), ErrorAction::Warn);
        assert!("fatal".parse::<ErrorAction>().is_err());
    }
}
