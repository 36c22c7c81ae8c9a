use crate::deck::{ErrorAction, ParseContext};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_subset_of, Validate,
};
use serde::{Deserialize, Serialize};

pub const SUPPORTED_FORMATS: &[&str] = &["csv", "json"];

/// Optional TOML description of a smoke run: which case to load, how
/// tolerant the parser should be, and where the summary goes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub scenario: ScenarioSection,
    pub recovery: Option<RecoverySection>,
    pub output: Option<OutputSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSection {
    pub name: String,
    pub description: Option<String>,
    pub case: Option<String>,
    pub passes: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecoverySection {
    pub random_slash: Option<ErrorAction>,
    pub missing_dims_keyword: Option<ErrorAction>,
    pub summary_unknown_well: Option<ErrorAction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSection {
    pub directory: Option<String>,
    pub formats: Option<Vec<String>>,
}

impl ScenarioConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ScenarioConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse context with the scenario's recovery overrides applied on
    /// top of the defaults.
    pub fn parse_context(&self) -> ParseContext {
        let mut ctx = ParseContext::default();
        if let Some(recovery) = &self.recovery {
            if let Some(action) = recovery.random_slash {
                ctx.random_slash = action;
            }
            if let Some(action) = recovery.missing_dims_keyword {
                ctx.missing_dims_keyword = action;
            }
            if let Some(action) = recovery.summary_unknown_well {
                ctx.summary_unknown_well = action;
            }
        }
        ctx
    }
}

impl Validate for ScenarioConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("scenario.name", &self.scenario.name)?;

        if let Some(passes) = self.scenario.passes {
            validate_positive_number("scenario.passes", passes, 1)?;
        }

        if let Some(output) = &self.output {
            if let Some(formats) = &output.formats {
                validate_subset_of("output.formats", formats, SUPPORTED_FORMATS)?;
            }
        }

        Ok(())
    }
}
