// Deck layer: keyword-level reader for the input case format and the
// typed views (state, schedule, summary config) built from it.

pub mod context;
pub mod scan;
pub mod schedule;
pub mod state;
pub mod summary;

pub use context::{ErrorAction, ParseContext, ParseEvent};
pub use scan::{Deck, DeckItem, DeckKeyword, DeckRecord};
pub use schedule::Schedule;
pub use state::EclipseState;
pub use summary::SummaryConfig;

use crate::utils::error::{Result, SimError};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// A parsed input case: the raw deck plus the typed sub-objects the
/// simulator is configured with. Created once, read a fixed number of
/// times while wiring the simulator.
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    deck: Deck,
    state: EclipseState,
    schedule: Schedule,
    summary_config: SummaryConfig,
}

impl Case {
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn state(&self) -> &EclipseState {
        &self.state
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn summary_config(&self) -> &SummaryConfig {
        &self.summary_config
    }
}

/// Parses deck text into a full case.
pub fn parse_str(input: &str, ctx: &ParseContext) -> Result<Case> {
    let deck = scan::scan(input, ctx)?;
    let state = EclipseState::from_deck(&deck, ctx)?;
    let schedule = Schedule::from_deck(&deck, &state)?;
    let summary_config = SummaryConfig::from_deck(&deck, &schedule, ctx)?;

    tracing::debug!(
        wells = schedule.wells.len(),
        report_steps = schedule.report_steps.len(),
        summary_keys = summary_config.len(),
        "case parsed"
    );

    Ok(Case {
        deck,
        state,
        schedule,
        summary_config,
    })
}

/// Parses a case file from disk.
pub fn parse_file(path: &Path, ctx: &ParseContext) -> Result<Case> {
    let input = std::fs::read_to_string(path)?;
    parse_str(&input, ctx)
}

/// Resolves a case name to an existing file, probing the name as given
/// and with the `.data` / `.DATA` extensions, first relative to the
/// working directory and then under the deck search directory.
pub fn canonical_case_path(case: &str, deck_dir: Option<&Path>) -> Result<PathBuf> {
    let mut roots: Vec<PathBuf> = vec![PathBuf::new()];
    if let Some(dir) = deck_dir {
        roots.push(dir.to_path_buf());
    }

    for root in &roots {
        let candidate = root.join(case);
        if candidate.is_file() {
            return Ok(candidate);
        }
        for ext in ["data", "DATA"] {
            let with_ext = candidate.with_extension(ext);
            if with_ext.is_file() {
                return Ok(with_ext);
            }
        }
    }

    let search_dir = deck_dir
        .map(|d| d.display().to_string())
        .unwrap_or_else(|| ".".to_string());
    Err(SimError::CaseNotFound {
        case: case.to_string(),
        search_dir,
    })
}

/// Reads a `day 'MON' year` record into a date. The month mnemonics
/// follow the deck convention, including the JLY spelling of July.
pub(crate) fn parse_eclipse_date(kw: &DeckKeyword, record: usize) -> Result<NaiveDate> {
    let day = kw.require_usize(record, 0)? as u32;
    let month_token = kw.require_str(record, 1)?;
    let year = kw.require_usize(record, 2)? as i32;

    let month = match month_token {
        "JAN" => 1,
        "FEB" => 2,
        "MAR" => 3,
        "APR" => 4,
        "MAY" => 5,
        "JUN" => 6,
        "JUL" | "JLY" => 7,
        "AUG" => 8,
        "SEP" => 9,
        "OCT" => 10,
        "NOV" => 11,
        "DEC" => 12,
        other => {
            return Err(SimError::DeckError {
                keyword: kw.name.clone(),
                line: kw.line,
                reason: format!("unknown month mnemonic '{}'", other),
            })
        }
    };

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| SimError::DeckError {
        keyword: kw.name.clone(),
        line: kw.line,
        reason: format!("invalid date {} {} {}", day, month_token, year),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::scan::scan;

    #[test]
    fn test_parse_eclipse_date() {
        let deck = scan("START\n 1 'JAN' 2015 /\n", &ParseContext::default()).unwrap();
        let kw = deck.get("START").unwrap();
        assert_eq!(
            parse_eclipse_date(kw, 0).unwrap(),
            NaiveDate::from_ymd_opt(2015, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_parse_eclipse_date_jly() {
        let deck = scan("DATES\n 15 'JLY' 2016 /\n/\n", &ParseContext::default()).unwrap();
        let kw = deck.get("DATES").unwrap();
        assert_eq!(
            parse_eclipse_date(kw, 0).unwrap(),
            NaiveDate::from_ymd_opt(2016, 7, 15).unwrap()
        );
    }

    #[test]
    fn test_parse_eclipse_date_rejects_bad_month() {
        let deck = scan("DATES\n 15 'JUX' 2016 /\n/\n", &ParseContext::default()).unwrap();
        let kw = deck.get("DATES").unwrap();
        assert!(parse_eclipse_date(kw, 0).is_err());
    }

    #[test]
    fn test_canonical_case_path_probes_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("SPE1CASE1.DATA");
        std::fs::write(&file, "RUNSPEC\n").unwrap();

        let found = canonical_case_path("SPE1CASE1", Some(dir.path())).unwrap();
        assert_eq!(found, file);

        let found = canonical_case_path("SPE1CASE1.DATA", Some(dir.path())).unwrap();
        assert_eq!(found, file);

        let err = canonical_case_path("OTHER.DATA", Some(dir.path())).unwrap_err();
        assert!(err.to_string().contains("OTHER.DATA"));
    }
}
