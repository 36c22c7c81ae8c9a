use crate::deck::context::{ParseContext, ParseEvent};
use crate::deck::scan::Deck;
use crate::deck::schedule::Schedule;
use crate::domain::model::SummaryKey;
use crate::utils::error::Result;
use regex::Regex;

/// Field-level mnemonics the recorder can evaluate.
pub const FIELD_MNEMONICS: &[&str] = &["FOPR", "FOPT", "FWPR", "FGIR", "FPR"];

/// Per-well mnemonics the recorder can evaluate.
pub const WELL_MNEMONICS: &[&str] = &["WBHP", "WOPR"];

/// The output vectors requested by the deck's SUMMARY section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryConfig {
    keys: Vec<SummaryKey>,
}

impl SummaryConfig {
    pub fn from_deck(deck: &Deck, schedule: &Schedule, ctx: &ParseContext) -> Result<Self> {
        let mnemonic_re = Regex::new(r"^[A-Z][A-Z0-9]{2,7}$").unwrap();
        let mut keys: Vec<SummaryKey> = Vec::new();

        for kw in deck.section("SUMMARY") {
            if !mnemonic_re.is_match(&kw.name) {
                tracing::warn!("summary keyword {} is not a valid mnemonic, skipped", kw.name);
                continue;
            }

            if FIELD_MNEMONICS.contains(&kw.name.as_str()) {
                push_unique(&mut keys, SummaryKey::field(&kw.name));
                continue;
            }

            if WELL_MNEMONICS.contains(&kw.name.as_str()) {
                let named: Vec<String> = kw
                    .records
                    .iter()
                    .flat_map(|r| r.items.iter())
                    .filter_map(|item| match item {
                        crate::deck::scan::DeckItem::Value(v) => Some(v.clone()),
                        crate::deck::scan::DeckItem::Defaulted => None,
                    })
                    .collect();

                if named.is_empty() {
                    // No well list means every declared well.
                    for well in &schedule.wells {
                        push_unique(&mut keys, SummaryKey::well(&kw.name, &well.spec.name));
                    }
                } else {
                    for name in named {
                        if !schedule.has_well(&name) {
                            ctx.handle(
                                ParseEvent::SummaryUnknownWell,
                                kw.line,
                                &format!("{} requests well '{}'", kw.name, name),
                            )?;
                            continue;
                        }
                        push_unique(&mut keys, SummaryKey::well(&kw.name, &name));
                    }
                }
                continue;
            }

            tracing::warn!("unsupported summary keyword {}, skipped", kw.name);
        }

        Ok(SummaryConfig { keys })
    }

    pub fn keys(&self) -> &[SummaryKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

fn push_unique(keys: &mut Vec<SummaryKey>, key: SummaryKey) {
    if !keys.contains(&key) {
        keys.push(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::context::ErrorAction;
    use crate::deck::scan::scan;
    use crate::deck::state::EclipseState;

    fn parse_all(summary_part: &str, ctx: &ParseContext) -> Result<SummaryConfig> {
        let input = format!(
            "\
RUNSPEC
DIMENS
 1 1 1 /
OIL
GAS
WATER
GRID
DX
 100 /
DY
 100 /
DZ
 20 /
TOPS
 8000 /
PORO
 0.25 /
PERMX
 500 /
SOLUTION
EQUIL
 8020 4500 /
SUMMARY
{}SCHEDULE
WELSPECS
 'PROD' 'G1' 1 1 8020 'OIL' /
 'INJ' 'G1' 1 1 8000 'GAS' /
/
TSTEP
 31 /
",
            summary_part
        );
        let deck = scan(&input, ctx)?;
        let state = EclipseState::from_deck(&deck, ctx)?;
        let schedule = Schedule::from_deck(&deck, &state)?;
        SummaryConfig::from_deck(&deck, &schedule, ctx)
    }

    #[test]
    fn test_field_and_well_keys() {
        let config = parse_all("FOPR\nFPR\nWBHP\n 'PROD' /\n", &ParseContext::default()).unwrap();
        let labels: Vec<String> = config.keys().iter().map(|k| k.label()).collect();
        assert_eq!(labels, vec!["FOPR", "FPR", "WBHP:PROD"]);
    }

    #[test]
    fn test_well_keyword_without_list_expands() {
        let config = parse_all("WBHP\n/\n", &ParseContext::default()).unwrap();
        let labels: Vec<String> = config.keys().iter().map(|k| k.label()).collect();
        assert_eq!(labels, vec!["WBHP:PROD", "WBHP:INJ"]);
    }

    #[test]
    fn test_unknown_well_warns_by_default() {
        let config = parse_all("WBHP\n 'NOPE' 'PROD' /\n", &ParseContext::default()).unwrap();
        let labels: Vec<String> = config.keys().iter().map(|k| k.label()).collect();
        assert_eq!(labels, vec!["WBHP:PROD"]);
    }

    #[test]
    fn test_unknown_well_errors_when_strict() {
        let ctx = ParseContext {
            summary_unknown_well: ErrorAction::Error,
            ..ParseContext::default()
        };
        let err = parse_all("WBHP\n 'NOPE' /\n", &ctx).unwrap_err();
        assert!(err.to_string().contains("NOPE"));
    }

    #[test]
    fn test_unsupported_mnemonic_skipped() {
        let config = parse_all("FGOR\nFOPR\n", &ParseContext::default()).unwrap();
        let labels: Vec<String> = config.keys().iter().map(|k| k.label()).collect();
        assert_eq!(labels, vec!["FOPR"]);
    }
}
