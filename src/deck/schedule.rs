use crate::deck::scan::Deck;
use crate::deck::state::EclipseState;
use crate::domain::model::{Completion, Phase, ReportStep, Well, WellControl, WellSpec};
use crate::utils::error::{Result, SimError};
use chrono::{Duration, NaiveDate};

/// Operational schedule of the case: declared wells with their active
/// controls, and the report steps the engine advances through.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    pub start_date: NaiveDate,
    pub wells: Vec<Well>,
    pub report_steps: Vec<ReportStep>,
}

impl Schedule {
    pub fn from_deck(deck: &Deck, state: &EclipseState) -> Result<Self> {
        let mut schedule = Schedule {
            start_date: state.start_date,
            wells: Vec::new(),
            report_steps: Vec::new(),
        };

        let mut elapsed_days = 0.0_f64;
        let mut cursor_date = state.start_date;

        for kw in deck.section("SCHEDULE") {
            match kw.name.as_str() {
                "WELSPECS" => {
                    for ri in 0..kw.records.len() {
                        let spec = WellSpec {
                            name: kw.require_str(ri, 0)?.to_string(),
                            group: kw.str_or(ri, 1, "FIELD").to_string(),
                            i: kw.require_usize(ri, 2)?,
                            j: kw.require_usize(ri, 3)?,
                            ref_depth: kw.records[ri].f64_at(4),
                            preferred_phase: parse_phase(kw.str_or(ri, 5, "OIL"))
                                .unwrap_or(Phase::Oil),
                        };
                        schedule.wells.push(Well {
                            spec,
                            completions: Vec::new(),
                            control: WellControl::Shut,
                        });
                    }
                }
                "COMPDAT" => {
                    for ri in 0..kw.records.len() {
                        let name = kw.require_str(ri, 0)?.to_string();
                        let well = find_well(&mut schedule.wells, &name, &kw.name, kw.line)?;
                        let completion = Completion {
                            i: kw.usize_or(ri, 1, well.spec.i)?,
                            j: kw.usize_or(ri, 2, well.spec.j)?,
                            k_upper: kw.require_usize(ri, 3)?,
                            k_lower: kw.require_usize(ri, 4)?,
                            open: kw.str_or(ri, 5, "OPEN") == "OPEN",
                        };
                        well.completions.push(completion);
                    }
                }
                "WCONPROD" => {
                    for ri in 0..kw.records.len() {
                        let name = kw.require_str(ri, 0)?.to_string();
                        let status = kw.str_or(ri, 1, "OPEN").to_string();
                        let mode = kw.str_or(ri, 2, "ORAT").to_string();
                        let control = if status == "SHUT" {
                            WellControl::Shut
                        } else {
                            if mode != "ORAT" {
                                return Err(SimError::DeckError {
                                    keyword: kw.name.clone(),
                                    line: kw.line,
                                    reason: format!(
                                        "only ORAT producer control is supported, got {}",
                                        mode
                                    ),
                                });
                            }
                            WellControl::Producer {
                                oil_rate: kw.require_f64(ri, 3)?,
                                bhp_limit: kw.f64_or(ri, 8, 14.7)?,
                            }
                        };
                        let well = find_well(&mut schedule.wells, &name, &kw.name, kw.line)?;
                        well.control = control;
                    }
                }
                "WCONINJE" => {
                    for ri in 0..kw.records.len() {
                        let name = kw.require_str(ri, 0)?.to_string();
                        let phase = parse_phase(kw.require_str(ri, 1)?).ok_or_else(|| {
                            SimError::DeckError {
                                keyword: kw.name.clone(),
                                line: kw.line,
                                reason: format!(
                                    "unknown injection phase '{}'",
                                    kw.str_or(ri, 1, "")
                                ),
                            }
                        })?;
                        let status = kw.str_or(ri, 2, "OPEN").to_string();
                        let mode = kw.str_or(ri, 3, "RATE").to_string();
                        let control = if status == "SHUT" {
                            WellControl::Shut
                        } else {
                            if mode != "RATE" {
                                return Err(SimError::DeckError {
                                    keyword: kw.name.clone(),
                                    line: kw.line,
                                    reason: format!(
                                        "only RATE injector control is supported, got {}",
                                        mode
                                    ),
                                });
                            }
                            WellControl::Injector {
                                phase,
                                rate: kw.require_f64(ri, 4)?,
                                bhp_limit: kw.f64_or(ri, 6, 1.0e5)?,
                            }
                        };
                        let well = find_well(&mut schedule.wells, &name, &kw.name, kw.line)?;
                        well.control = control;
                    }
                }
                "TSTEP" => {
                    for record in &kw.records {
                        for ii in 0..record.len() {
                            let days = record.f64_at(ii).ok_or_else(|| SimError::DeckError {
                                keyword: kw.name.clone(),
                                line: kw.line,
                                reason: "TSTEP items must be numbers".to_string(),
                            })?;
                            if days <= 0.0 {
                                return Err(SimError::DeckError {
                                    keyword: kw.name.clone(),
                                    line: kw.line,
                                    reason: format!("step length {} must be positive", days),
                                });
                            }
                            elapsed_days += days;
                            cursor_date = state.start_date
                                + Duration::days(elapsed_days.floor() as i64);
                            schedule.push_step(days, cursor_date);
                        }
                    }
                }
                "DATES" => {
                    for ri in 0..kw.records.len() {
                        let date = super::parse_eclipse_date(kw, ri)?;
                        let days = (date - cursor_date).num_days() as f64;
                        if days <= 0.0 {
                            return Err(SimError::DeckError {
                                keyword: kw.name.clone(),
                                line: kw.line,
                                reason: format!("{} does not advance the schedule", date),
                            });
                        }
                        elapsed_days += days;
                        cursor_date = date;
                        schedule.push_step(days, cursor_date);
                    }
                }
                other => {
                    tracing::debug!("ignoring schedule keyword {}", other);
                }
            }
        }

        Ok(schedule)
    }

    fn push_step(&mut self, length_days: f64, end_date: NaiveDate) {
        let index = self.report_steps.len();
        self.report_steps.push(ReportStep {
            index,
            length_days,
            end_date,
        });
    }

    pub fn well(&self, name: &str) -> Option<&Well> {
        self.wells.iter().find(|w| w.spec.name == name)
    }

    pub fn has_well(&self, name: &str) -> bool {
        self.well(name).is_some()
    }

    pub fn producers(&self) -> impl Iterator<Item = &Well> {
        self.wells.iter().filter(|w| w.is_producer())
    }

    pub fn injectors(&self) -> impl Iterator<Item = &Well> {
        self.wells.iter().filter(|w| w.is_injector())
    }

    pub fn total_days(&self) -> f64 {
        self.report_steps.iter().map(|s| s.length_days).sum()
    }
}

fn parse_phase(token: &str) -> Option<Phase> {
    match token {
        "OIL" | "LIQ" => Some(Phase::Oil),
        "GAS" => Some(Phase::Gas),
        "WATER" | "WAT" => Some(Phase::Water),
        _ => None,
    }
}

fn find_well<'a>(
    wells: &'a mut [Well],
    name: &str,
    keyword: &str,
    line: usize,
) -> Result<&'a mut Well> {
    wells
        .iter_mut()
        .find(|w| w.spec.name == name)
        .ok_or_else(|| SimError::DeckError {
            keyword: keyword.to_string(),
            line,
            reason: format!("well '{}' has not been declared with WELSPECS", name),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::context::ParseContext;
    use crate::deck::scan::scan;

    fn state_and_deck(schedule_part: &str) -> (EclipseState, Deck) {
        let input = format!(
            "\
RUNSPEC
DIMENS
 2 2 1 /
OIL
GAS
WATER
FIELD
START
 1 'JAN' 2015 /
GRID
DX
 4*100 /
DY
 4*100 /
DZ
 4*20 /
TOPS
 4*8000 /
PORO
 4*0.25 /
PERMX
 4*500 /
SOLUTION
EQUIL
 8020 4500 /
SCHEDULE
{}",
            schedule_part
        );
        let deck = scan(&input, &ParseContext::default()).unwrap();
        let state = EclipseState::from_deck(&deck, &ParseContext::default()).unwrap();
        (state, deck)
    }

    #[test]
    fn test_wells_and_controls() {
        let (state, deck) = state_and_deck(
            "\
WELSPECS
 'PROD' 'G1' 2 2 8020 'OIL' /
 'INJ' 'G1' 1 1 8000 'GAS' /
/
COMPDAT
 'PROD' 2* 1 1 'OPEN' /
 'INJ' 1 1 1 1 'OPEN' /
/
WCONPROD
 'PROD' 'OPEN' 'ORAT' 1500 4* 500 /
/
WCONINJE
 'INJ' 'GAS' 'OPEN' 'RATE' 4000 1* 6000 /
/
TSTEP
 10 20 /
",
        );
        let schedule = Schedule::from_deck(&deck, &state).unwrap();

        assert_eq!(schedule.wells.len(), 2);
        let prod = schedule.well("PROD").unwrap();
        // Defaulted COMPDAT i/j fall back to the well head location.
        assert_eq!(prod.completions[0].i, 2);
        assert_eq!(prod.completions[0].j, 2);
        assert_eq!(
            prod.control,
            WellControl::Producer {
                oil_rate: 1500.0,
                bhp_limit: 500.0
            }
        );

        let inj = schedule.well("INJ").unwrap();
        assert_eq!(
            inj.control,
            WellControl::Injector {
                phase: Phase::Gas,
                rate: 4000.0,
                bhp_limit: 6000.0
            }
        );

        assert_eq!(schedule.producers().count(), 1);
        assert_eq!(schedule.injectors().count(), 1);
    }

    #[test]
    fn test_tstep_report_steps() {
        let (state, deck) = state_and_deck("TSTEP\n 31 28 31 /\nTSTEP\n 30 /\n");
        let schedule = Schedule::from_deck(&deck, &state).unwrap();

        assert_eq!(schedule.report_steps.len(), 4);
        assert_eq!(schedule.total_days(), 120.0);
        assert_eq!(
            schedule.report_steps[0].end_date,
            NaiveDate::from_ymd_opt(2015, 2, 1).unwrap()
        );
        assert_eq!(
            schedule.report_steps[3].end_date,
            NaiveDate::from_ymd_opt(2015, 5, 1).unwrap()
        );
    }

    #[test]
    fn test_dates_report_steps() {
        let (state, deck) =
            state_and_deck("DATES\n 1 'FEB' 2015 /\n 1 'JLY' 2015 /\n/\n");
        let schedule = Schedule::from_deck(&deck, &state).unwrap();

        assert_eq!(schedule.report_steps.len(), 2);
        assert_eq!(schedule.report_steps[0].length_days, 31.0);
        assert_eq!(
            schedule.report_steps[1].end_date,
            NaiveDate::from_ymd_opt(2015, 7, 1).unwrap()
        );
    }

    #[test]
    fn test_control_for_undeclared_well() {
        let (state, deck) = state_and_deck("WCONPROD\n 'GHOST' 'OPEN' 'ORAT' 100 /\n/\n");
        let err = Schedule::from_deck(&deck, &state).unwrap_err();
        assert!(err.to_string().contains("GHOST"));
    }

    #[test]
    fn test_unsupported_producer_mode() {
        let (state, deck) = state_and_deck(
            "WELSPECS\n 'PROD' 'G1' 1 1 8020 'OIL' /\n/\nWCONPROD\n 'PROD' 'OPEN' 'BHP' 100 /\n/\n",
        );
        let err = Schedule::from_deck(&deck, &state).unwrap_err();
        assert!(err.to_string().contains("ORAT"));
    }
}
