use crate::utils::error::{Result, SimError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Oil,
    Gas,
    Water,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Oil => write!(f, "OIL"),
            Phase::Gas => write!(f, "GAS"),
            Phase::Water => write!(f, "WATER"),
        }
    }
}

/// Active phases declared in the runspec section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phases {
    pub oil: bool,
    pub gas: bool,
    pub water: bool,
    pub dissolved_gas: bool,
}

impl Phases {
    pub fn active(&self, phase: Phase) -> bool {
        match phase {
            Phase::Oil => self.oil,
            Phase::Gas => self.gas,
            Phase::Water => self.water,
        }
    }

    pub fn count(&self) -> usize {
        [self.oil, self.gas, self.water].iter().filter(|p| **p).count()
    }
}

/// Derived phase usage. Only 2- or 3-phase systems with an active oil
/// phase are accepted; water-gas systems are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseUsage {
    pub num_phases: usize,
    pub aqua: bool,
    pub liquid: bool,
    pub vapour: bool,
}

impl PhaseUsage {
    pub fn from_phases(phases: &Phases) -> Result<Self> {
        let usage = PhaseUsage {
            num_phases: phases.count(),
            aqua: phases.water,
            liquid: phases.oil,
            vapour: phases.gas,
        };

        if usage.num_phases < 2 || usage.num_phases > 3 {
            return Err(SimError::UnsupportedPhases {
                reason: format!("cannot handle cases with {} phases", usage.num_phases),
            });
        }

        if !usage.liquid {
            return Err(SimError::UnsupportedPhases {
                reason: "cannot handle cases with no OIL, i.e. water-gas systems".to_string(),
            });
        }

        Ok(usage)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitSystem {
    Metric,
    Field,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDims {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
}

impl GridDims {
    pub fn cell_count(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    pub fn layer_cell_count(&self) -> usize {
        self.nx * self.ny
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellSpec {
    pub name: String,
    pub group: String,
    pub i: usize,
    pub j: usize,
    pub ref_depth: Option<f64>,
    pub preferred_phase: Phase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub i: usize,
    pub j: usize,
    pub k_upper: usize,
    pub k_lower: usize,
    pub open: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WellControl {
    Producer { oil_rate: f64, bhp_limit: f64 },
    Injector { phase: Phase, rate: f64, bhp_limit: f64 },
    Shut,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Well {
    pub spec: WellSpec,
    pub completions: Vec<Completion>,
    pub control: WellControl,
}

impl Well {
    pub fn is_producer(&self) -> bool {
        matches!(self.control, WellControl::Producer { .. })
    }

    pub fn is_injector(&self) -> bool {
        matches!(self.control, WellControl::Injector { .. })
    }
}

/// One report step of the schedule, in days, with the calendar date at
/// which the step ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportStep {
    pub index: usize,
    pub length_days: f64,
    pub end_date: NaiveDate,
}

/// A requested summary vector: a field-level mnemonic (FOPR, FPR, ...)
/// or a per-well mnemonic qualified by well name (WBHP:PROD).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SummaryKey {
    pub mnemonic: String,
    pub well: Option<String>,
}

impl SummaryKey {
    pub fn field(mnemonic: &str) -> Self {
        SummaryKey {
            mnemonic: mnemonic.to_string(),
            well: None,
        }
    }

    pub fn well(mnemonic: &str, well: &str) -> Self {
        SummaryKey {
            mnemonic: mnemonic.to_string(),
            well: Some(well.to_string()),
        }
    }

    pub fn label(&self) -> String {
        match &self.well {
            Some(w) => format!("{}:{}", self.mnemonic, w),
            None => self.mnemonic.clone(),
        }
    }
}

/// Per-well outcome of one advanced report step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellReport {
    pub name: String,
    pub bhp: f64,
    /// Surface rate in the well's controlling phase (stb/day for liquid,
    /// Mscf/day for gas).
    pub rate: f64,
    pub rate_limited: bool,
}

/// Outcome of one advanced report step, consumed by the summary
/// recorder and shown to the operator between prompts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    pub step: usize,
    pub date: NaiveDate,
    pub length_days: f64,
    pub elapsed_days: f64,
    pub average_pressure: f64,
    pub field_oil_rate: f64,
    pub field_water_rate: f64,
    pub field_gas_injection_rate: f64,
    pub wells: Vec<WellReport>,
}

/// Operator decision between two simulation steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateSignal {
    Continue,
    Stop,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_usage_three_phase() {
        let phases = Phases {
            oil: true,
            gas: true,
            water: true,
            dissolved_gas: true,
        };
        let usage = PhaseUsage::from_phases(&phases).unwrap();
        assert_eq!(usage.num_phases, 3);
        assert!(usage.liquid && usage.vapour && usage.aqua);
    }

    #[test]
    fn test_phase_usage_rejects_single_phase() {
        let phases = Phases {
            oil: true,
            ..Default::default()
        };
        assert!(PhaseUsage::from_phases(&phases).is_err());
    }

    #[test]
    fn test_phase_usage_rejects_water_gas() {
        let phases = Phases {
            gas: true,
            water: true,
            ..Default::default()
        };
        let err = PhaseUsage::from_phases(&phases).unwrap_err();
        assert!(err.to_string().contains("no OIL"));
    }

    #[test]
    fn test_summary_key_label() {
        assert_eq!(SummaryKey::field("FOPR").label(), "FOPR");
        assert_eq!(SummaryKey::well("WBHP", "PROD").label(), "WBHP:PROD");
    }
}
