use crate::deck::{EclipseState, Schedule};
use crate::domain::model::{Phase, ReportStep, StepReport, Well, WellControl, WellReport};

/// Oil formation volume factor, reservoir barrels per stock-tank barrel.
const BO: f64 = 1.2;
/// Water formation volume factor, reservoir barrels per stock-tank barrel.
const BW: f64 = 1.0;
/// Gas formation volume factor at reservoir conditions, reservoir
/// barrels per Mscf.
const BG: f64 = 0.9;
/// Fluid compressibility added on top of the rock value, 1/psi.
const FLUID_COMPRESSIBILITY: f64 = 3.0e-6;
/// Oil viscosity, cp.
const VISCOSITY: f64 = 1.0;
/// ln(re/rw) drainage term of the radial inflow model.
const LN_RE_RW: f64 = 7.0;

/// Inflow coefficient in reservoir barrels per day per psi for a given
/// permeability-thickness product (md-ft).
fn productivity_index(kh: f64) -> f64 {
    (7.08e-3 * kh / (VISCOSITY * LN_RE_RW)).max(1.0e-6)
}

fn kh_of(state: &EclipseState, well: &Well) -> f64 {
    well.completions
        .iter()
        .filter(|c| c.open)
        .map(|c| state.kh(c.i, c.j, c.k_upper, c.k_lower))
        .sum()
}

fn surface_to_reservoir(phase: Phase, surface_rate: f64) -> f64 {
    match phase {
        Phase::Oil => surface_rate * BO,
        Phase::Water => surface_rate * BW,
        Phase::Gas => surface_rate * BG,
    }
}

/// Advances the field state over one report step with a tank-model
/// material balance: well rates honour their BHP limits against the
/// current average pressure, and the net reservoir voidage depletes or
/// charges the pore volume through total compressibility.
pub fn advance(
    state: &EclipseState,
    schedule: &Schedule,
    pressure: f64,
    step: &ReportStep,
    elapsed_after: f64,
) -> (f64, StepReport) {
    let mut wells = Vec::new();
    let mut produced_rb_per_day = 0.0;
    let mut injected_rb_per_day = 0.0;
    let mut field_oil_rate = 0.0;
    // Producers are oil-rate controlled; no water breakthrough in the
    // tank model.
    let field_water_rate = 0.0;
    let mut field_gas_injection_rate = 0.0;

    for well in &schedule.wells {
        let pi = productivity_index(kh_of(state, well));

        match &well.control {
            WellControl::Producer {
                oil_rate,
                bhp_limit,
            } => {
                let mut reservoir_rate = surface_to_reservoir(Phase::Oil, *oil_rate);
                let mut bhp = pressure - reservoir_rate / pi;
                let rate_limited = bhp < *bhp_limit;
                if rate_limited {
                    bhp = *bhp_limit;
                    reservoir_rate = (pi * (pressure - bhp)).max(0.0);
                }
                let surface_rate = reservoir_rate / BO;

                produced_rb_per_day += reservoir_rate;
                field_oil_rate += surface_rate;
                wells.push(WellReport {
                    name: well.spec.name.clone(),
                    bhp,
                    rate: surface_rate,
                    rate_limited,
                });
            }
            WellControl::Injector {
                phase,
                rate,
                bhp_limit,
            } => {
                let mut reservoir_rate = surface_to_reservoir(*phase, *rate);
                let mut bhp = pressure + reservoir_rate / pi;
                let rate_limited = bhp > *bhp_limit;
                if rate_limited {
                    bhp = *bhp_limit;
                    reservoir_rate = (pi * (bhp - pressure)).max(0.0);
                }
                let surface_rate = reservoir_rate / surface_to_reservoir(*phase, 1.0);

                injected_rb_per_day += reservoir_rate;
                if *phase == Phase::Gas {
                    field_gas_injection_rate += surface_rate;
                }
                wells.push(WellReport {
                    name: well.spec.name.clone(),
                    bhp,
                    rate: surface_rate,
                    rate_limited,
                });
            }
            WellControl::Shut => {
                wells.push(WellReport {
                    name: well.spec.name.clone(),
                    bhp: pressure,
                    rate: 0.0,
                    rate_limited: false,
                });
            }
        }
    }

    let total_compressibility = state.rock_compressibility + FLUID_COMPRESSIBILITY;
    let compliance_rb_per_psi = total_compressibility * state.pore_volume_rb();
    let net_withdrawal_rb = (produced_rb_per_day - injected_rb_per_day) * step.length_days;
    let dp = if compliance_rb_per_psi > 0.0 {
        -net_withdrawal_rb / compliance_rb_per_psi
    } else {
        0.0
    };
    // Average pressure cannot drop below atmospheric in this model.
    let new_pressure = (pressure + dp).max(14.7);

    let report = StepReport {
        step: step.index + 1,
        date: step.end_date,
        length_days: step.length_days,
        elapsed_days: elapsed_after,
        average_pressure: new_pressure,
        field_oil_rate,
        field_water_rate,
        field_gas_injection_rate,
        wells,
    };

    (new_pressure, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{parse_str, ParseContext};

    fn case_with(controls: &str) -> crate::deck::Case {
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
 4*1000 /
DY
 4*1000 /
DZ
 4*50 /
TOPS
 4*8000 /
PORO
 4*0.3 /
PERMX
 4*200 /
PROPS
ROCK
 14.7 3E-6 /
SOLUTION
EQUIL
 8020 4500 /
SCHEDULE
WELSPECS
 'PROD' 'G1' 2 2 8020 'OIL' /
 'INJ' 'G1' 1 1 8000 'GAS' /
/
COMPDAT
 'PROD' 2* 1 1 'OPEN' /
 'INJ' 2* 1 1 'OPEN' /
/
{}TSTEP
 31 /
",
            controls
        );
        parse_str(&input, &ParseContext::default()).unwrap()
    }

    #[test]
    fn test_production_depletes_pressure() {
        let case = case_with("WCONPROD\n 'PROD' 'OPEN' 'ORAT' 2000 4* 500 /\n/\n");
        let step = case.schedule().report_steps[0];

        let (new_pressure, report) =
            advance(case.state(), case.schedule(), 4500.0, &step, 31.0);

        assert!(new_pressure < 4500.0);
        assert!((report.field_oil_rate - 2000.0).abs() < 1e-9);
        let prod = report.wells.iter().find(|w| w.name == "PROD").unwrap();
        assert!(prod.bhp < 4500.0);
        assert!(!prod.rate_limited);
    }

    #[test]
    fn test_injection_charges_pressure() {
        let case = case_with("WCONINJE\n 'INJ' 'GAS' 'OPEN' 'RATE' 5000 1* 9000 /\n/\n");
        let step = case.schedule().report_steps[0];

        let (new_pressure, report) =
            advance(case.state(), case.schedule(), 4500.0, &step, 31.0);

        assert!(new_pressure > 4500.0);
        assert!((report.field_gas_injection_rate - 5000.0).abs() < 1e-9);
        let inj = report.wells.iter().find(|w| w.name == "INJ").unwrap();
        assert!(inj.bhp > 4500.0);
    }

    #[test]
    fn test_bhp_limit_clamps_producer_rate() {
        // A target far beyond what the drawdown to the BHP floor allows.
        let case = case_with("WCONPROD\n 'PROD' 'OPEN' 'ORAT' 900000 4* 4400 /\n/\n");
        let step = case.schedule().report_steps[0];

        let (_, report) = advance(case.state(), case.schedule(), 4500.0, &step, 31.0);

        let prod = report.wells.iter().find(|w| w.name == "PROD").unwrap();
        assert!(prod.rate_limited);
        assert_eq!(prod.bhp, 4400.0);
        assert!(report.field_oil_rate < 900000.0);
    }

    #[test]
    fn test_shut_well_contributes_nothing() {
        let case = case_with("WCONPROD\n 'PROD' 'SHUT' 'ORAT' 2000 /\n/\n");
        let step = case.schedule().report_steps[0];

        let (new_pressure, report) =
            advance(case.state(), case.schedule(), 4500.0, &step, 31.0);

        assert_eq!(new_pressure, 4500.0);
        let prod = report.wells.iter().find(|w| w.name == "PROD").unwrap();
        assert_eq!(prod.rate, 0.0);
    }
}
