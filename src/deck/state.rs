use crate::deck::context::{ParseContext, ParseEvent};
use crate::deck::scan::{Deck, DeckKeyword};
use crate::domain::model::{GridDims, PhaseUsage, Phases, UnitSystem};
use crate::utils::error::{Result, SimError};
use chrono::NaiveDate;

/// Cubic feet per reservoir barrel.
const CUBIC_FEET_PER_BARREL: f64 = 5.614583;

/// Static reservoir description assembled from the deck: grid geometry,
/// cell properties, active phases, unit system, start date and the
/// equilibration data the engine initializes from.
#[derive(Debug, Clone, PartialEq)]
pub struct EclipseState {
    pub dims: GridDims,
    pub units: UnitSystem,
    pub phases: Phases,
    pub usage: PhaseUsage,
    pub start_date: NaiveDate,
    pub dx: Vec<f64>,
    pub dy: Vec<f64>,
    pub dz: Vec<f64>,
    pub tops: Vec<f64>,
    pub poro: Vec<f64>,
    pub permx: Vec<f64>,
    pub rock_ref_pressure: f64,
    pub rock_compressibility: f64,
    pub datum_depth: f64,
    pub initial_pressure: f64,
}

impl EclipseState {
    pub fn from_deck(deck: &Deck, ctx: &ParseContext) -> Result<Self> {
        let dims = read_dims(deck, ctx)?;

        let phases = Phases {
            oil: deck.has_keyword("OIL"),
            gas: deck.has_keyword("GAS"),
            water: deck.has_keyword("WATER"),
            dissolved_gas: deck.has_keyword("DISGAS"),
        };
        let usage = PhaseUsage::from_phases(&phases)?;

        let units = if deck.has_keyword("FIELD") {
            UnitSystem::Field
        } else {
            UnitSystem::Metric
        };

        let start_date = match deck.get("START") {
            Some(kw) => super::parse_eclipse_date(kw, 0)?,
            None => NaiveDate::from_ymd_opt(1983, 1, 1).expect("valid fallback date"),
        };

        let cells = dims.cell_count();
        let dx = read_cell_array(deck, "DX", cells)?;
        let dy = read_cell_array(deck, "DY", cells)?;
        let dz = read_cell_array(deck, "DZ", cells)?;
        let tops = read_cell_array(deck, "TOPS", dims.layer_cell_count())?;
        let poro = read_cell_array(deck, "PORO", cells)?;
        let permx = read_cell_array(deck, "PERMX", cells)?;

        let (rock_ref_pressure, rock_compressibility) = match deck.get("ROCK") {
            Some(kw) => (kw.f64_or(0, 0, 14.7)?, kw.f64_or(0, 1, 3.0e-6)?),
            None => (14.7, 3.0e-6),
        };

        let equil = deck.get("EQUIL").ok_or_else(|| SimError::DeckError {
            keyword: "EQUIL".to_string(),
            line: 0,
            reason: "the SOLUTION section must equilibrate the model".to_string(),
        })?;
        let datum_depth = equil.require_f64(0, 0)?;
        let initial_pressure = equil.require_f64(0, 1)?;

        Ok(EclipseState {
            dims,
            units,
            phases,
            usage,
            start_date,
            dx,
            dy,
            dz,
            tops,
            poro,
            permx,
            rock_ref_pressure,
            rock_compressibility,
            datum_depth,
            initial_pressure,
        })
    }

    /// Total pore volume in grid units (cubic feet for field units).
    pub fn pore_volume(&self) -> f64 {
        (0..self.dims.cell_count())
            .map(|c| self.dx[c] * self.dy[c] * self.dz[c] * self.poro[c])
            .sum()
    }

    /// Pore volume in reservoir barrels (field units) or cubic metres.
    pub fn pore_volume_rb(&self) -> f64 {
        match self.units {
            UnitSystem::Field => self.pore_volume() / CUBIC_FEET_PER_BARREL,
            UnitSystem::Metric => self.pore_volume(),
        }
    }

    fn cell_index(&self, i: usize, j: usize, k: usize) -> usize {
        (k - 1) * self.dims.layer_cell_count() + (j - 1) * self.dims.nx + (i - 1)
    }

    /// Permeability-thickness product (md-ft) over a completed column.
    pub fn kh(&self, i: usize, j: usize, k_upper: usize, k_lower: usize) -> f64 {
        (k_upper..=k_lower)
            .map(|k| {
                let c = self.cell_index(i, j, k);
                self.permx[c] * self.dz[c]
            })
            .sum()
    }
}

fn read_dims(deck: &Deck, ctx: &ParseContext) -> Result<GridDims> {
    match deck.get("DIMENS") {
        Some(kw) => Ok(GridDims {
            nx: kw.require_usize(0, 0)?,
            ny: kw.require_usize(0, 1)?,
            nz: kw.require_usize(0, 2)?,
        }),
        None => {
            ctx.handle(
                ParseEvent::MissingDimsKeyword,
                0,
                "DIMENS not found, assuming a single cell",
            )?;
            Ok(GridDims { nx: 1, ny: 1, nz: 1 })
        }
    }
}

fn read_cell_array(deck: &Deck, name: &str, expected: usize) -> Result<Vec<f64>> {
    let kw = deck.get(name).ok_or_else(|| SimError::DeckError {
        keyword: name.to_string(),
        line: 0,
        reason: "required grid array is missing".to_string(),
    })?;

    let mut values = Vec::with_capacity(expected);
    for (ri, record) in kw.records.iter().enumerate() {
        for ii in 0..record.len() {
            values.push(kw.require_f64(ri, ii)?);
        }
    }

    if values.len() != expected {
        return Err(keyword_length_error(kw, values.len(), expected));
    }
    Ok(values)
}

fn keyword_length_error(kw: &DeckKeyword, got: usize, expected: usize) -> SimError {
    SimError::DeckError {
        keyword: kw.name.clone(),
        line: kw.line,
        reason: format!("expected {} values, got {}", expected, got),
    }
}
