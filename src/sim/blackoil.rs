use crate::deck::{Deck, EclipseState, Schedule, SummaryConfig};
use crate::domain::model::StepReport;
use crate::domain::ports::SimulatorControl;
use crate::sim::balance;
use crate::sim::recorder::{SummaryRecorder, SummaryTable};
use crate::utils::error::{Result, SimError};

/// Control state of the step-wise API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    Uninitialized,
    Initialized,
    Stepping,
    CleanedUp,
}

impl std::fmt::Display for ControlState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlState::Uninitialized => write!(f, "uninitialized"),
            ControlState::Initialized => write!(f, "initialized"),
            ControlState::Stepping => write!(f, "stepping"),
            ControlState::CleanedUp => write!(f, "cleaned-up"),
        }
    }
}

/// Black-oil engine driven through the step-wise control API.
///
/// Known limitation: step_init() after a completed step_cleanup() does
/// not rewind to the start of the simulation. The schedule position and
/// field pressure carry over, so a second pass resumes where the first
/// one stopped. run() is only supported on a simulator whose step API
/// has never been used.
pub struct BlackOilSimulator {
    state: Option<EclipseState>,
    deck: Option<Deck>,
    schedule: Option<Schedule>,
    summary_config: Option<SummaryConfig>,

    control: ControlState,
    current_step: usize,
    pressure: f64,
    elapsed_days: f64,
    ever_stepped: bool,
    recorder: SummaryRecorder,
}

impl BlackOilSimulator {
    pub fn new() -> Self {
        BlackOilSimulator {
            state: None,
            deck: None,
            schedule: None,
            summary_config: None,
            control: ControlState::Uninitialized,
            current_step: 0,
            pressure: 0.0,
            elapsed_days: 0.0,
            ever_stepped: false,
            recorder: SummaryRecorder::default(),
        }
    }

    pub fn control_state(&self) -> ControlState {
        self.control
    }

    pub fn current_report_step(&self) -> usize {
        self.current_step
    }

    pub fn average_pressure(&self) -> f64 {
        self.pressure
    }

    fn missing_configuration(&self) -> Option<&'static str> {
        if self.state.is_none() {
            Some("eclipse state")
        } else if self.deck.is_none() {
            Some("deck")
        } else if self.schedule.is_none() {
            Some("schedule")
        } else if self.summary_config.is_none() {
            Some("summary config")
        } else {
            None
        }
    }

    fn transition_error(&self, operation: &str) -> SimError {
        SimError::InvalidTransition {
            operation: operation.to_string(),
            state: self.control.to_string(),
        }
    }
}

impl Default for BlackOilSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatorControl for BlackOilSimulator {
    fn set_eclipse_state(&mut self, state: EclipseState) {
        self.state = Some(state);
    }

    fn set_deck(&mut self, deck: Deck) {
        self.deck = Some(deck);
    }

    fn set_schedule(&mut self, schedule: Schedule) {
        self.schedule = Some(schedule);
    }

    fn set_summary_config(&mut self, config: SummaryConfig) {
        self.summary_config = Some(config);
    }

    fn step_init(&mut self) -> Result<()> {
        if matches!(
            self.control,
            ControlState::Initialized | ControlState::Stepping
        ) {
            return Err(self.transition_error("step_init"));
        }
        if let Some(missing) = self.missing_configuration() {
            return Err(SimError::NotConfigured {
                missing: missing.to_string(),
            });
        }

        match self.control {
            ControlState::Uninitialized => {
                let state = self.state.as_ref().expect("state checked above");
                let config = self.summary_config.as_ref().expect("config checked above");
                self.pressure = state.initial_pressure;
                self.current_step = 0;
                self.elapsed_days = 0.0;
                self.recorder = SummaryRecorder::new(config);
                tracing::info!(
                    pressure = self.pressure,
                    "simulator initialized at equilibrium"
                );
            }
            ControlState::CleanedUp => {
                // Does not rewind: the schedule position and pressure of
                // the previous pass carry over.
                tracing::warn!(
                    report_step = self.current_step,
                    "step_init after cleanup resumes the previous position instead of resetting"
                );
            }
            _ => unreachable!("guarded above"),
        }

        self.control = ControlState::Initialized;
        Ok(())
    }

    fn step(&mut self) -> Result<StepReport> {
        if !matches!(
            self.control,
            ControlState::Initialized | ControlState::Stepping
        ) {
            return Err(self.transition_error("step"));
        }

        let state = self.state.as_ref().expect("configured before init");
        let schedule = self.schedule.as_ref().expect("configured before init");

        let Some(step) = schedule.report_steps.get(self.current_step).copied() else {
            return Err(SimError::ScheduleExhausted {
                steps: schedule.report_steps.len(),
            });
        };

        let elapsed_after = self.elapsed_days + step.length_days;
        let (pressure, report) =
            balance::advance(state, schedule, self.pressure, &step, elapsed_after);

        self.pressure = pressure;
        self.elapsed_days = elapsed_after;
        self.current_step += 1;
        self.ever_stepped = true;
        self.control = ControlState::Stepping;
        self.recorder.record(&report);

        tracing::info!(
            step = report.step,
            date = %report.date,
            pressure = %format!("{:.1}", report.average_pressure),
            oil_rate = %format!("{:.1}", report.field_oil_rate),
            "advanced one report step"
        );

        Ok(report)
    }

    fn step_cleanup(&mut self) -> Result<()> {
        if !matches!(
            self.control,
            ControlState::Initialized | ControlState::Stepping
        ) {
            return Err(self.transition_error("step_cleanup"));
        }

        self.control = ControlState::CleanedUp;
        tracing::info!(
            report_steps = self.current_step,
            "simulator cleaned up"
        );
        Ok(())
    }

    fn run(&mut self) -> Result<Vec<StepReport>> {
        if self.control != ControlState::Uninitialized || self.ever_stepped {
            return Err(SimError::RunAfterStepping);
        }

        self.step_init()?;
        let mut reports = Vec::new();
        while !self.schedule_exhausted() {
            reports.push(self.step()?);
        }
        self.step_cleanup()?;
        Ok(reports)
    }

    fn schedule_exhausted(&self) -> bool {
        match &self.schedule {
            Some(schedule) => self.current_step >= schedule.report_steps.len(),
            None => true,
        }
    }

    fn take_summary(&mut self) -> SummaryTable {
        self.recorder.take()
    }
}
