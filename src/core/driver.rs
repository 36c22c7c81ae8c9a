use crate::deck::Case;
use crate::domain::model::{GateSignal, StepReport};
use crate::domain::ports::{SimulatorControl, StepGate};
use crate::utils::error::Result;

/// Transfers the four parsed sub-objects from the case into the
/// simulator.
pub fn wire<S: SimulatorControl>(simulator: &mut S, case: &Case) {
    simulator.set_eclipse_state(case.state().clone());
    simulator.set_deck(case.deck().clone());
    simulator.set_schedule(case.schedule().clone());
    simulator.set_summary_config(case.summary_config().clone());
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassEnd {
    Operator,
    ScheduleExhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassSummary {
    pub pass: usize,
    pub steps: usize,
    pub ended_by: PassEnd,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriveReport {
    pub passes: Vec<PassSummary>,
}

impl DriveReport {
    pub fn total_steps(&self) -> usize {
        self.passes.iter().map(|p| p.steps).sum()
    }
}

/// Drives a simulator through repeated init / step-loop / cleanup
/// cycles, pausing at the gate after every step. Two passes by default:
/// the second one exercises re-initialization of the engine.
pub struct SmokeDriver<S: SimulatorControl, G: StepGate> {
    simulator: S,
    gate: G,
    passes: usize,
}

impl<S: SimulatorControl, G: StepGate> SmokeDriver<S, G> {
    pub fn new(simulator: S, gate: G) -> Self {
        SmokeDriver {
            simulator,
            gate,
            passes: 2,
        }
    }

    pub fn with_passes(mut self, passes: usize) -> Self {
        self.passes = passes.max(1);
        self
    }

    pub fn drive(&mut self) -> Result<DriveReport> {
        let mut report = DriveReport::default();

        for pass in 1..=self.passes {
            if pass > 1 {
                // The engine does not rewind on step_init after cleanup;
                // a later pass resumes where the previous one stopped.
                tracing::info!(pass, "starting another pass over the step API");
            } else {
                tracing::info!(pass, "starting step-wise pass");
            }

            self.simulator.step_init()?;

            let mut steps = 0;
            let mut ended_by = PassEnd::ScheduleExhausted;
            while !self.simulator.schedule_exhausted() {
                let step_report = self.simulator.step()?;
                steps += 1;
                if self.gate.wait(&step_report)? == GateSignal::Stop {
                    ended_by = PassEnd::Operator;
                    break;
                }
            }

            self.simulator.step_cleanup()?;
            tracing::info!(pass, steps, ended_by = ?ended_by, "pass finished");

            report.passes.push(PassSummary {
                pass,
                steps,
                ended_by,
            });
        }

        Ok(report)
    }

    /// The single-shot alternative to the step-wise passes.
    pub fn single_shot(&mut self) -> Result<Vec<StepReport>> {
        self.simulator.run()
    }

    pub fn into_simulator(self) -> S {
        self.simulator
    }
}
