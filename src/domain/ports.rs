use crate::deck::{Deck, EclipseState, Schedule, SummaryConfig};
use crate::domain::model::{GateSignal, StepReport};
use crate::sim::recorder::SummaryTable;
use crate::utils::error::Result;

/// Step-wise control surface of a simulator engine. The driver only
/// talks to this trait; the black-oil engine implements it, and tests
/// substitute scripted stand-ins.
pub trait SimulatorControl {
    fn set_eclipse_state(&mut self, state: EclipseState);
    fn set_deck(&mut self, deck: Deck);
    fn set_schedule(&mut self, schedule: Schedule);
    fn set_summary_config(&mut self, config: SummaryConfig);

    fn step_init(&mut self) -> Result<()>;
    fn step(&mut self) -> Result<StepReport>;
    fn step_cleanup(&mut self) -> Result<()>;

    /// Single-shot alternative to the step API. Only supported on a
    /// freshly configured simulator.
    fn run(&mut self) -> Result<Vec<StepReport>>;

    fn schedule_exhausted(&self) -> bool;
    fn take_summary(&mut self) -> SummaryTable;
}

/// Pacing gate between simulation steps. The console adapter blocks on
/// operator input; the auto gate answers a fixed number of times.
pub trait StepGate {
    fn wait(&mut self, completed: &StepReport) -> Result<GateSignal>;
}

impl<G: StepGate + ?Sized> StepGate for Box<G> {
    fn wait(&mut self, completed: &StepReport) -> Result<GateSignal> {
        (**self).wait(completed)
    }
}

/// Destination for recorded summary artifacts.
pub trait SummarySink {
    fn write_file(&self, name: &str, data: &[u8]) -> Result<String>;
}
