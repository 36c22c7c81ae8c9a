pub mod driver;

pub use crate::domain::model::{GateSignal, StepReport};
pub use crate::domain::ports::{SimulatorControl, StepGate, SummarySink};
pub use crate::utils::error::Result;
pub use driver::{DriveReport, PassEnd, PassSummary, SmokeDriver};
