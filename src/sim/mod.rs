pub mod balance;
pub mod blackoil;
pub mod recorder;

pub use blackoil::{BlackOilSimulator, ControlState};
pub use recorder::{SummaryRecorder, SummaryTable};

/// Registered simulator engines. The engine preflight check validates
/// the requested name against this list before anything is parsed.
pub const ENGINES: &[&str] = &["blackoil"];

pub fn engine_registered(name: &str) -> bool {
    ENGINES.contains(&name)
}

pub fn available_engines() -> String {
    ENGINES.join(", ")
}
