pub mod adapters;
pub mod config;
pub mod core;
pub mod deck;
pub mod domain;
pub mod sim;
pub mod utils;

pub use adapters::{AutoGate, ConsolePrompt, LocalStorage};
pub use config::{DriveMode, RunConfig};
pub use core::driver::SmokeDriver;
pub use deck::{Case, ParseContext};
pub use sim::BlackOilSimulator;
pub use utils::error::{Result, SimError};
