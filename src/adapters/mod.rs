// Adapters layer: concrete implementations for the console gate and
// the summary output destination.

pub mod console;
pub mod storage;

pub use console::{AutoGate, ConsolePrompt};
pub use storage::LocalStorage;
