use crate::domain::model::{GateSignal, StepReport};
use crate::domain::ports::StepGate;
use crate::utils::error::Result;
use std::io::{BufRead, Write};

/// Blocking console gate: prints a short step summary, then waits for
/// the operator. An empty line continues, anything else ends the pass.
pub struct ConsolePrompt;

impl ConsolePrompt {
    pub fn new() -> Self {
        ConsolePrompt
    }

    /// Maps a raw console line onto the pacing protocol. Only the line
    /// terminator is stripped; any other content stops the pass.
    pub fn classify(line: &str) -> GateSignal {
        if line.trim_end_matches(['\n', '\r']).is_empty() {
            GateSignal::Continue
        } else {
            GateSignal::Stop
        }
    }
}

impl Default for ConsolePrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl StepGate for ConsolePrompt {
    fn wait(&mut self, completed: &StepReport) -> Result<GateSignal> {
        println!(
            "  step {:>3}  {}  pressure {:>7.1} psia  oil {:>9.1} stb/day",
            completed.step, completed.date, completed.average_pressure, completed.field_oil_rate
        );
        print!("Press Enter to continue...");
        std::io::stdout().flush()?;

        let mut line = String::new();
        let bytes = std::io::stdin().lock().read_line(&mut line)?;
        if bytes == 0 {
            // Input closed; stop instead of spinning on an empty pipe.
            return Ok(GateSignal::Stop);
        }
        Ok(Self::classify(&line))
    }
}

/// Unattended gate: answers a fixed number of empty lines, then a
/// non-empty one.
pub struct AutoGate {
    continues: usize,
}

impl AutoGate {
    pub fn new(continues: usize) -> Self {
        AutoGate { continues }
    }
}

impl StepGate for AutoGate {
    fn wait(&mut self, _completed: &StepReport) -> Result<GateSignal> {
        if self.continues == 0 {
            return Ok(GateSignal::Stop);
        }
        self.continues -= 1;
        Ok(GateSignal::Continue)
    }
}
