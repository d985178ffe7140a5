//! Send confirmation gate.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

/// Asks the user to approve an action.
pub trait Confirmation {
    /// Show `prompt` and return whether the answer was affirmative.
    fn confirm(&mut self, prompt: &str) -> io::Result<bool>;
}

/// Closures work as confirmations, which keeps tests short.
impl<F> Confirmation for F
where
    F: FnMut(&str) -> io::Result<bool>,
{
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        self(prompt)
    }
}

/// Only `y` or `Y` counts as yes.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim(), "y" | "Y")
}

/// Writes the prompt to `output` and reads one line from `input`.
pub struct PromptConfirmation<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptConfirmation<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirmation for PromptConfirmation<R, W> {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        Ok(is_affirmative(&answer))
    }
}

/// Prompts on stderr and reads the answer from the controlling terminal,
/// so the seed can still be piped through standard input.
///
/// The terminal is only opened when a confirmation is actually needed.
#[derive(Debug, Default)]
pub struct TerminalConfirmation;

/// Controlling terminal on Unix-like systems.
pub const TERMINAL_PATH: &str = "/dev/tty";

impl Confirmation for TerminalConfirmation {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        let tty = File::open(TERMINAL_PATH)?;
        PromptConfirmation::new(BufReader::new(tty), io::stderr()).confirm(prompt)
    }
}
