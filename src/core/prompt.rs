//! Interactive confirmation.
//!
//! Handles TTY detection and provides consistent prompting behavior; the
//! deploy workflow's confirmation gate goes through the [`Confirm`] seam so
//! tests can script a decline.

use std::io::{self, BufRead, IsTerminal, Write};

/// Yes/no confirmation seam.
pub trait Confirm {
    fn confirm(&self, question: &str) -> bool;
}

pub struct PromptEngine {
    interactive: bool,
    assume_yes: bool,
}

impl PromptEngine {
    /// Engine with automatic TTY detection.
    pub fn new() -> Self {
        Self {
            interactive: io::stdin().is_terminal() && io::stdout().is_terminal(),
            assume_yes: false,
        }
    }

    /// Answer every prompt with yes (the `--yes` flag).
    pub fn assume_yes() -> Self {
        Self {
            interactive: false,
            assume_yes: true,
        }
    }
}

impl Default for PromptEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Confirm for PromptEngine {
    fn confirm(&self, question: &str) -> bool {
        if !self.interactive {
            return self.assume_yes;
        }

        eprint!("{} [y/N]: ", question);
        io::stderr().flush().ok();

        let mut input = String::new();
        if io::stdin().lock().read_line(&mut input).is_err() {
            return false;
        }

        input.trim().to_lowercase().starts_with('y')
    }
}
