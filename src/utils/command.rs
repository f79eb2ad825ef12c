//! Command execution primitives with consistent error handling.

use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};

/// Captured outcome of running an external command.
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Run a command, optionally in a working directory, and capture its outcome.
///
/// Returns an error only when the process could not be spawned; a non-zero
/// exit is reported through the outcome so callers can attach their own
/// context.
pub fn capture(program: &str, args: &[&str], dir: Option<&Path>) -> Result<CommandOutcome> {
    let mut command = Command::new(program);
    command.args(args);
    if let Some(dir) = dir {
        command.current_dir(dir);
    }

    let output = command.output().map_err(|e| {
        Error::internal_io(
            format!("Failed to run {}: {}", program, e),
            Some(program.to_string()),
        )
    })?;

    Ok(CommandOutcome {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}
