//! Command layer: argument parsing and wiring of the workflows to the live
//! gateway, git, and prompt implementations.

pub mod env;

use crate::Result;

/// Command results carry their payload plus the process exit code.
pub type CmdResult<T> = Result<(T, i32)>;
