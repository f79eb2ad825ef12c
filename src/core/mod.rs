pub mod config;
pub mod context;
pub mod error;
pub mod gateway;
pub mod git;
pub mod job;
pub mod options;
pub mod prompt;
pub mod tag;
pub mod watcher;
pub mod workflow;
pub mod workspace;

pub use error::{Error, ErrorCode, Result};
