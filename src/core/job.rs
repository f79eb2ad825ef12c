//! Asynchronous remote job polling.
//!
//! Every mutating platform call returns a job handle that must be polled to
//! a terminal status before the owning workflow step counts as complete.

use std::time::{Duration, Instant};

use crate::error::{Error, Result};

/// Default delay between progress checks.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// A single progress observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobProgress {
    Running,
    Done { succeeded: bool, message: String },
}

/// Handle to an in-flight remote operation.
pub trait JobHandle {
    /// Human-readable label for status output and timeout errors.
    fn describe(&self) -> String;

    fn check(&mut self) -> Result<JobProgress>;
}

/// Typed terminal result of polling a job to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Succeeded(String),
    Failed(String),
    TimedOut,
}

/// Poll a job until it reaches a terminal status, sleeping `interval`
/// between checks. A `timeout` of `None` waits indefinitely.
pub fn poll_job(
    job: &mut dyn JobHandle,
    interval: Duration,
    timeout: Option<Duration>,
) -> Result<JobOutcome> {
    let start = Instant::now();
    loop {
        match job.check()? {
            JobProgress::Done { succeeded, message } => {
                return Ok(if succeeded {
                    JobOutcome::Succeeded(message)
                } else {
                    JobOutcome::Failed(message)
                });
            }
            JobProgress::Running => {}
        }

        if let Some(timeout) = timeout {
            if start.elapsed() >= timeout {
                return Ok(JobOutcome::TimedOut);
            }
        }

        std::thread::sleep(interval);
    }
}

/// Wait for a job and require success, surfacing the platform's failure
/// message verbatim.
pub fn wait_for_success(job: &mut dyn JobHandle, interval: Duration) -> Result<String> {
    let operation = job.describe();
    match poll_job(job, interval, None)? {
        JobOutcome::Succeeded(message) => Ok(message),
        JobOutcome::Failed(message) => Err(Error::remote_job_failed(message)),
        JobOutcome::TimedOut => Err(Error::remote_job_timeout(operation, 0)),
    }
}
