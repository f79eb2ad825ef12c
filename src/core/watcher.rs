//! Deployment watcher.
//!
//! Pushing a deployment tag triggers a platform-side code sync workflow that
//! is not tied to any job handle. The watcher polls the site's workflow log
//! for a matching entry newer than a baseline timestamp captured just before
//! the push.

use std::thread;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::gateway::Gateway;
use crate::log_status;

pub const WATCH_INTERVAL: Duration = Duration::from_secs(5);
pub const WATCH_BUDGET: Duration = Duration::from_secs(60);

/// Description the platform assigns to the code-sync workflow for an
/// environment.
pub fn expected_description(target_env: &str) -> String {
    format!("Deploy code to \"{}\"", target_env)
}

/// Current wall-clock time as a unix timestamp, captured as the watcher
/// baseline immediately before the tag push.
pub fn baseline_now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Wait for the deployment workflow started by a tag push to finish.
///
/// Only workflows created after `baseline` with the expected description
/// count; older log entries from previous deploys are ignored. The log is
/// checked at least once before the budget is enforced, and exhausting the
/// budget is fatal since the deployment state is then unknown.
pub fn watch_deployment(
    gateway: &dyn Gateway,
    site: &str,
    target_env: &str,
    baseline: i64,
    interval: Duration,
    budget: Duration,
) -> Result<()> {
    let expected = expected_description(target_env);
    let started = Instant::now();

    loop {
        let workflow = gateway.latest_workflow(site)?;
        if workflow.created_at > baseline && workflow.description == expected {
            log_status!(
                "watch",
                "Workflow '{}' {}",
                workflow.description,
                workflow.status
            );
            if workflow.is_finished() {
                if workflow.succeeded {
                    return Ok(());
                }
                return Err(Error::remote_job_failed(format!(
                    "The workflow '{}' finished unsuccessfully",
                    workflow.description
                )));
            }
        } else {
            log_status!(
                "watch",
                "Current workflow is '{}'; waiting for '{}'",
                workflow.description,
                expected
            );
        }

        if started.elapsed() >= budget {
            return Err(Error::remote_job_timeout(expected, budget.as_secs()));
        }

        thread::sleep(interval);
    }
}
