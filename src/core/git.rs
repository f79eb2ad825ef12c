//! Local repository operations, each one an atomic step that either
//! succeeds or aborts the running workflow.

use std::path::Path;

use crate::error::{Error, Result};
use crate::utils::command;

/// Version-control seam used by the workflows.
///
/// One method per git step so tests can record call order and assert that
/// precondition failures perform zero git operations.
pub trait Git {
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()>;
    fn fetch_tags(&self, repo: &Path) -> Result<()>;
    fn checkout(&self, repo: &Path, reference: &str) -> Result<()>;
    fn create_branch(&self, repo: &Path, branch: &str) -> Result<()>;
    fn push_upstream(&self, repo: &Path, branch: &str) -> Result<()>;
    fn tag_annotated(&self, repo: &Path, tag: &str, message: &str) -> Result<()>;
    fn rebase(&self, repo: &Path, onto: &str, strategy: Option<&str>) -> Result<()>;
    fn push(&self, repo: &Path, reference: &str) -> Result<()>;
    fn force_push(&self, repo: &Path, branch: &str) -> Result<()>;
}

/// Runs git as an external process. Non-zero exit status is fatal and
/// carries the command text and exit code.
pub struct SystemGit;

impl SystemGit {
    fn git(&self, dir: Option<&Path>, args: &[&str]) -> Result<String> {
        let display = format!("git {}", args.join(" "));
        crate::log_status!("git", "Running {}", display);

        let outcome = command::capture("git", args, dir)?;
        if !outcome.success {
            return Err(Error::git_command_failed(
                display,
                outcome.exit_code,
                outcome.stderr,
            ));
        }
        Ok(outcome.stdout)
    }
}

impl Git for SystemGit {
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        self.git(None, &["clone", url, &dest.to_string_lossy()])?;
        Ok(())
    }

    fn fetch_tags(&self, repo: &Path) -> Result<()> {
        self.git(Some(repo), &["fetch", "--tags"])?;
        Ok(())
    }

    fn checkout(&self, repo: &Path, reference: &str) -> Result<()> {
        self.git(Some(repo), &["checkout", reference])?;
        Ok(())
    }

    fn create_branch(&self, repo: &Path, branch: &str) -> Result<()> {
        self.git(Some(repo), &["checkout", "-b", branch])?;
        Ok(())
    }

    fn push_upstream(&self, repo: &Path, branch: &str) -> Result<()> {
        self.git(Some(repo), &["push", "-u", "origin", branch])?;
        Ok(())
    }

    fn tag_annotated(&self, repo: &Path, tag: &str, message: &str) -> Result<()> {
        self.git(Some(repo), &["tag", "-a", tag, "-m", message])?;
        Ok(())
    }

    fn rebase(&self, repo: &Path, onto: &str, strategy: Option<&str>) -> Result<()> {
        match strategy {
            Some(strategy) => self.git(Some(repo), &["rebase", "-X", strategy, onto])?,
            None => self.git(Some(repo), &["rebase", onto])?,
        };
        Ok(())
    }

    fn push(&self, repo: &Path, reference: &str) -> Result<()> {
        self.git(Some(repo), &["push", "origin", reference])?;
        Ok(())
    }

    fn force_push(&self, repo: &Path, branch: &str) -> Result<()> {
        self.git(Some(repo), &["push", "origin", branch, "--force"])?;
        Ok(())
    }
}
