//! Scratch working copy management.
//!
//! Workflows clone the site repository into a per-site directory under the
//! system temp dir. The directory is recreated fresh for every run and
//! removed again when the run finishes cleanly or is declined.

use std::fs;

use crate::context::WorkflowContext;
use crate::error::{Error, Result};
use crate::log_status;

/// Create the scratch directory and clear any stale working copy from a
/// previous run.
pub fn prepare(ctx: &WorkflowContext) -> Result<()> {
    fs::create_dir_all(&ctx.temp_dir)
        .map_err(|e| Error::internal_io(e.to_string(), Some(ctx.temp_dir.display().to_string())))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&ctx.temp_dir, fs::Permissions::from_mode(0o700)).map_err(|e| {
            Error::internal_io(e.to_string(), Some(ctx.temp_dir.display().to_string()))
        })?;
    }

    if ctx.work_dir.exists() {
        log_status!(
            "workspace",
            "Removing stale working copy at {}",
            ctx.work_dir.display()
        );
        fs::remove_dir_all(&ctx.work_dir).map_err(|e| {
            Error::internal_io(e.to_string(), Some(ctx.work_dir.display().to_string()))
        })?;
    }

    Ok(())
}

/// Remove the working copy if cleanup is enabled. Failures here are
/// reported but never fail the workflow.
pub fn cleanup(ctx: &WorkflowContext, enabled: bool) {
    if !enabled {
        log_status!(
            "workspace",
            "Keeping working copy at {}",
            ctx.work_dir.display()
        );
        return;
    }

    if !ctx.work_dir.exists() {
        return;
    }

    match fs::remove_dir_all(&ctx.work_dir) {
        Ok(()) => log_status!("workspace", "Removed {}", ctx.work_dir.display()),
        Err(e) => log_status!(
            "workspace",
            "Could not remove {}: {}",
            ctx.work_dir.display(),
            e
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Site;
    use std::collections::{BTreeMap, BTreeSet};

    fn context_in(root: &std::path::Path) -> WorkflowContext {
        WorkflowContext {
            site: Site {
                id: "id".into(),
                name: "demo".into(),
                frozen: false,
            },
            env_id: "live".into(),
            multidev: "hotfix".into(),
            envs: BTreeMap::new(),
            git_url: String::new(),
            git_branches: BTreeSet::new(),
            temp_dir: root.to_path_buf(),
            work_dir: root.join("demo"),
        }
    }

    #[test]
    fn prepare_clears_stale_working_copy() {
        let root = tempfile::tempdir().unwrap();
        let ctx = context_in(root.path());

        fs::create_dir_all(ctx.work_dir.join("stale")).unwrap();
        prepare(&ctx).unwrap();

        assert!(ctx.temp_dir.exists());
        assert!(!ctx.work_dir.exists());
    }

    #[test]
    fn cleanup_respects_the_flag() {
        let root = tempfile::tempdir().unwrap();
        let ctx = context_in(root.path());
        fs::create_dir_all(&ctx.work_dir).unwrap();

        cleanup(&ctx, false);
        assert!(ctx.work_dir.exists());

        cleanup(&ctx, true);
        assert!(!ctx.work_dir.exists());
    }
}
