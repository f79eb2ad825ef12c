//! Deploy workflow: rebase a hotfix branch onto master and push a
//! deployment tag straight to the target environment.

use serde::Serialize;

use crate::context::WorkflowContext;
use crate::error::{Error, Result};
use crate::gateway::{BackupPlan, Gateway, ModeChange};
use crate::git::Git;
use crate::job::{self, POLL_INTERVAL};
use crate::log_status;
use crate::options::DeployOptions;
use crate::prompt::Confirm;
use crate::tag;
use crate::watcher::{self, WATCH_BUDGET, WATCH_INTERVAL};
use crate::workspace;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployOutput {
    pub site: String,
    pub target_env: String,
    pub multidev: String,
    pub tag: String,
    /// `false` when the operator declined the confirmation gate.
    pub deployed: bool,
}

pub fn run_deploy(
    gateway: &dyn Gateway,
    git: &dyn Git,
    confirm: &dyn Confirm,
    ctx: &WorkflowContext,
    options: &DeployOptions,
) -> Result<DeployOutput> {
    let site = &ctx.site.name;
    let target = &ctx.env_id;

    if !matches!(target.as_str(), "test" | "live") {
        return Err(Error::deploy_invalid_target(target));
    }
    if matches!(ctx.multidev.as_str(), "test" | "live") {
        return Err(Error::deploy_invalid_source(&ctx.multidev));
    }
    if !ctx.envs.contains_key(&ctx.multidev) {
        return Err(Error::multidev_not_found(&ctx.multidev, site));
    }

    workspace::prepare(ctx)?;
    git.clone_repo(&ctx.git_url, &ctx.work_dir)?;
    git.checkout(&ctx.work_dir, &ctx.multidev)?;
    git.fetch_tags(&ctx.work_dir)?;

    let deployed_ref = ctx.deployed_ref(target)?;
    let next_tag = tag::next_tag(target, deployed_ref);

    log_status!(
        "deploy",
        "Creating the tag {} from the previous reference of {} on {}",
        next_tag,
        deployed_ref,
        site
    );
    git.tag_annotated(&ctx.work_dir, &next_tag, &options.message)?;

    log_status!(
        "deploy",
        "Rebasing the changes from {} back to master on {}",
        ctx.multidev,
        site
    );
    git.checkout(&ctx.work_dir, "master")?;
    git.rebase(&ctx.work_dir, &next_tag, options.rebase_strategy())?;

    let question = format!(
        "Are you sure you want to hotfix deploy the changes from the {} straight to the {} environment on {}?",
        ctx.multidev, target, site
    );
    if !confirm.confirm(&question) {
        log_status!("deploy", "Deployment to {} cancelled", target);
        workspace::cleanup(ctx, options.cleanup_temp_dir);
        return Ok(DeployOutput {
            site: site.clone(),
            target_env: target.clone(),
            multidev: ctx.multidev.clone(),
            tag: next_tag,
            deployed: false,
        });
    }

    if options.create_backup {
        create_backup(gateway, site, "dev")?;
    }

    ensure_git_mode(gateway, site)?;

    git.force_push(&ctx.work_dir, "master")?;

    if options.create_backup {
        create_backup(gateway, site, target)?;
    }

    // The baseline must predate the push or the watcher could miss the
    // workflow it triggers.
    let baseline = watcher::baseline_now();
    git.push(&ctx.work_dir, &next_tag)?;

    watcher::watch_deployment(gateway, site, target, baseline, WATCH_INTERVAL, WATCH_BUDGET)?;

    if options.clear_cache {
        let mut job = gateway.clear_cache(site, target)?;
        job::wait_for_success(job.as_mut(), POLL_INTERVAL)?;
        log_status!("deploy", "Caches cleared on {}.{}", site, target);
    }

    log_status!(
        "deploy",
        "Successfully deployed the hotfix changes from {} to {} on {}",
        ctx.multidev,
        target,
        site
    );

    workspace::cleanup(ctx, options.cleanup_temp_dir);

    Ok(DeployOutput {
        site: site.clone(),
        target_env: target.clone(),
        multidev: ctx.multidev.clone(),
        tag: next_tag,
        deployed: true,
    })
}

fn create_backup(gateway: &dyn Gateway, site: &str, env: &str) -> Result<()> {
    log_status!("deploy", "Backing up {}.{}", site, env);
    let mut job = gateway.create_backup(site, env, &BackupPlan::full())?;
    let message = job::wait_for_success(job.as_mut(), POLL_INTERVAL)?;
    log_status!("deploy", "{}", message);
    Ok(())
}

/// The force-push only lands if dev is in git mode. Mode changes may apply
/// synchronously or hand back a job.
fn ensure_git_mode(gateway: &dyn Gateway, site: &str) -> Result<()> {
    match gateway.set_connection_mode(site, "dev", "git")? {
        ModeChange::Applied(message) => log_status!("deploy", "{}", message),
        ModeChange::Pending(mut job) => {
            let message = job::wait_for_success(job.as_mut(), POLL_INTERVAL)?;
            log_status!("deploy", "{}", message);
        }
    }
    Ok(())
}
