//! Create-environment workflow: branch the source environment's deployed
//! reference into a new multidev environment.

use serde::Serialize;

use crate::context::WorkflowContext;
use crate::error::{Error, Result};
use crate::gateway::Gateway;
use crate::git::Git;
use crate::job::{self, POLL_INTERVAL};
use crate::log_status;
use crate::options::CreateOptions;
use crate::workspace;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOutput {
    pub site: String,
    pub source_env: String,
    pub multidev: String,
    pub message: String,
}

pub fn run_create(
    gateway: &dyn Gateway,
    git: &dyn Git,
    ctx: &WorkflowContext,
    options: &CreateOptions,
) -> Result<CreateOutput> {
    let site = &ctx.site.name;
    let branch_exists = ctx.git_branches.contains(&ctx.multidev);
    let environment_exists = ctx.envs.contains_key(&ctx.multidev);

    if branch_exists && environment_exists {
        return Err(Error::multidev_environment_exists(&ctx.multidev, site));
    }
    if branch_exists {
        return Err(Error::multidev_branch_exists(&ctx.multidev, site));
    }

    let source_ref = ctx.deployed_ref(&ctx.env_id)?.to_string();

    workspace::prepare(ctx)?;
    git.clone_repo(&ctx.git_url, &ctx.work_dir)?;
    git.fetch_tags(&ctx.work_dir)?;

    log_status!(
        "create",
        "Branching {} from {} on {}",
        ctx.multidev,
        source_ref,
        site
    );
    git.checkout(&ctx.work_dir, &source_ref)?;
    git.create_branch(&ctx.work_dir, &ctx.multidev)?;
    git.push_upstream(&ctx.work_dir, &ctx.multidev)?;

    let mut job = gateway.create_environment(site, &ctx.multidev, &ctx.env_id)?;
    let message = job::wait_for_success(job.as_mut(), POLL_INTERVAL)?;
    log_status!("create", "{}", message);

    workspace::cleanup(ctx, options.cleanup_temp_dir);

    Ok(CreateOutput {
        site: site.clone(),
        source_env: ctx.env_id.clone(),
        multidev: ctx.multidev.clone(),
        message,
    })
}
