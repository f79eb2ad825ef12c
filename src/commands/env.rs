//! `env` subcommands: git-ref, create, and deploy.

use clap::{ArgAction, Args, Subcommand};
use serde::Serialize;

use super::CmdResult;
use crate::config::Config;
use crate::context::WorkflowContext;
use crate::gateway::HttpGateway;
use crate::git::SystemGit;
use crate::options::{CreateOptions, DeployOptions};
use crate::prompt::PromptEngine;
use crate::workflow;
use crate::Result;

#[derive(Debug, Args)]
pub struct EnvArgs {
    #[command(subcommand)]
    pub command: EnvCommand,
}

#[derive(Debug, Subcommand)]
pub enum EnvCommand {
    /// Show the git reference deployed to an environment
    GitRef(GitRefArgs),
    /// Create a multidev environment from an environment's deployed reference
    Create(CreateArgs),
    /// Deploy a hotfix multidev straight to test or live
    Deploy(DeployArgs),
}

#[derive(Debug, Args)]
pub struct GitRefArgs {
    /// Site and environment in the form <site>.<env>
    pub site_env: String,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Site and source environment in the form <site>.<env>
    pub site_env: String,

    /// Name of the multidev environment to create
    #[arg(default_value = "hotfix")]
    pub multidev: String,

    /// Remove the scratch working copy when the run finishes
    #[arg(long, value_name = "BOOL", default_value_t = true, action = ArgAction::Set)]
    pub cleanup_temp_dir: bool,
}

#[derive(Debug, Args)]
pub struct DeployArgs {
    /// Site and target environment in the form <site>.<env>
    pub site_env: String,

    /// Multidev environment holding the hotfix changes
    #[arg(default_value = "hotfix")]
    pub multidev: String,

    /// Remove the scratch working copy when the run finishes
    #[arg(long, value_name = "BOOL", default_value_t = true, action = ArgAction::Set)]
    pub cleanup_temp_dir: bool,

    /// Clear the target environment's caches after deploying
    #[arg(long = "cc", value_name = "BOOL", default_value_t = false, action = ArgAction::Set)]
    pub clear_cache: bool,

    /// Back up dev before the force-push and the target before the deploy
    #[arg(long, value_name = "BOOL", default_value_t = false, action = ArgAction::Set)]
    pub create_backup: bool,

    /// Rebase strategy passed to `git rebase -X`; empty means a plain rebase
    #[arg(long, default_value = "theirs")]
    pub merge_strategy: String,

    /// Annotation message for the deployment tag
    #[arg(long, default_value = "Hotfix deployment")]
    pub message: String,

    /// Answer yes to the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitRefOutput {
    pub site: String,
    pub env: String,
    pub git_ref: String,
}

pub fn run(args: EnvArgs) -> CmdResult<serde_json::Value> {
    let value = match args.command {
        EnvCommand::GitRef(args) => to_value(run_git_ref(&args)?)?,
        EnvCommand::Create(args) => to_value(run_create(&args)?)?,
        EnvCommand::Deploy(args) => to_value(run_deploy(&args)?)?,
    };
    Ok((value, 0))
}

fn run_git_ref(args: &GitRefArgs) -> Result<GitRefOutput> {
    let gateway = connect()?;
    let ctx = WorkflowContext::resolve(&gateway, &args.site_env, "hotfix")?;
    Ok(GitRefOutput {
        site: ctx.site.name.clone(),
        env: ctx.env_id.clone(),
        git_ref: ctx.deployed_ref(&ctx.env_id)?.to_string(),
    })
}

fn run_create(args: &CreateArgs) -> Result<workflow::CreateOutput> {
    let gateway = connect()?;
    let ctx = WorkflowContext::resolve(&gateway, &args.site_env, &args.multidev)?;
    let options = CreateOptions {
        cleanup_temp_dir: args.cleanup_temp_dir,
    };
    workflow::run_create(&gateway, &SystemGit, &ctx, &options)
}

fn run_deploy(args: &DeployArgs) -> Result<workflow::DeployOutput> {
    let gateway = connect()?;
    let ctx = WorkflowContext::resolve(&gateway, &args.site_env, &args.multidev)?;
    let options = DeployOptions {
        cleanup_temp_dir: args.cleanup_temp_dir,
        create_backup: args.create_backup,
        clear_cache: args.clear_cache,
        merge_strategy: args.merge_strategy.clone(),
        message: args.message.clone(),
    };
    let prompt = if args.yes {
        PromptEngine::assume_yes()
    } else {
        PromptEngine::new()
    };
    workflow::run_deploy(&gateway, &SystemGit, &prompt, &ctx, &options)
}

fn connect() -> Result<HttpGateway> {
    let config = Config::load()?;
    HttpGateway::new(&config)
}

fn to_value<T: Serialize>(data: T) -> Result<serde_json::Value> {
    serde_json::to_value(data)
        .map_err(|e| crate::Error::internal_json(e.to_string(), Some("serialize output".into())))
}
