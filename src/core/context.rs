//! Per-invocation workflow context.
//!
//! Built once by read-only gateway queries before a workflow runs, and
//! immutable afterwards. Resolution must never create, delete, or push
//! anything.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::gateway::{self, Gateway, Site};

/// Remote platform limit on multidev environment names.
pub const MAX_MULTIDEV_NAME_LEN: usize = 11;

/// Scratch directory under the system temp dir; the per-site working copy
/// lives beneath it.
pub const SCRATCH_DIR_NAME: &str = "terminus-hotfix-plugin-temp";

/// Environments that must always be fully resolved in a context.
pub const DEFAULT_ENVS: [&str; 3] = ["dev", "test", "live"];

#[derive(Debug, Clone)]
pub struct Environment {
    pub id: String,
    /// Tag or branch currently checked out on the remote environment.
    /// `None` for minimally-populated entries.
    pub deployed_ref: Option<String>,
    pub url: Option<String>,
}

impl Environment {
    fn minimal(id: &str) -> Self {
        Self {
            id: id.to_string(),
            deployed_ref: None,
            url: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.deployed_ref.is_some()
    }
}

#[derive(Debug)]
pub struct WorkflowContext {
    pub site: Site,
    /// Environment named in the `<site>.<env>` argument: the source for the
    /// create workflow, the target for the deploy workflow.
    pub env_id: String,
    pub multidev: String,
    pub envs: BTreeMap<String, Environment>,
    pub git_url: String,
    pub git_branches: BTreeSet<String>,
    pub temp_dir: PathBuf,
    pub work_dir: PathBuf,
}

/// Split a `<site>.<env>` identifier.
pub fn parse_site_env(site_env: &str) -> Result<(&str, &str)> {
    match site_env.split_once('.') {
        Some((site, env)) if !site.is_empty() && !env.is_empty() => Ok((site, env)),
        _ => Err(Error::validation_invalid_argument(
            "site_env",
            format!("expected <site>.<env>, got '{}'", site_env),
        )),
    }
}

impl WorkflowContext {
    /// Resolve a context for one workflow invocation.
    ///
    /// Validates the multidev name before any remote call, rejects frozen
    /// sites before any mutation could happen, fully resolves the named
    /// environment plus dev/test/live, and registers every other
    /// environment with minimal detail.
    pub fn resolve(gateway: &dyn Gateway, site_env: &str, multidev: &str) -> Result<Self> {
        if multidev.len() > MAX_MULTIDEV_NAME_LEN {
            return Err(Error::multidev_name_too_long(
                multidev,
                MAX_MULTIDEV_NAME_LEN,
            ));
        }

        let (site_name, env_id) = parse_site_env(site_env)?;

        let site = gateway.site(site_name)?;
        if site.frozen {
            return Err(Error::site_frozen(site.name));
        }

        let mut envs = BTreeMap::new();
        resolve_environment(gateway, &site.name, env_id, &mut envs)?;
        for default_env in DEFAULT_ENVS {
            resolve_environment(gateway, &site.name, default_env, &mut envs)?;
        }

        // Everything else stays minimal until specifically needed; already
        // resolved entries are never overwritten.
        for id in gateway.environment_ids(&site.name)? {
            envs.entry(id.clone())
                .or_insert_with(|| Environment::minimal(&id));
        }

        let git_url = gateway.git_url(&site.name)?;
        let git_branches = gateway.branches(&site.name)?;

        let temp_dir = std::env::temp_dir().join(SCRATCH_DIR_NAME);
        let work_dir = temp_dir.join(&site.name);

        Ok(Self {
            site,
            env_id: env_id.to_string(),
            multidev: multidev.to_string(),
            envs,
            git_url,
            git_branches,
            temp_dir,
            work_dir,
        })
    }

    /// Deployed reference of a fully-resolved environment.
    pub fn deployed_ref(&self, env_id: &str) -> Result<&str> {
        self.envs
            .get(env_id)
            .and_then(|e| e.deployed_ref.as_deref())
            .ok_or_else(|| {
                Error::validation_invalid_argument(
                    "environment",
                    format!("{} is not a fully resolved environment", env_id),
                )
            })
    }
}

/// Resolve one environment, skipping the query if it is already resolved.
fn resolve_environment(
    gateway: &dyn Gateway,
    site: &str,
    env_id: &str,
    envs: &mut BTreeMap<String, Environment>,
) -> Result<()> {
    if envs.get(env_id).is_some_and(Environment::is_resolved) {
        return Ok(());
    }

    let record = gateway.environment(site, env_id)?;
    let environment = Environment {
        id: record.id.clone(),
        deployed_ref: Some(gateway::deployed_ref(&record.target_ref)),
        url: Some(format!("https://{}-{}.pantheonsite.io/", record.id, site)),
    };
    envs.insert(record.id, environment);
    Ok(())
}
