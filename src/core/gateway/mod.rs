//! Remote platform gateway.
//!
//! Exposes site/environment metadata and the mutating operations of the
//! hosting platform. All mutating calls return an asynchronous job handle
//! (see [`crate::job`]). String-typed booleans coming off the wire are
//! normalized here and never leak past this boundary.

mod http;

pub use http::HttpGateway;

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;
use crate::job::JobHandle;

/// Site metadata. `frozen` arrives from the API as the string "true" or
/// "false" and is decoded into a real boolean during deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "bool_from_loose")]
    pub frozen: bool,
}

/// Raw environment record as returned by the platform.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvRecord {
    pub id: String,
    /// Raw reference such as `refs/tags/pantheon_live_7` or
    /// `refs/heads/master`.
    pub target_ref: String,
}

/// One entry of the site's workflow log.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRecord {
    pub created_at: i64,
    pub description: String,
    pub status: String,
    pub succeeded: bool,
}

impl WorkflowRecord {
    pub fn is_finished(&self) -> bool {
        self.status != "running"
    }
}

/// What to back up and for how long to keep it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupPlan {
    /// `None` backs up code, database and files together.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    pub keep_for_days: u32,
}

impl BackupPlan {
    /// Full backup retained for a year, the hotfix default.
    pub fn full() -> Self {
        Self {
            element: None,
            keep_for_days: 365,
        }
    }
}

/// Connection-mode changes may complete synchronously with a plain message
/// instead of a job.
pub enum ModeChange {
    Applied(String),
    Pending(Box<dyn JobHandle>),
}

pub trait Gateway {
    fn site(&self, name: &str) -> Result<Site>;
    fn environment(&self, site: &str, env: &str) -> Result<EnvRecord>;
    /// Identifiers of every environment the site has, resolved or not.
    fn environment_ids(&self, site: &str) -> Result<Vec<String>>;
    /// Git remote URL from the dev environment's connection info.
    fn git_url(&self, site: &str) -> Result<String>;
    fn branches(&self, site: &str) -> Result<BTreeSet<String>>;

    fn create_environment(
        &self,
        site: &str,
        multidev: &str,
        source_env: &str,
    ) -> Result<Box<dyn JobHandle>>;
    fn create_backup(&self, site: &str, env: &str, plan: &BackupPlan)
        -> Result<Box<dyn JobHandle>>;
    fn set_connection_mode(&self, site: &str, env: &str, mode: &str) -> Result<ModeChange>;
    fn clear_cache(&self, site: &str, env: &str) -> Result<Box<dyn JobHandle>>;

    /// The currently-executing or most recently completed workflow.
    fn latest_workflow(&self, site: &str) -> Result<WorkflowRecord>;
}

/// Strip the `refs/tags/` / `refs/heads/` prefix off a raw target reference.
pub fn deployed_ref(target_ref: &str) -> String {
    target_ref
        .trim_start_matches("refs/tags/")
        .trim_start_matches("refs/heads/")
        .to_string()
}

fn bool_from_loose<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Bool(bool),
        Text(String),
    }

    match Loose::deserialize(deserializer)? {
        Loose::Bool(b) => Ok(b),
        Loose::Text(s) => Ok(matches!(s.as_str(), "true" | "1")),
    }
}
