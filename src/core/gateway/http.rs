//! HTTP implementation of the platform gateway.

use std::collections::BTreeSet;

use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::gateway::{BackupPlan, EnvRecord, Gateway, ModeChange, Site, WorkflowRecord};
use crate::job::{JobHandle, JobProgress};

fn http_error(e: reqwest::Error) -> Error {
    Error::internal_io(format!("HTTP request failed: {}", e), Some("gateway".into()))
}

fn parse_error(e: impl std::fmt::Display) -> Error {
    Error::internal_json(format!("Invalid JSON response: {}", e), Some("gateway".into()))
}

pub struct HttpGateway {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpGateway {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            base_url: config.api_base_url().trim_end_matches('/').to_string(),
            token: config.machine_token()?.to_string(),
        })
    }

    fn get(&self, path: &str) -> Result<Value> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
            .send()
            .map_err(http_error)?;
        parse_json_response(response)
    }

    fn send_json(&self, method: reqwest::Method, path: &str, body: &Value) -> Result<Value> {
        let response = self
            .client
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .map_err(http_error)?;
        parse_json_response(response)
    }

    fn start_job(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &Value,
        label: &str,
    ) -> Result<Box<dyn JobHandle>> {
        let value = self.send_json(method, path, body)?;
        let started: StartedWorkflow =
            serde_json::from_value(value).map_err(parse_error)?;
        Ok(Box::new(HttpJob {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: self.token.clone(),
            path: format!("/workflows/{}", started.id),
            label: label.to_string(),
        }))
    }
}

impl Gateway for HttpGateway {
    fn site(&self, name: &str) -> Result<Site> {
        let value = self.get(&format!("/sites/{}", name))?;
        serde_json::from_value(value).map_err(parse_error)
    }

    fn environment(&self, site: &str, env: &str) -> Result<EnvRecord> {
        let value = self.get(&format!("/sites/{}/environments/{}", site, env))?;
        serde_json::from_value(value).map_err(parse_error)
    }

    fn environment_ids(&self, site: &str) -> Result<Vec<String>> {
        let value = self.get(&format!("/sites/{}/environments", site))?;
        let map = value
            .as_object()
            .ok_or_else(|| parse_error("expected environment map"))?;
        Ok(map.keys().cloned().collect())
    }

    fn git_url(&self, site: &str) -> Result<String> {
        let value = self.get(&format!("/sites/{}/environments/dev/connection-info", site))?;
        let info: ConnectionInfo = serde_json::from_value(value).map_err(parse_error)?;
        Ok(info.git_url)
    }

    fn branches(&self, site: &str) -> Result<BTreeSet<String>> {
        let value = self.get(&format!("/sites/{}/code/branches", site))?;
        let map = value
            .as_object()
            .ok_or_else(|| parse_error("expected branch map"))?;
        Ok(map.keys().cloned().collect())
    }

    fn create_environment(
        &self,
        site: &str,
        multidev: &str,
        source_env: &str,
    ) -> Result<Box<dyn JobHandle>> {
        self.start_job(
            reqwest::Method::POST,
            &format!("/sites/{}/environments/{}", site, multidev),
            &json!({ "source": source_env }),
            &format!("creation of the {} environment", multidev),
        )
    }

    fn create_backup(
        &self,
        site: &str,
        env: &str,
        plan: &BackupPlan,
    ) -> Result<Box<dyn JobHandle>> {
        let body = serde_json::to_value(plan)
            .map_err(|e| Error::internal_json(e.to_string(), Some("backup plan".into())))?;
        self.start_job(
            reqwest::Method::POST,
            &format!("/sites/{}/environments/{}/backups", site, env),
            &body,
            &format!("backup of the {} environment", env),
        )
    }

    fn set_connection_mode(&self, site: &str, env: &str, mode: &str) -> Result<ModeChange> {
        let value = self.send_json(
            reqwest::Method::PUT,
            &format!("/sites/{}/environments/{}/connection-mode", site, env),
            &json!({ "mode": mode }),
        )?;

        // The platform answers with a plain message when the environment is
        // already in the requested mode, and with a workflow otherwise.
        if let Some(message) = value.get("message").and_then(Value::as_str) {
            return Ok(ModeChange::Applied(message.to_string()));
        }

        let started: StartedWorkflow = serde_json::from_value(value).map_err(parse_error)?;
        Ok(ModeChange::Pending(Box::new(HttpJob {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: self.token.clone(),
            path: format!("/workflows/{}", started.id),
            label: format!("connection-mode change on {}", env),
        })))
    }

    fn clear_cache(&self, site: &str, env: &str) -> Result<Box<dyn JobHandle>> {
        self.start_job(
            reqwest::Method::POST,
            &format!("/sites/{}/environments/{}/clear-cache", site, env),
            &json!({}),
            &format!("cache clear on {}", env),
        )
    }

    fn latest_workflow(&self, site: &str) -> Result<WorkflowRecord> {
        let value = self.get(&format!("/sites/{}/workflows?paged=false", site))?;
        let records: Vec<WorkflowRecord> =
            serde_json::from_value(value).map_err(parse_error)?;
        records
            .into_iter()
            .next()
            .ok_or_else(|| parse_error("workflow log is empty"))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartedWorkflow {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectionInfo {
    git_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkflowStatus {
    result: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

struct HttpJob {
    client: Client,
    base_url: String,
    token: String,
    path: String,
    label: String,
}

impl JobHandle for HttpJob {
    fn describe(&self) -> String {
        self.label.clone()
    }

    fn check(&mut self) -> Result<JobProgress> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, self.path))
            .bearer_auth(&self.token)
            .send()
            .map_err(http_error)?;
        let value = parse_json_response(response)?;
        let status: WorkflowStatus = serde_json::from_value(value).map_err(parse_error)?;

        let message = |s: &WorkflowStatus, fallback: &str| {
            s.message.clone().unwrap_or_else(|| fallback.to_string())
        };

        Ok(match status.result.as_deref() {
            Some("succeeded") => JobProgress::Done {
                succeeded: true,
                message: message(&status, &format!("Finished {}", self.label)),
            },
            Some("failed") | Some("aborted") => JobProgress::Done {
                succeeded: false,
                message: message(&status, &format!("Failed {}", self.label)),
            },
            _ => JobProgress::Running,
        })
    }
}

fn parse_json_response(response: Response) -> Result<Value> {
    let status = response.status();
    let body = response.text().map_err(http_error)?;

    if !status.is_success() {
        return Err(Error::remote_api_failed(status.as_u16(), body));
    }

    serde_json::from_str(&body).map_err(parse_error)
}
