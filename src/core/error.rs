use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidValue,
    ConfigMissingToken,

    ValidationInvalidArgument,

    SiteFrozen,

    MultidevNameTooLong,
    MultidevEnvironmentExists,
    MultidevBranchExists,
    MultidevNotFound,

    DeployInvalidTarget,
    DeployInvalidSource,

    GitCommandFailed,

    RemoteApiFailed,
    RemoteJobFailed,
    RemoteJobTimeout,

    InternalIoError,
    InternalJsonError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidValue => "config.invalid_value",
            ErrorCode::ConfigMissingToken => "config.missing_token",

            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::SiteFrozen => "site.frozen",

            ErrorCode::MultidevNameTooLong => "multidev.name_too_long",
            ErrorCode::MultidevEnvironmentExists => "multidev.environment_exists",
            ErrorCode::MultidevBranchExists => "multidev.branch_exists",
            ErrorCode::MultidevNotFound => "multidev.not_found",

            ErrorCode::DeployInvalidTarget => "deploy.invalid_target",
            ErrorCode::DeployInvalidSource => "deploy.invalid_source",

            ErrorCode::GitCommandFailed => "git.command_failed",

            ErrorCode::RemoteApiFailed => "remote.api_failed",
            ErrorCode::RemoteJobFailed => "remote.job_failed",
            ErrorCode::RemoteJobTimeout => "remote.job_timeout",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitCommandFailedDetails {
    pub command: String,
    pub exit_code: i32,
    pub stderr: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MultidevDetails {
    pub multidev: String,
    pub site: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
    ) -> Self {
        let field = field.into();
        let problem = problem.into();
        Self::new(
            ErrorCode::ValidationInvalidArgument,
            format!("Invalid {}: {}", field, problem),
            serde_json::json!({ "field": field, "problem": problem }),
        )
    }

    pub fn config_invalid_value(key: impl Into<String>, problem: impl Into<String>) -> Self {
        let key = key.into();
        let problem = problem.into();
        Self::new(
            ErrorCode::ConfigInvalidValue,
            format!("Invalid configuration value for '{}': {}", key, problem),
            serde_json::json!({ "key": key, "problem": problem }),
        )
    }

    pub fn config_missing_token() -> Self {
        Self::new(
            ErrorCode::ConfigMissingToken,
            "No machine token configured",
            Value::Null,
        )
        .with_hint("Set TERMINUS_MACHINE_TOKEN or add 'machineToken' to the config file")
    }

    pub fn site_frozen(site: impl Into<String>) -> Self {
        let site = site.into();
        Self::new(
            ErrorCode::SiteFrozen,
            format!("The requested site {} is frozen", site),
            serde_json::json!({ "site": site }),
        )
    }

    pub fn multidev_name_too_long(multidev: impl Into<String>, max_len: usize) -> Self {
        let multidev = multidev.into();
        Self::new(
            ErrorCode::MultidevNameTooLong,
            format!(
                "The provided multidev environment name {} is longer than the allowed {} characters",
                multidev, max_len
            ),
            serde_json::json!({ "multidev": multidev, "maxLength": max_len }),
        )
    }

    pub fn multidev_environment_exists(
        multidev: impl Into<String>,
        site: impl Into<String>,
    ) -> Self {
        let multidev = multidev.into();
        let site = site.into();
        let details = details_for_multidev(&multidev, &site);
        Self::new(
            ErrorCode::MultidevEnvironmentExists,
            format!(
                "An environment for the provided multidev environment {} already exists for the site {}",
                multidev, site
            ),
            details,
        )
        .with_hint(format!(
            "Run 'terminus multidev:delete {}.{} --delete-branch' to delete it, or choose a different multidev name",
            site, multidev
        ))
    }

    pub fn multidev_branch_exists(multidev: impl Into<String>, site: impl Into<String>) -> Self {
        let multidev = multidev.into();
        let site = site.into();
        let details = details_for_multidev(&multidev, &site);
        Self::new(
            ErrorCode::MultidevBranchExists,
            format!(
                "A git branch for the provided multidev environment {} already exists for the site {}",
                multidev, site
            ),
            details,
        )
        .with_hint("Delete the remote git branch or choose a different multidev name")
    }

    pub fn multidev_not_found(multidev: impl Into<String>, site: impl Into<String>) -> Self {
        let multidev = multidev.into();
        let site = site.into();
        let details = details_for_multidev(&multidev, &site);
        Self::new(
            ErrorCode::MultidevNotFound,
            format!(
                "An environment for the provided multidev environment {} could not be found for the site {}",
                multidev, site
            ),
            details,
        )
        .with_hint(format!(
            "Create one with 'terminus-hotfix env create {}.live {}'",
            site, multidev
        ))
    }

    pub fn deploy_invalid_target(env: impl Into<String>) -> Self {
        let env = env.into();
        Self::new(
            ErrorCode::DeployInvalidTarget,
            format!(
                "You can not deploy a hotfix to {}. Please try again with test or live",
                env
            ),
            serde_json::json!({ "env": env }),
        )
    }

    pub fn deploy_invalid_source(multidev: impl Into<String>) -> Self {
        let multidev = multidev.into();
        Self::new(
            ErrorCode::DeployInvalidSource,
            format!(
                "You can not deploy a hotfix from the {} environment. Only dev or a multidev environment can be the source",
                multidev
            ),
            serde_json::json!({ "multidev": multidev }),
        )
    }

    pub fn git_command_failed(
        command: impl Into<String>,
        exit_code: i32,
        stderr: impl Into<String>,
    ) -> Self {
        let command = command.into();
        let details = serde_json::to_value(GitCommandFailedDetails {
            command: command.clone(),
            exit_code,
            stderr: stderr.into(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
        Self::new(
            ErrorCode::GitCommandFailed,
            format!("Command {} failed with exit code {}", command, exit_code),
            details,
        )
    }

    pub fn remote_api_failed(status: u16, body: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::RemoteApiFailed,
            format!("API error: HTTP {}", status),
            serde_json::json!({ "status": status, "body": body.into() }),
        )
    }

    pub fn remote_job_failed(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(
            ErrorCode::RemoteJobFailed,
            message.clone(),
            serde_json::json!({ "message": message }),
        )
    }

    pub fn remote_job_timeout(operation: impl Into<String>, waited_secs: u64) -> Self {
        let operation = operation.into();
        Self::new(
            ErrorCode::RemoteJobTimeout,
            format!("Timed out after {}s waiting for {}", waited_secs, operation),
            serde_json::json!({ "operation": operation, "waitedSecs": waited_secs }),
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        Self::new(
            ErrorCode::InternalIoError,
            "IO error",
            serde_json::json!({ "error": error.into(), "context": context }),
        )
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        Self::new(
            ErrorCode::InternalJsonError,
            "JSON error",
            serde_json::json!({ "error": error.into(), "context": context }),
        )
    }
}

fn details_for_multidev(multidev: &str, site: &str) -> Value {
    serde_json::to_value(MultidevDetails {
        multidev: multidev.to_string(),
        site: site.to_string(),
    })
    .unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}
