//! CLI response formatting and output.
//!
//! Provides the JSON envelope, printing, and exit code mapping.

use serde::Serialize;

use crate::error::Hint;
use crate::{Error, ErrorCode, Result};

#[derive(Debug, Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CliError>,
}

#[derive(Debug, Serialize)]
pub struct CliError {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<Vec<Hint>>,
}

impl<T: Serialize> CliResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            Error::internal_json(e.to_string(), Some("serialize response".to_string()))
        })
    }
}

impl CliResponse<()> {
    pub fn from_error(err: &Error) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(CliError {
                code: err.code.as_str().to_string(),
                message: err.message.clone(),
                details: err.details.clone(),
                hints: if err.hints.is_empty() {
                    None
                } else {
                    Some(err.hints.clone())
                },
            }),
        }
    }
}

fn print_response<T: Serialize>(response: &CliResponse<T>) -> Result<()> {
    use std::io::{self, Write};

    let payload = response.to_json()?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", payload) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            return Ok(()); // Exit gracefully on SIGPIPE
        }
        return Err(Error::internal_io(
            e.to_string(),
            Some("write stdout".to_string()),
        ));
    }
    Ok(())
}

pub fn print_success<T: Serialize>(data: T) -> Result<()> {
    print_response(&CliResponse::success(data))
}

pub fn print_json_result(result: Result<serde_json::Value>) -> Result<()> {
    match result {
        Ok(data) => print_success(data),
        Err(err) => print_response(&CliResponse::<()>::from_error(&err)),
    }
}

pub fn map_cmd_result_to_json<T: Serialize>(
    result: Result<(T, i32)>,
) -> (Result<serde_json::Value>, i32) {
    match result {
        Ok((data, exit_code)) => match serde_json::to_value(data) {
            Ok(value) => (Ok(value), exit_code),
            Err(err) => (
                Err(Error::internal_json(
                    err.to_string(),
                    Some("serialize response".to_string()),
                )),
                1,
            ),
        },
        Err(err) => {
            let exit_code = exit_code_for_error(err.code);
            (Err(err), exit_code)
        }
    }
}

pub fn exit_code_for_error(code: ErrorCode) -> i32 {
    match code {
        ErrorCode::ConfigInvalidValue
        | ErrorCode::ConfigMissingToken
        | ErrorCode::ValidationInvalidArgument => 2,

        ErrorCode::SiteFrozen
        | ErrorCode::MultidevNameTooLong
        | ErrorCode::MultidevEnvironmentExists
        | ErrorCode::MultidevBranchExists
        | ErrorCode::MultidevNotFound
        | ErrorCode::DeployInvalidTarget
        | ErrorCode::DeployInvalidSource => 4,

        ErrorCode::GitCommandFailed
        | ErrorCode::RemoteApiFailed
        | ErrorCode::RemoteJobFailed
        | ErrorCode::RemoteJobTimeout => 20,

        ErrorCode::InternalIoError | ErrorCode::InternalJsonError => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_usage_exit_code() {
        assert_eq!(exit_code_for_error(ErrorCode::ValidationInvalidArgument), 2);
        assert_eq!(exit_code_for_error(ErrorCode::ConfigMissingToken), 2);
    }

    #[test]
    fn precondition_and_remote_families_are_distinct() {
        assert_eq!(exit_code_for_error(ErrorCode::SiteFrozen), 4);
        assert_eq!(exit_code_for_error(ErrorCode::MultidevNotFound), 4);
        assert_eq!(exit_code_for_error(ErrorCode::GitCommandFailed), 20);
        assert_eq!(exit_code_for_error(ErrorCode::RemoteJobTimeout), 20);
    }

    #[test]
    fn error_envelope_carries_code_and_hints() {
        let err = Error::multidev_not_found("hotfix", "demo");
        let response = CliResponse::<()>::from_error(&err);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "multidev.not_found");
        assert!(json["error"]["hints"][0]["message"]
            .as_str()
            .unwrap()
            .contains("env create demo.live hotfix"));
    }
}
