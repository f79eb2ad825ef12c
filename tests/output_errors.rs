use serde_json::json;

use terminus_hotfix::output::{exit_code_for_error, map_cmd_result_to_json, CliResponse};
use terminus_hotfix::{Error, ErrorCode};

#[test]
fn success_envelope_wraps_the_payload() {
    let response = CliResponse::success(json!({ "tag": "pantheon_live_8" }));
    let value = serde_json::to_value(&response).unwrap();

    assert_eq!(value["success"], true);
    assert_eq!(value["data"]["tag"], "pantheon_live_8");
    assert!(value.get("error").is_none());
}

#[test]
fn error_envelope_carries_code_details_and_hints() {
    let err = Error::multidev_environment_exists("hotfix", "demo");
    let response = CliResponse::<()>::from_error(&err);
    let value = serde_json::to_value(&response).unwrap();

    assert_eq!(value["success"], false);
    assert!(value.get("data").is_none());
    assert_eq!(value["error"]["code"], "multidev.environment_exists");
    assert_eq!(value["error"]["details"]["multidev"], "hotfix");
    assert_eq!(value["error"]["details"]["site"], "demo");
    assert!(value["error"]["hints"][0]["message"]
        .as_str()
        .unwrap()
        .contains("terminus multidev:delete demo.hotfix --delete-branch"));
}

#[test]
fn hints_are_omitted_when_empty() {
    let err = Error::deploy_invalid_target("dev");
    let response = CliResponse::<()>::from_error(&err);
    let value = serde_json::to_value(&response).unwrap();

    assert!(value["error"].get("hints").is_none());
}

#[test]
fn git_failures_keep_the_command_and_exit_code_in_details() {
    let err = Error::git_command_failed("git push origin pantheon_live_8", 128, "rejected");
    let response = CliResponse::<()>::from_error(&err);
    let value = serde_json::to_value(&response).unwrap();

    assert_eq!(value["error"]["code"], "git.command_failed");
    assert_eq!(
        value["error"]["details"]["command"],
        "git push origin pantheon_live_8"
    );
    assert_eq!(value["error"]["details"]["exitCode"], 128);
    assert_eq!(value["error"]["details"]["stderr"], "rejected");
}

#[test]
fn cmd_results_map_to_exit_codes_per_error_family() {
    let ok: terminus_hotfix::Result<(serde_json::Value, i32)> = Ok((json!({}), 0));
    let (result, code) = map_cmd_result_to_json(ok);
    assert!(result.is_ok());
    assert_eq!(code, 0);

    let err: terminus_hotfix::Result<(serde_json::Value, i32)> =
        Err(Error::site_frozen("demo"));
    let (result, code) = map_cmd_result_to_json(err);
    assert!(result.is_err());
    assert_eq!(code, 4);

    assert_eq!(exit_code_for_error(ErrorCode::ConfigMissingToken), 2);
    assert_eq!(exit_code_for_error(ErrorCode::RemoteJobTimeout), 20);
    assert_eq!(exit_code_for_error(ErrorCode::InternalIoError), 1);
}
