//! End-to-end tests for the cnb-mcp binary
//!
//! A fake `curl` placed first on PATH stands in for the network so the
//! binary can be exercised without reaching the real MCP server.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn cnb_mcp(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cnb-mcp").expect("binary should build");
    cmd.current_dir(workdir)
        .env_remove("CNB_TOKEN")
        .env_remove("CNB_MCP_URL")
        .env("NO_COLOR", "1");
    cmd
}

/// Install a fake curl that logs its arguments and prints `stdout`
#[cfg(unix)]
fn install_fake_curl(bin_dir: &TempDir, stdout: &str, exit_code: i32) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let log = bin_dir.path().join("curl-args.txt");
    let reply = bin_dir.path().join("reply.txt");
    fs::write(&reply, stdout).unwrap();

    let script = format!(
        "#!/bin/sh\nprintf '%s\\n' \"$@\" > '{log}'\nwhile IFS= read -r line || [ -n \"$line\" ]; do printf '%s\\n' \"$line\"; done < '{reply}'\n{fail}exit {exit_code}\n",
        log = log.display(),
        reply = reply.display(),
        fail = if exit_code != 0 {
            "echo 'curl: (7) Failed to connect' >&2\n"
        } else {
            ""
        },
        exit_code = exit_code,
    );

    let curl = bin_dir.path().join("curl");
    fs::write(&curl, script).unwrap();
    fs::set_permissions(&curl, fs::Permissions::from_mode(0o755)).unwrap();
    log
}

fn read_args(log: &Path) -> Vec<String> {
    fs::read_to_string(log)
        .expect("fake curl should have been called")
        .lines()
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Usage Tests
// ============================================================================

#[test]
fn test_no_arguments_is_usage_error() {
    let dir = TempDir::new().unwrap();
    cnb_mcp(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_unknown_operation_is_usage_error() {
    let dir = TempDir::new().unwrap();
    cnb_mcp(dir.path())
        .arg("frobnicate")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("frobnicate"));
}

#[test]
fn test_call_without_tool_name_is_usage_error() {
    let dir = TempDir::new().unwrap();
    cnb_mcp(dir.path())
        .env("CNB_TOKEN", "t")
        .arg("call")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_help_exits_zero() {
    let dir = TempDir::new().unwrap();
    cnb_mcp(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list-tools"))
        .stdout(predicate::str::contains("call"));
}

// ============================================================================
// Token Tests
// ============================================================================

#[test]
fn test_missing_token_exits_before_network() {
    let dir = TempDir::new().unwrap();
    let env_file = dir.path().join("empty.env");
    fs::write(&env_file, "# nothing here\n").unwrap();

    cnb_mcp(dir.path())
        .arg("--env-file")
        .arg(&env_file)
        .arg("list-tools")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("CNB_TOKEN is not set"))
        .stderr(predicate::str::contains("\"hint\""));
}

#[cfg(unix)]
#[test]
fn test_missing_token_never_runs_curl() {
    let dir = TempDir::new().unwrap();
    let bin = TempDir::new().unwrap();
    let log = install_fake_curl(&bin, "{}", 0);

    cnb_mcp(dir.path())
        .env("PATH", bin.path())
        .arg("list-tools")
        .assert()
        .code(1);

    assert!(!log.exists(), "curl must not run without a token");
}

#[cfg(unix)]
#[test]
fn test_env_file_in_working_directory_beats_environment() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".env"), "CNB_TOKEN=\"file-token\"\n").unwrap();
    let bin = TempDir::new().unwrap();
    let log = install_fake_curl(&bin, r#"{"result":{"tools":[]}}"#, 0);

    cnb_mcp(dir.path())
        .env("PATH", bin.path())
        .env("CNB_TOKEN", "env-token")
        .arg("list-tools")
        .assert()
        .success();

    let args = read_args(&log);
    assert!(args.contains(&"Authorization: Bearer file-token".to_string()));
}

#[cfg(unix)]
#[test]
fn test_unreadable_env_file_warns_and_uses_environment() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".env"), [0xff, 0xfe, 0xfd]).unwrap();
    let bin = TempDir::new().unwrap();
    let log = install_fake_curl(&bin, r#"{"result":{}}"#, 0);

    cnb_mcp(dir.path())
        .env("PATH", bin.path())
        .env("CNB_TOKEN", "env-token")
        .arg("list-tools")
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning:"));

    let args = read_args(&log);
    assert!(args.contains(&"Authorization: Bearer env-token".to_string()));
}

// ============================================================================
// Request / Response Tests
// ============================================================================

#[cfg(unix)]
#[test]
fn test_list_tools_prints_sse_result() {
    let dir = TempDir::new().unwrap();
    let bin = TempDir::new().unwrap();
    let log = install_fake_curl(
        &bin,
        "event: message\ndata: {\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{\"tools\":[{\"name\":\"list_repos\"}]}}\n",
        0,
    );

    cnb_mcp(dir.path())
        .env("PATH", bin.path())
        .env("CNB_TOKEN", "secret")
        .arg("list-tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"list_repos\""));

    let args = read_args(&log);
    assert!(args.contains(&"https://mcp.cnb.cool/mcp".to_string()));
    assert!(args.contains(&"Content-Type: application/json".to_string()));
    assert!(args.contains(&"Accept: application/json, text/event-stream".to_string()));
    assert_eq!(
        args.last().unwrap(),
        r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#
    );
}

#[cfg(unix)]
#[test]
fn test_call_sends_coerced_arguments() {
    let dir = TempDir::new().unwrap();
    let bin = TempDir::new().unwrap();
    let log = install_fake_curl(&bin, r#"{"jsonrpc":"2.0","id":1,"result":{"ok":true}}"#, 0);

    cnb_mcp(dir.path())
        .env("PATH", bin.path())
        .env("CNB_TOKEN", "secret")
        .env("CNB_MCP_URL", "http://127.0.0.1:9/mcp")
        .args(["call", "get_user", "count=3", "name=bob", "stray"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ok\": true"))
        .stderr(predicate::str::contains("stray"));

    let args = read_args(&log);
    assert!(args.contains(&"http://127.0.0.1:9/mcp".to_string()));
    let body: serde_json::Value = serde_json::from_str(args.last().unwrap()).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": {"name": "get_user", "arguments": {"count": 3, "name": "bob"}}
        })
    );
}

#[cfg(unix)]
#[test]
fn test_remote_error_exits_one() {
    let dir = TempDir::new().unwrap();
    let bin = TempDir::new().unwrap();
    install_fake_curl(
        &bin,
        r#"{"jsonrpc":"2.0","id":1,"error":{"code":-1,"message":"bad"}}"#,
        0,
    );

    cnb_mcp(dir.path())
        .env("PATH", bin.path())
        .env("CNB_TOKEN", "secret")
        .arg("list-tools")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("\"message\": \"bad\""));
}

#[cfg(unix)]
#[test]
fn test_curl_failure_exits_one() {
    let dir = TempDir::new().unwrap();
    let bin = TempDir::new().unwrap();
    install_fake_curl(&bin, "", 7);

    cnb_mcp(dir.path())
        .env("PATH", bin.path())
        .env("CNB_TOKEN", "secret")
        .arg("list-tools")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("curl failed: curl: (7) Failed to connect"));
}

#[cfg(unix)]
#[test]
fn test_malformed_response_exits_one() {
    let dir = TempDir::new().unwrap();
    let bin = TempDir::new().unwrap();
    install_fake_curl(&bin, "<html>502 Bad Gateway</html>", 0);

    cnb_mcp(dir.path())
        .env("PATH", bin.path())
        .env("CNB_TOKEN", "secret")
        .arg("list-tools")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("JSON parse failed"))
        .stderr(predicate::str::contains("502 Bad Gateway"));
}

#[cfg(unix)]
#[test]
fn test_verbose_masks_token() {
    let dir = TempDir::new().unwrap();
    let bin = TempDir::new().unwrap();
    install_fake_curl(&bin, r#"{"result":{}}"#, 0);

    cnb_mcp(dir.path())
        .env("PATH", bin.path())
        .env("CNB_TOKEN", "supersecret")
        .args(["--verbose", "list-tools"])
        .assert()
        .success()
        .stderr(predicate::str::contains("supe****"))
        .stderr(predicate::str::contains("supersecret").not());
}

#[cfg(unix)]
#[test]
fn test_global_flag_after_tool_arguments() {
    let dir = TempDir::new().unwrap();
    let bin = TempDir::new().unwrap();
    let log = install_fake_curl(&bin, r#"{"result":{}}"#, 0);

    cnb_mcp(dir.path())
        .env("PATH", bin.path())
        .env("CNB_TOKEN", "supersecret")
        .args(["call", "get_user", "k=v", "n=-1", "--verbose"])
        .assert()
        .success()
        .stderr(predicate::str::contains("endpoint:"))
        .stderr(predicate::str::contains("ignoring argument").not());

    let args = read_args(&log);
    let body: serde_json::Value = serde_json::from_str(args.last().unwrap()).unwrap();
    assert_eq!(body["params"]["arguments"], serde_json::json!({"k": "v", "n": -1}));
}

#[cfg(unix)]
#[test]
fn test_short_token_is_not_echoed_in_verbose_mode() {
    let dir = TempDir::new().unwrap();
    let bin = TempDir::new().unwrap();
    install_fake_curl(&bin, r#"{"result":{}}"#, 0);

    cnb_mcp(dir.path())
        .env("PATH", bin.path())
        .env("CNB_TOKEN", "k9#z")
        .args(["--verbose", "list-tools"])
        .assert()
        .success()
        .stderr(predicate::str::contains("token: ****"))
        .stderr(predicate::str::contains("k9#z").not());
}
