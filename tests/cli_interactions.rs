//! CLI behavior tests
//!
//! Run the built binary and check output and exit codes for informational
//! flags, validation failures and short local runs.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use regex::Regex;
use std::net::TcpListener;
use std::process::Command;
use tempfile::TempDir;

const ENV_VARS: [&str; 12] = [
    "TCPING_COUNT",
    "TCPING_INTERVAL",
    "TCPING_TIMEOUT",
    "TCPING_PORT",
    "TCPING_COLOR",
    "TCPING_INSECURE",
    "TCPING_LOG",
    "TCPING_LOG_FORMAT",
    "TCPING_LANG",
    "LC_ALL",
    "LC_MESSAGES",
    "LANG",
];

/// Command isolated from the caller's environment and any `.env` file
fn create_test_cmd(workdir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tcping").unwrap();
    cmd.current_dir(workdir.path());
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// A local port with nothing listening on it
fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

#[test]
fn test_help_exits_zero() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("-n, --count"))
        .stdout(predicate::str::contains("-H, --http"));
}

#[test]
fn test_help_wins_over_version() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .args(["-V", "-h"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TCP Mode Examples:"));
}

#[test]
fn test_version_exits_zero() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!(
            "TCPing version {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_validation_errors_exit_one() {
    let cases: [(&[&str], &str); 6] = [
        (&["-4", "-6", "example.com"], "Cannot use both -4 and -6 flags"),
        (&["-t", "-5", "example.com"], "Interval time cannot be negative"),
        (&["-w", "-5", "example.com"], "Timeout cannot be negative"),
        (&["example.com", "70000"], "Port number must be between 1 and 65535"),
        (&[], "Host parameter is required"),
        (&["-H", "ftp://example.com"], "URI must start with http:// or https://"),
    ];

    for (args, message) in cases {
        let dir = TempDir::new().unwrap();
        create_test_cmd(&dir)
            .args(args)
            .assert()
            .code(1)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains(format!("Error: {}", message)));
    }
}

#[test]
fn test_unknown_flag_exits_one() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir).args(["--bogus", "example.com"]).assert().code(1);
}

#[test]
fn test_ipv6_numeric_rejected() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .args(["-6", "-n", "1", "3232235777"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_closed_port_reports_loss() {
    let dir = TempDir::new().unwrap();
    let port = closed_port().to_string();

    let output = create_test_cmd(&dir)
        .args(["-n", "1", "-w", "2000", "127.0.0.1", &port])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    assert!(stdout.starts_with(&format!("TCPing to 127.0.0.1 (IPv4 - 127.0.0.1) port {}\n", port)));
    let failure = Regex::new(&format!(r"TCP connection failed 127\.0\.0\.1:{}: seq=0 error=.+", port)).unwrap();
    assert!(failure.is_match(&stdout), "unexpected output:\n{}", stdout);
    assert!(stdout.contains("\n\n--- TCP ping statistics ---\n"));
    assert!(stdout.contains("Sent = 1, Received = 0, Lost = 1 (100.0% loss)"));
    assert!(!stdout.contains("Round-trip times"));
}

#[test]
fn test_open_port_with_numeric_address() {
    let dir = TempDir::new().unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port().to_string();

    // 2130706433 is 127.0.0.1
    let output = create_test_cmd(&dir)
        .args(["-n", "2", "-t", "10", "-v", "2130706433", &port])
        .output()
        .unwrap();
    drop(listener);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    assert!(stdout.starts_with(&format!("TCPing to 2130706433 (IPv4 - 127.0.0.1) port {}\n", port)));
    let response = Regex::new(&format!(r"Response from 127\.0\.0\.1:{}: seq=(\d) time=\d+\.\d{{2}}ms", port)).unwrap();
    let seqs: Vec<&str> = response
        .captures_iter(&stdout)
        .map(|c| c.get(1).unwrap().as_str())
        .collect();
    assert_eq!(seqs, vec!["0", "1"]);
    assert!(stdout.contains("  Details: Local address=127.0.0.1:"));
    assert!(stdout.contains("Sent = 2, Received = 2, Lost = 0 (0.0% loss)"));
    assert!(stdout.contains("Round-trip times: Min = "));
}

#[test]
fn test_port_flag_used_without_positional_port() {
    let dir = TempDir::new().unwrap();
    let port = closed_port().to_string();

    create_test_cmd(&dir)
        .args(["-n", "1", "-p", &port, "127.0.0.1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("port {}\n", port)));
}

#[test]
fn test_env_file_in_working_directory() {
    let dir = TempDir::new().unwrap();
    let port = closed_port();
    std::fs::write(
        dir.path().join(".env"),
        format!("TCPING_COUNT=2\nTCPING_INTERVAL=10\nTCPING_PORT={}\n", port),
    )
    .unwrap();

    create_test_cmd(&dir)
        .arg("127.0.0.1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sent = 2, Received = 0, Lost = 2 (100.0% loss)"));
}

#[test]
fn test_language_flag_translates_output() {
    let dir = TempDir::new().unwrap();
    let port = closed_port().to_string();

    create_test_cmd(&dir)
        .args(["-l", "zh-CN", "-n", "1", "127.0.0.1", &port])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("正在对 127.0.0.1 (IPv4 - 127.0.0.1) 端口 {} 执行 TCP Ping", port)))
        .stdout(predicate::str::contains(format!("TCP连接失败 127.0.0.1:{}: seq=0 错误=", port)))
        .stdout(predicate::str::contains("--- 目标主机 TCP ping 统计 ---"))
        .stdout(predicate::str::contains("已发送 = 1, 已接收 = 0, 丢失 = 1 (100.0% 丢失)"));
}

#[test]
fn test_unknown_language_falls_back_to_english() {
    let dir = TempDir::new().unwrap();
    let port = closed_port().to_string();

    create_test_cmd(&dir)
        .args(["-l", "xx-YY", "-n", "1", "127.0.0.1", &port])
        .assert()
        .success()
        .stdout(predicate::str::contains("--- TCP ping statistics ---"))
        .stdout(predicate::str::contains("Sent = 1, Received = 0, Lost = 1 (100.0% loss)"));
}

#[test]
fn test_language_from_locale_environment() {
    let dir = TempDir::new().unwrap();
    let port = closed_port().to_string();

    create_test_cmd(&dir)
        .env("LANG", "ko_KR.UTF-8")
        .args(["-n", "1", "127.0.0.1", &port])
        .assert()
        .success()
        .stdout(predicate::str::contains("--- TCP ping 통계 ---"));

    create_test_cmd(&dir)
        .env("LANG", "ko_KR.UTF-8")
        .env("TCPING_LANG", "ja-JP")
        .args(["-n", "1", "127.0.0.1", &port])
        .assert()
        .success()
        .stdout(predicate::str::contains("--- TCP ping統計 ---"));
}

#[test]
fn test_positional_port_overrides_out_of_range_flag() {
    let dir = TempDir::new().unwrap();
    let port = closed_port().to_string();

    create_test_cmd(&dir)
        .args(["-n", "1", "-p", "70000", "127.0.0.1", &port])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("port {}\n", port)));

    create_test_cmd(&dir)
        .args(["-n", "1", "-p", "70000", "127.0.0.1"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Port number must be between 1 and 65535"));
}
