//! CLI exit-code integration tests
//!
//! The binary is run against a closed local port, so no FTP server is
//! needed.

use std::fs;
use std::net::TcpListener;
use std::process::Command;
use tempfile::TempDir;

fn sqlship() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sqlship"));
    cmd.env_remove("FTP_PASS")
        .env_remove("SQLSHIP_SEED")
        .env_remove("RUST_LOG");
    cmd
}

fn closed_port() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port().to_string()
}

#[test]
fn test_invalid_port_exits_1() {
    let temp_dir = TempDir::new().unwrap();
    let output = sqlship()
        .current_dir(temp_dir.path())
        .args(["people", "127.0.0.1", "70000", "u", "pw", "in"])
        .output()
        .expect("Failed to execute CLI");

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_missing_arguments_exit_1() {
    let output = sqlship()
        .args(["people", "127.0.0.1"])
        .output()
        .expect("Failed to execute CLI");

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_dash_password_without_env_exits_3() {
    let temp_dir = TempDir::new().unwrap();
    let output = sqlship()
        .current_dir(temp_dir.path())
        .args(["people", "127.0.0.1", "21", "u", "-", "in"])
        .output()
        .expect("Failed to execute CLI");

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("FTP_PASS"), "stderr: {}", stderr);
}

#[test]
fn test_unreachable_server_exits_2_and_cleans_up() {
    let temp_dir = TempDir::new().unwrap();
    let port = closed_port();
    let output = sqlship()
        .current_dir(temp_dir.path())
        .env("FTP_PASS", "s3cr3t-pw")
        .args([
            "data/people",
            "127.0.0.1",
            port.as_str(),
            "backup",
            "-",
            "incoming",
            "--retries",
            "1",
            "--timeout",
            "5",
            "--tls",
            "disabled",
            "--rows",
            "12",
        ])
        .output()
        .expect("Failed to execute CLI");

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Backup and upload failed"));

    let data_files: Vec<_> = fs::read_dir(temp_dir.path().join("data"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(data_files.iter().any(|name| name.starts_with("people_") && name.ends_with(".sqlite")));
    assert!(data_files.iter().all(|name| !name.contains("_backup_")));

    let logs: Vec<_> = fs::read_dir(temp_dir.path().join("logs"))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(logs.len(), 1);
    let log_text = fs::read_to_string(&logs[0]).unwrap();
    assert!(log_text.contains("pass: *********"));
    assert!(!log_text.contains("s3cr3t-pw"));
}
