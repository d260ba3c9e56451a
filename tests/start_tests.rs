//! Integration tests for the start command
//!
//! These tests point the configuration at a pre-built fake virtualenv whose
//! `bin/python` is a small shell script, so the full launch path runs
//! without a real Python installation.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

fn edgectl() -> Command {
    Command::new(env!("CARGO_BIN_EXE_edgectl"))
}

/// Write a config.toml pointing every path into `work`.
///
/// The interpreter name is deliberately bogus: any attempt to re-provision
/// the virtualenv (instead of reusing the fake one) fails the launch.
fn write_config(config_dir: &Path, work: &Path) -> PathBuf {
    let pid_file = work.join("tracker.pid");
    let contents = format!(
        concat!(
            "python = \"definitely-not-a-real-python\"\n",
            "worker = \"{}\"\n",
            "venv_dir = \"{}\"\n",
            "requirements = \"{}\"\n",
            "env_file = \"{}\"\n",
            "pid_file = \"{}\"\n",
            "log_file = \"{}\"\n",
        ),
        work.join("runner.py").display(),
        work.join(".venv").display(),
        work.join("requirements.txt").display(),
        work.join(".env").display(),
        pid_file.display(),
        work.join("logs/tracker.log").display(),
    );
    fs::create_dir_all(config_dir).expect("Failed to create config dir");
    fs::write(config_dir.join("config.toml"), contents).expect("Failed to write config");
    pid_file
}

/// Install a fake `bin/python` shell script into the virtualenv directory.
fn install_fake_python(work: &Path, script_body: &str) {
    let bin_dir = work.join(".venv").join("bin");
    fs::create_dir_all(&bin_dir).expect("Failed to create venv bin dir");
    let python = bin_dir.join("python");
    fs::write(&python, format!("#!/bin/sh\n{}\n", script_body)).expect("Failed to write script");
    fs::set_permissions(&python, fs::Permissions::from_mode(0o755))
        .expect("Failed to set permissions");
}

#[test]
fn test_once_mode_does_not_create_pid_file() {
    let config_dir = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let pid_file = write_config(config_dir.path(), work.path());
    install_fake_python(work.path(), "exit 0");

    let output = edgectl()
        .args(["start", "--once"])
        .env("EDGECTL_CONFIG_DIR", config_dir.path())
        .output()
        .expect("Failed to run edgectl start --once");

    assert!(output.status.success(), "start --once failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Single cycle completed"), "stdout: {}", stdout);
    assert!(!pid_file.exists(), "--once must not create a handle record");
}

#[test]
fn test_existing_venv_is_not_reprovisioned() {
    let config_dir = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    write_config(config_dir.path(), work.path());
    install_fake_python(work.path(), "exit 0");

    // With the bogus interpreter name in the config, this only succeeds
    // because the existing virtualenv is reused untouched.
    let output = edgectl()
        .args(["start", "--once"])
        .env("EDGECTL_CONFIG_DIR", config_dir.path())
        .output()
        .expect("Failed to run edgectl start --once");

    assert!(output.status.success(), "start --once failed: {:?}", output);
}

#[test]
fn test_env_file_variables_reach_the_worker() {
    let config_dir = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    write_config(config_dir.path(), work.path());

    let probe = work.path().join("probe.out");
    fs::write(
        work.path().join(".env"),
        format!(
            "FOO=1\n# HIDDEN=should-not-exist\nPROBE_FILE={}\n",
            probe.display()
        ),
    )
    .unwrap();

    install_fake_python(
        work.path(),
        concat!(
            "echo \"FOO=${FOO:-unset}\" > \"$PROBE_FILE\"\n",
            "echo \"HIDDEN=${HIDDEN:-unset}\" >> \"$PROBE_FILE\"",
        ),
    );

    let output = edgectl()
        .args(["start", "--once"])
        .env("EDGECTL_CONFIG_DIR", config_dir.path())
        .output()
        .expect("Failed to run edgectl start --once");

    assert!(output.status.success(), "start --once failed: {:?}", output);

    let probe_contents = fs::read_to_string(&probe).expect("Worker did not write probe file");
    assert!(probe_contents.contains("FOO=1"), "probe: {}", probe_contents);
    assert!(
        probe_contents.contains("HIDDEN=unset"),
        "comment line must not be exported: {}",
        probe_contents
    );
}

#[test]
fn test_failing_worker_is_reported() {
    let config_dir = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let pid_file = write_config(config_dir.path(), work.path());
    install_fake_python(work.path(), "exit 3");

    let output = edgectl()
        .args(["start", "--once"])
        .env("EDGECTL_CONFIG_DIR", config_dir.path())
        .output()
        .expect("Failed to run edgectl start --once");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Worker exited"), "stderr: {}", stderr);
    assert!(!pid_file.exists());
}

#[test]
fn test_background_mode_records_the_reported_pid() {
    let config_dir = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let pid_file = write_config(config_dir.path(), work.path());
    install_fake_python(work.path(), "sleep 30");

    let output = edgectl()
        .args(["start", "--background"])
        .env("EDGECTL_CONFIG_DIR", config_dir.path())
        .output()
        .expect("Failed to run edgectl start --background");

    assert!(
        output.status.success(),
        "start --background failed: {:?}",
        output
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    let reported_pid: i32 = stdout
        .lines()
        .find_map(|line| line.split("(PID ").nth(1))
        .and_then(|rest| rest.trim_end_matches(')').parse().ok())
        .unwrap_or_else(|| panic!("No PID reported in stdout: {}", stdout));

    let recorded = fs::read_to_string(&pid_file).expect("Handle record not written");
    let recorded_pid: i32 = recorded.trim().parse().expect("Handle record not a PID");
    assert_eq!(
        reported_pid, recorded_pid,
        "reported and recorded PID must match"
    );

    let worker_pid = nix::unistd::Pid::from_raw(recorded_pid);
    assert!(edgectl_core::worker::is_process_alive(worker_pid));

    // Background mode creates the log file up front
    assert!(work.path().join("logs/tracker.log").exists());

    // Cleanup: best-effort kill of the detached sleep
    let _ = nix::sys::signal::kill(worker_pid, nix::sys::signal::Signal::SIGKILL);
}
