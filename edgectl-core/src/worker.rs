//! Worker process management
//!
//! Spawns the tracker worker in its three modes and terminates a
//! previously started background worker.

use std::fs::{self, OpenOptions};
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tracing::{info, warn};

use crate::config::TrackerConfig;
use crate::envfile::WorkerEnv;
use crate::error::{EdgeError, WorkerError};
use crate::runtime::venv_python;

/// Flag the worker understands for one bounded cycle
pub const ONCE_FLAG: &str = "--once";

/// Interval between liveness polls while waiting for a worker to exit
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Outcome of a termination request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminateOutcome {
    /// SIGTERM was delivered; exit was not confirmed
    Signaled,
    /// The recorded process was already gone
    AlreadyGone,
    /// The worker exited within the wait window
    Exited,
    /// The worker had to be SIGKILLed after the wait window
    Killed,
}

fn worker_command(config: &TrackerConfig, env: &WorkerEnv) -> Command {
    let mut cmd = Command::new(venv_python(config));
    cmd.arg(&config.worker);
    cmd.envs(env);
    cmd
}

/// Run the worker attached to the terminal, blocking until it exits
///
/// With `once` set the worker is asked for a single bounded cycle.
pub fn run_attached(
    config: &TrackerConfig,
    env: &WorkerEnv,
    once: bool,
) -> Result<ExitStatus, EdgeError> {
    let mut cmd = worker_command(config, env);
    if once {
        cmd.arg(ONCE_FLAG);
    }

    info!("Running worker {:?} attached (once={})", config.worker, once);
    let status = cmd.status().map_err(|e| {
        EdgeError::Worker(WorkerError::SpawnFailed {
            reason: e.to_string(),
        })
    })?;

    Ok(status)
}

/// Start the worker detached from the terminal
///
/// The worker gets its own session, stdin from /dev/null and its output
/// appended to the configured log file. Returns the worker's PID; the
/// caller is responsible for recording it.
pub fn spawn_detached(config: &TrackerConfig, env: &WorkerEnv) -> Result<Pid, EdgeError> {
    if let Some(parent) = config.log_file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let stdout_log = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;
    let stderr_log = stdout_log.try_clone()?;

    let mut cmd = worker_command(config, env);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::from(stdout_log))
        .stderr(Stdio::from(stderr_log));

    // New session: the worker must survive the launcher (and its terminal)
    // going away.
    {
        use std::os::unix::process::CommandExt;
        unsafe {
            cmd.pre_exec(|| {
                libc::setsid();
                Ok(())
            });
        }
    }

    let child = cmd.spawn().map_err(|e| {
        EdgeError::Worker(WorkerError::SpawnFailed {
            reason: e.to_string(),
        })
    })?;

    let pid = Pid::from_raw(child.id() as i32);
    info!("Spawned detached worker {:?}, PID {}", config.worker, pid);
    Ok(pid)
}

/// Check if a process with the given PID is alive
///
/// kill(pid, 0) semantics: EPERM means the process exists but belongs to
/// someone else, which still counts as alive. PID values <= 0 address
/// process groups, never a single worker, and are never alive here.
pub fn is_process_alive(pid: Pid) -> bool {
    if pid.as_raw() <= 0 {
        return false;
    }

    match kill(pid, None) {
        Ok(()) => true,
        Err(nix::errno::Errno::EPERM) => true,
        Err(_) => false,
    }
}

/// Request termination of the worker with a single SIGTERM
///
/// Fire-and-forget: success means the signal was delivered, not that the
/// worker exited. A process that is already gone is not an error.
pub fn terminate(pid: Pid) -> Result<TerminateOutcome, EdgeError> {
    match kill(pid, Signal::SIGTERM) {
        Ok(()) => {
            info!("Sent SIGTERM to worker process {}", pid);
            Ok(TerminateOutcome::Signaled)
        }
        Err(nix::errno::Errno::ESRCH) => Ok(TerminateOutcome::AlreadyGone),
        Err(e) => Err(EdgeError::Worker(WorkerError::SignalFailed {
            pid: pid.as_raw(),
            reason: e.to_string(),
        })),
    }
}

/// Terminate the worker and wait for it to actually exit
///
/// Sends SIGTERM, polls for exit up to `timeout`, then escalates to
/// SIGKILL if the worker is still alive.
pub fn terminate_and_wait(pid: Pid, timeout: Duration) -> Result<TerminateOutcome, EdgeError> {
    if terminate(pid)? == TerminateOutcome::AlreadyGone {
        return Ok(TerminateOutcome::AlreadyGone);
    }

    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        std::thread::sleep(WAIT_POLL_INTERVAL);
        if !is_process_alive(pid) {
            return Ok(TerminateOutcome::Exited);
        }
    }

    warn!(
        "Worker process {} did not exit within {:?}, sending SIGKILL",
        pid, timeout
    );
    match kill(pid, Signal::SIGKILL) {
        Ok(()) | Err(nix::errno::Errno::ESRCH) => {}
        Err(e) => {
            return Err(EdgeError::Worker(WorkerError::SignalFailed {
                pid: pid.as_raw(),
                reason: e.to_string(),
            }));
        }
    }

    // Give SIGKILL a moment to take effect
    std::thread::sleep(WAIT_POLL_INTERVAL);
    if is_process_alive(pid) {
        Err(EdgeError::Worker(WorkerError::DidNotExit {
            pid: pid.as_raw(),
            seconds: timeout.as_secs(),
        }))
    } else {
        Ok(TerminateOutcome::Killed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_process_alive_with_nonexistent_pid() {
        // PID 99999999 should not exist
        assert!(!is_process_alive(Pid::from_raw(99999999)));
    }

    #[test]
    fn test_is_process_alive_with_pid_1() {
        // PID 1 (init/systemd) always exists; EPERM still counts as alive
        assert!(is_process_alive(Pid::from_raw(1)));
    }

    #[test]
    fn test_is_process_alive_rejects_group_pids() {
        assert!(!is_process_alive(Pid::from_raw(0)));
        assert!(!is_process_alive(Pid::from_raw(-1)));
    }

    #[test]
    fn test_terminate_nonexistent_process() {
        let outcome = terminate(Pid::from_raw(99999999)).unwrap();
        assert_eq!(outcome, TerminateOutcome::AlreadyGone);
    }

    #[test]
    fn test_terminate_and_wait_nonexistent_process() {
        let outcome =
            terminate_and_wait(Pid::from_raw(99999999), Duration::from_secs(1)).unwrap();
        assert_eq!(outcome, TerminateOutcome::AlreadyGone);
    }

    #[test]
    fn test_terminate_and_wait_exits_sleeping_child() {
        let mut child = Command::new("sleep")
            .arg("30")
            .stdout(Stdio::null())
            .spawn()
            .expect("failed to spawn sleep");
        let pid = Pid::from_raw(child.id() as i32);

        // Reap the child as soon as it dies so the liveness poll does not
        // see a zombie.
        let reaper = std::thread::spawn(move || {
            let _ = child.wait();
        });

        let outcome = terminate_and_wait(pid, Duration::from_secs(5)).expect("terminate failed");
        assert_eq!(outcome, TerminateOutcome::Exited);

        reaper.join().unwrap();
        assert!(!is_process_alive(pid));
    }

    #[test]
    fn test_terminate_delivers_sigterm() {
        let mut child = Command::new("sleep")
            .arg("30")
            .stdout(Stdio::null())
            .spawn()
            .expect("failed to spawn sleep");
        let pid = Pid::from_raw(child.id() as i32);

        let outcome = terminate(pid).expect("terminate failed");
        assert_eq!(outcome, TerminateOutcome::Signaled);

        let status = child.wait().expect("wait failed");
        assert!(!status.success());
    }
}
