//! Worker stop command
//!
//! Reads the handle record, signals the tracked worker and removes the
//! record. Safe to call when nothing is tracked or the record is stale.

use std::time::Duration;

use edgectl_core::config::toml_config::load_config;
use edgectl_core::error::EdgeError;
use edgectl_core::pidfile::PidFile;
use edgectl_core::worker::{self, TerminateOutcome};

/// How long `stop --wait` gives the worker before escalating to SIGKILL
const STOP_WAIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Run the stop command
pub fn run_stop(wait: bool) -> Result<(), EdgeError> {
    let config = load_config()?;
    let pid_file = PidFile::new(&config.pid_file);

    // Scoped acquisition: the record is consumed here, so every path below
    // leaves no handle record behind.
    let pid = match pid_file.take()? {
        Some(pid) => pid,
        None => {
            println!(
                "No tracked worker (no handle record at {})",
                config.pid_file.display()
            );
            println!(
                "If a worker is running anyway, find it with: pgrep -f {}",
                config.worker.display()
            );
            return Ok(());
        }
    };

    if !worker::is_process_alive(pid) {
        println!(
            "Recorded worker (PID {}) is not running; removed stale record",
            pid
        );
        return Ok(());
    }

    let outcome = if wait {
        worker::terminate_and_wait(pid, STOP_WAIT_TIMEOUT)?
    } else {
        worker::terminate(pid)?
    };

    match outcome {
        TerminateOutcome::Signaled => println!("Stopped worker (PID {})", pid),
        TerminateOutcome::Exited => println!("Worker (PID {}) exited", pid),
        TerminateOutcome::Killed => {
            println!("Worker (PID {}) killed after {:?} timeout", pid, STOP_WAIT_TIMEOUT)
        }
        TerminateOutcome::AlreadyGone => println!(
            "Recorded worker (PID {}) is not running; removed stale record",
            pid
        ),
    }

    Ok(())
}
