//! Worker launch command
//!
//! Prepares the runtime environment, loads the worker's environment file
//! and starts the worker in the requested mode.

use edgectl_core::config::toml_config::load_config;
use edgectl_core::envfile::load_env_file;
use edgectl_core::error::{EdgeError, WorkerError};
use edgectl_core::pidfile::PidFile;
use edgectl_core::{runtime, worker};
use tracing::warn;

/// Run the start command
pub fn run_start(once: bool, background: bool) -> Result<(), EdgeError> {
    let config = load_config()?;

    runtime::ensure_runtime(&config)?;

    let env = load_env_file(&config.env_file)?;

    if background {
        let pid_file = PidFile::new(&config.pid_file);
        if pid_file.exists() {
            // Single-writer assumption: a leftover record is overwritten,
            // not treated as a lock.
            warn!(
                "Overwriting existing handle record at {:?}",
                pid_file.path()
            );
        }

        let pid = worker::spawn_detached(&config, &env)?;
        pid_file.store(pid)?;

        println!("Worker started in background (PID {})", pid);
        println!("Logs: {}", config.log_file.display());
        return Ok(());
    }

    let status = worker::run_attached(&config, &env, once)?;
    if !status.success() {
        return Err(EdgeError::Worker(WorkerError::ExitFailure {
            status: status.to_string(),
        }));
    }

    if once {
        println!("Single cycle completed");
    } else {
        println!("Worker exited");
    }
    Ok(())
}
