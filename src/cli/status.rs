//! Worker status command
//!
//! Read-only: reports the handle record and worker liveness without
//! touching either.

use edgectl_core::config::toml_config::load_config;
use edgectl_core::error::EdgeError;
use edgectl_core::pidfile::PidFile;
use edgectl_core::worker;

/// Run the status command
pub fn run_status() -> Result<(), EdgeError> {
    let config = load_config()?;
    let pid_file = PidFile::new(&config.pid_file);

    match pid_file.load()? {
        None => println!("Worker: not running (no handle record)"),
        Some(pid) if worker::is_process_alive(pid) => {
            println!("Worker: running (PID {})", pid)
        }
        Some(pid) => println!(
            "Worker: not running (stale handle record for PID {})",
            pid
        ),
    }

    Ok(())
}
