//! Configuration module
//!
//! Handles loading and saving the tool's configuration from TOML files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod toml_config;

fn default_python() -> String {
    "python3".to_string()
}

fn default_worker() -> PathBuf {
    PathBuf::from("runner.py")
}

fn default_venv_dir() -> PathBuf {
    PathBuf::from(".venv")
}

fn default_requirements() -> PathBuf {
    PathBuf::from("requirements.txt")
}

fn default_env_file() -> PathBuf {
    PathBuf::from(".env")
}

fn default_pid_file() -> PathBuf {
    PathBuf::from("tracker.pid")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("logs/tracker.log")
}

/// Tracker launcher configuration
///
/// All paths the tool touches. Relative paths resolve against the working
/// directory the tool is invoked from, matching a project-local deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Python interpreter used to provision the virtualenv
    #[serde(default = "default_python")]
    pub python: String,

    /// Worker entry point, run with the virtualenv's interpreter
    #[serde(default = "default_worker")]
    pub worker: PathBuf,

    /// Virtualenv directory, created on first launch and reused afterwards
    #[serde(default = "default_venv_dir")]
    pub venv_dir: PathBuf,

    /// Declared worker dependencies, installed into a fresh virtualenv
    #[serde(default = "default_requirements")]
    pub requirements: PathBuf,

    /// Optional environment-definition file exported into the worker
    #[serde(default = "default_env_file")]
    pub env_file: PathBuf,

    /// Handle record for the background worker
    #[serde(default = "default_pid_file")]
    pub pid_file: PathBuf,

    /// Background-mode worker output
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

impl TrackerConfig {
    /// Create a configuration for the given worker entry point,
    /// with defaults for everything else
    pub fn new(worker: PathBuf) -> Self {
        Self {
            worker,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.python.is_empty() {
            return Err("Python interpreter cannot be empty".to_string());
        }

        if self.worker.as_os_str().is_empty() {
            return Err("Worker entry point cannot be empty".to_string());
        }

        if self.venv_dir.as_os_str().is_empty() {
            return Err("Virtualenv directory cannot be empty".to_string());
        }

        if self.pid_file.as_os_str().is_empty() {
            return Err("PID file path cannot be empty".to_string());
        }

        if self.log_file.as_os_str().is_empty() {
            return Err("Log file path cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            python: default_python(),
            worker: default_worker(),
            venv_dir: default_venv_dir(),
            requirements: default_requirements(),
            env_file: default_env_file(),
            pid_file: default_pid_file(),
            log_file: default_log_file(),
        }
    }
}
