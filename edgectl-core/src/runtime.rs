//! Worker runtime provisioning
//!
//! The worker runs out of a project-local virtualenv. Provisioning is
//! idempotent: an existing virtualenv directory is reused untouched, and
//! dependencies are only installed when the virtualenv is first created.

use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, info};
use which::which;

use crate::config::TrackerConfig;
use crate::error::{EdgeError, RuntimeError};

/// Interpreter inside the virtualenv
pub fn venv_python(config: &TrackerConfig) -> PathBuf {
    config.venv_dir.join("bin").join("python")
}

/// pip inside the virtualenv
fn venv_pip(config: &TrackerConfig) -> PathBuf {
    config.venv_dir.join("bin").join("pip")
}

/// Ensure the virtualenv exists, creating it and installing declared
/// dependencies on first use
///
/// Tool output goes straight to the operator's terminal; failures carry the
/// tool's exit status and are not retried.
pub fn ensure_runtime(config: &TrackerConfig) -> Result<(), EdgeError> {
    if config.venv_dir.is_dir() {
        debug!("Reusing existing virtualenv at {:?}", config.venv_dir);
        return Ok(());
    }

    let interpreter = which(&config.python).map_err(|_| {
        EdgeError::Runtime(RuntimeError::InterpreterNotFound {
            name: config.python.clone(),
        })
    })?;

    info!(
        "Creating virtualenv at {:?} with {:?}",
        config.venv_dir, interpreter
    );
    let status = Command::new(&interpreter)
        .args(["-m", "venv"])
        .arg(&config.venv_dir)
        .status()
        .map_err(|e| {
            EdgeError::Runtime(RuntimeError::VenvCreateFailed {
                reason: e.to_string(),
            })
        })?;
    if !status.success() {
        return Err(EdgeError::Runtime(RuntimeError::VenvCreateFailed {
            reason: format!("{} -m venv exited with {}", interpreter.display(), status),
        }));
    }

    if config.requirements.is_file() {
        info!("Installing dependencies from {:?}", config.requirements);
        let status = Command::new(venv_pip(config))
            .arg("install")
            .arg("-r")
            .arg(&config.requirements)
            .status()
            .map_err(|e| {
                EdgeError::Runtime(RuntimeError::DependencyInstallFailed {
                    reason: e.to_string(),
                })
            })?;
        if !status.success() {
            return Err(EdgeError::Runtime(RuntimeError::DependencyInstallFailed {
                reason: format!("pip install exited with {}", status),
            }));
        }
    } else {
        debug!(
            "No requirements file at {:?}, skipping dependency install",
            config.requirements
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_existing_venv_is_reused() {
        let temp_dir = tempdir().unwrap();
        let venv_dir = temp_dir.path().join("venv");
        std::fs::create_dir_all(&venv_dir).unwrap();

        // The interpreter name is deliberately bogus: if provisioning were
        // attempted instead of reusing the directory, this would fail.
        let config = TrackerConfig {
            python: "definitely-not-a-real-python".to_string(),
            venv_dir,
            ..TrackerConfig::default()
        };

        assert!(ensure_runtime(&config).is_ok());
    }

    #[test]
    fn test_missing_interpreter_is_reported() {
        let temp_dir = tempdir().unwrap();

        let config = TrackerConfig {
            python: "definitely-not-a-real-python".to_string(),
            venv_dir: temp_dir.path().join("venv"),
            ..TrackerConfig::default()
        };

        let result = ensure_runtime(&config);
        assert!(matches!(
            result,
            Err(EdgeError::Runtime(RuntimeError::InterpreterNotFound { .. }))
        ));
    }

    #[test]
    fn test_venv_python_path() {
        let config = TrackerConfig {
            venv_dir: PathBuf::from("/opt/tracker/.venv"),
            ..TrackerConfig::default()
        };

        assert_eq!(
            venv_python(&config),
            PathBuf::from("/opt/tracker/.venv/bin/python")
        );
    }
}
