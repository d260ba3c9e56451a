//! Worker environment-definition file loading
//!
//! The worker's configuration arrives through plain `KEY=VALUE` lines in an
//! optional env file. Everything declared there is exported into the worker
//! process; comment lines and blank lines produce nothing.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{EdgeError, EnvFileError};

/// Environment handed to the worker process
pub type WorkerEnv = BTreeMap<String, String>;

/// Load environment variables from the env-definition file
///
/// A missing file yields an empty environment. Entries that fail to parse
/// are skipped with a warning rather than aborting the launch.
pub fn load_env_file(path: &Path) -> Result<WorkerEnv, EdgeError> {
    let mut vars = WorkerEnv::new();

    if !path.is_file() {
        debug!("No environment file at {:?}", path);
        return Ok(vars);
    }

    let iter = dotenvy::from_path_iter(path).map_err(|e| {
        EdgeError::EnvFile(EnvFileError::ReadFailed {
            path: path.to_string_lossy().to_string(),
            reason: e.to_string(),
        })
    })?;

    for item in iter {
        match item {
            Ok((key, value)) => {
                vars.insert(key, value);
            }
            Err(err) => {
                warn!("Failed to parse env entry in {:?}: {}", path, err);
            }
        }
    }

    if !vars.is_empty() {
        info!(
            "Loaded {} environment variables from {:?}",
            vars.len(),
            path
        );
    }

    Ok(vars)
}
