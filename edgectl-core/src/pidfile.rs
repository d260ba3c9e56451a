//! Background worker handle record
//!
//! The PID file is the only state shared between `start --background` and
//! `stop`: a single integer PID at a well-known path. Its existence is a
//! best-effort claim that a worker is running under that PID; the record
//! can outlive its process, so readers must tolerate stale entries.

use std::fs;
use std::path::{Path, PathBuf};

use nix::unistd::Pid;
use tracing::debug;

use crate::error::{EdgeError, WorkerError};

/// Handle record for the background worker
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    /// Create a handle-record accessor for the given path
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Path of the handle record
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check whether a record currently exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the recorded PID
    ///
    /// An absent file reads as `None`. Unparsable content is an error.
    pub fn load(&self) -> Result<Option<Pid>, EdgeError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let pid: i32 = content.trim().parse().map_err(|_| {
            EdgeError::Worker(WorkerError::InvalidPidRecord {
                content: content.trim().to_string(),
            })
        })?;

        Ok(Some(Pid::from_raw(pid)))
    }

    /// Persist `pid`, overwriting any previous record
    pub fn store(&self, pid: Pid) -> Result<(), EdgeError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&self.path, format!("{}\n", pid))?;
        debug!("Recorded worker PID {} in {:?}", pid, self.path);
        Ok(())
    }

    /// Remove the record. A missing file is fine.
    pub fn remove(&self) -> Result<(), EdgeError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Removed handle record {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Read and consume the record in one scoped step
    ///
    /// The file is removed whatever the read turned up, so every caller
    /// exit path leaves no record behind. Garbage content still reports
    /// an error after the cleanup.
    pub fn take(&self) -> Result<Option<Pid>, EdgeError> {
        let loaded = self.load();
        self.remove()?;
        loaded
    }
}
