//! Error types for the edgectl process-control tool
//!
//! This module defines all error types used throughout the application,
//! providing consistent error handling and user-friendly error messages.

use thiserror::Error;

/// Main error type for the edgectl application
#[derive(Error, Debug)]
pub enum EdgeError {
    /// Errors related to configuration loading/parsing
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors related to the worker's environment-definition file
    #[error("Environment file error: {0}")]
    EnvFile(#[from] EnvFileError),

    /// Errors related to virtualenv provisioning
    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    /// Errors related to worker process control
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing errors
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration file: {path}")]
    LoadFailed { path: String },

    #[error("Failed to save configuration file: {path}")]
    SaveFailed { path: String },

    #[error("Configuration validation error: {message}")]
    ValidationError { message: String },

    #[error("I/O error: {message}")]
    IoError { message: String },
}

/// Environment-definition file errors
#[derive(Error, Debug)]
pub enum EnvFileError {
    #[error("Failed to read environment file {path}: {reason}")]
    ReadFailed { path: String, reason: String },
}

/// Virtualenv provisioning errors
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Python interpreter not found: {name}")]
    InterpreterNotFound { name: String },

    #[error("Failed to create virtualenv: {reason}")]
    VenvCreateFailed { reason: String },

    #[error("Failed to install worker dependencies: {reason}")]
    DependencyInstallFailed { reason: String },
}

/// Worker process control errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    #[error("Failed to spawn worker process: {reason}")]
    SpawnFailed { reason: String },

    #[error("Worker exited with {status}")]
    ExitFailure { status: String },

    #[error("Invalid PID record: {content:?}")]
    InvalidPidRecord { content: String },

    #[error("Failed to signal worker process {pid}: {reason}")]
    SignalFailed { pid: i32, reason: String },

    #[error("Worker process {pid} did not exit within {seconds} seconds")]
    DidNotExit { pid: i32, seconds: u64 },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, EdgeError>;
