//! Unified error types for cndev
//!
//! This module defines all error types used throughout the crate.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from CNDEV operations
    #[error(transparent)]
    Cndev(#[from] CndevError),

    /// Error from process table lookups
    #[error("Process lookup error: {0}")]
    Process(#[from] ProcessError),

    /// Error from configuration parsing/validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No device matched the requested identifier
    #[error("MLU device not found: {0}")]
    DeviceNotFound(String),

    /// No MLU cards detected in the system
    #[error("No Cambricon MLU devices detected")]
    NoDevicesFound,

    /// IO error (file operations, output)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the native CNDEV capability
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CndevError {
    /// The shared library (or one of its symbols) could not be loaded
    #[error("could not load CNDEV library: {0}")]
    LibraryNotFound(String),

    /// A native call returned a non-success status
    #[error("cndev: {message}")]
    Native { code: i32, message: String },

    /// The native layer reported a value that cannot be represented
    #[error("cndev: invalid reading for device {index}: {detail}")]
    InvalidReading { index: u32, detail: String },
}

impl CndevError {
    /// Build a native failure from a status code and its diagnostic string
    pub fn native(code: i32, message: impl Into<String>) -> Self {
        Self::Native {
            code,
            message: message.into(),
        }
    }

    /// True when the failure is a deployment problem (driver missing)
    pub fn is_load_error(&self) -> bool {
        matches!(self, Self::LibraryNotFound(_))
    }
}

/// Errors from process table lookups
#[derive(Error, Debug)]
pub enum ProcessError {
    /// Lookup for pid 0, which never names a real process
    #[error("pid 0 is not a valid process: {0}")]
    InvalidPid(#[source] std::io::Error),

    /// Reading the process record failed
    #[error("failed to read process {pid}: {source}")]
    Read {
        pid: u32,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from configuration parsing and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Invalid config value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
