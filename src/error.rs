//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: go.mod snapshots that cannot be read or decoded
//! - DiffError: version-control operations (diff, show) that failed
//! - InventoryError: package listing failed or produced undecodable output
//! - ResolutionError: full module resolution listing failed
//! - TempWriteError: baseline modfile could not be materialised on disk
//! - ConfigError: invalid CLI or ripple.toml configuration
//!
//! Every error is fatal for the invocation; nothing is retried.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest snapshot related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Version-control related errors
    #[error(transparent)]
    Diff(#[from] DiffError),

    /// Package inventory related errors
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// Module resolution related errors
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// Temporary baseline modfile errors
    #[error(transparent)]
    TempWrite(#[from] TempWriteError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The caller-supplied deadline expired before an external call finished
    #[error("deadline exceeded while {step}")]
    DeadlineExceeded { step: String },
}

/// Failure of an external command
#[derive(Error, Debug)]
pub enum CommandError {
    /// The process could not be started
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The process exited unsuccessfully
    #[error("`{command}` failed ({status}): {stderr}")]
    Exit {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// Errors related to go.mod snapshots
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("go.mod not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read manifest file
    #[error("failed to read go.mod {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// go.mod content could not be decoded
    #[error("failed to parse {origin} (line {line}): {message}")]
    Parse {
        origin: String,
        line: usize,
        message: String,
    },
}

/// Errors related to version-control operations
#[derive(Error, Debug)]
pub enum DiffError {
    /// A git command failed
    #[error("git operation failed: {0}")]
    Command(#[from] CommandError),

    /// git produced output that is not valid UTF-8
    #[error("git produced non UTF-8 output for `{command}`")]
    InvalidOutput { command: String },
}

/// Errors related to the package inventory listing
#[derive(Error, Debug)]
pub enum InventoryError {
    /// `go list` failed
    #[error("package listing failed: {0}")]
    Command(#[from] CommandError),

    /// `go list -json` output could not be decoded
    #[error("failed to decode package listing: {message}")]
    Decode { message: String },

    /// Two packages share one import path
    #[error("package {import_path} listed more than once")]
    DuplicateUnit { import_path: String },
}

/// Errors related to module resolution listings
#[derive(Error, Debug)]
pub enum ResolutionError {
    /// `go list -m all` failed
    #[error("module resolution failed: {0}")]
    Command(#[from] CommandError),

    /// `go list -m` produced output that is not valid UTF-8
    #[error("module resolution produced non UTF-8 output")]
    InvalidOutput,
}

/// Baseline modfile could not be written to a temporary location
#[derive(Error, Debug)]
#[error("failed to write temporary baseline file {path}: {source}")]
pub struct TempWriteError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid duration format
    #[error("invalid duration format '{value}': expected format like '30s', '5m', '1h'")]
    InvalidDuration { value: String },

    /// Invalid output format name
    #[error(
        "invalid output format '{value}': expected 'plain', 'json', 'test-plan', 'test-matrix' or 'explain'"
    )]
    InvalidOutputFormat { value: String },

    /// Failed to read the configuration file
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error
    #[error("failed to parse TOML in {path}: {message}")]
    TomlParseError { path: PathBuf, message: String },

    /// Invalid project path
    #[error("invalid path '{path}': {message}")]
    InvalidPath { path: PathBuf, message: String },
}

impl AppError {
    /// Creates a new DeadlineExceeded error
    pub fn deadline_exceeded(step: impl Into<String>) -> Self {
        AppError::DeadlineExceeded { step: step.into() }
    }
}

impl CommandError {
    /// Creates a new Spawn error
    pub fn spawn(command: impl Into<String>, source: std::io::Error) -> Self {
        CommandError::Spawn {
            command: command.into(),
            source,
        }
    }

    /// Creates a new Exit error, trimming the captured stderr
    pub fn exit(command: impl Into<String>, status: ExitStatus, stderr: &[u8]) -> Self {
        CommandError::Exit {
            command: command.into(),
            status,
            stderr: String::from_utf8_lossy(stderr).trim().to_string(),
        }
    }
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new Parse error
    pub fn parse(origin: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        ManifestError::Parse {
            origin: origin.into(),
            line,
            message: message.into(),
        }
    }
}

impl InventoryError {
    /// Creates a new Decode error
    pub fn decode(message: impl Into<String>) -> Self {
        InventoryError::Decode {
            message: message.into(),
        }
    }
}

impl TempWriteError {
    /// Creates a new TempWriteError
    pub fn new(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TempWriteError {
            path: path.into(),
            source,
        }
    }
}
