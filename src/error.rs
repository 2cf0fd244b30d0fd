//! Application error types using thiserror
//!
//! Error hierarchy:
//! - CheckError: target resolution and version comparison failures
//! - ManifestError: Issues with package.json reading and parsing
//! - RuntimeError: Failures while determining the running Node.js version
//! - PackageManagerError: The project is driven by the wrong package manager
//! - RangeError: Range expressions that do not follow the npm grammar
//! - Output: console write failures

use std::path::PathBuf;
use thiserror::Error;

use crate::package_manager::PackageManager;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Target resolution and comparison errors
    #[error(transparent)]
    Check(#[from] CheckError),

    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Runtime version probing errors
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// Package manager verification errors
    #[error(transparent)]
    PackageManager(#[from] PackageManagerError),

    /// Writing to the console failed
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Errors produced while resolving and checking the target range
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    /// Neither the arguments nor package.json declare a target
    #[error("no target node version: pass one as an argument or set engines.node in package.json")]
    MissingTarget,

    /// The target is not a valid range expression
    #[error("invalid target node version range '{range}': {message}")]
    InvalidRangeSyntax { range: String, message: String },

    /// The running version is outside the target range
    #[error("node {current} does not satisfy '{range}'")]
    VersionMismatch {
        current: String,
        range: String,
        normalized: String,
    },
}

/// Errors related to package.json operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("failed to parse JSON in {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },
}

/// Errors related to determining the running Node.js version
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The node binary could not be started
    #[error("failed to run {binary}: {source}")]
    Spawn {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The node binary exited unsuccessfully
    #[error("{binary} --version exited with {status}: {stderr}")]
    ProbeFailed {
        binary: PathBuf,
        status: String,
        stderr: String,
    },

    /// The reported version is not a semantic version
    #[error("invalid node version '{value}': {message}")]
    InvalidVersion { value: String, message: String },
}

/// Errors related to package manager verification
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PackageManagerError {
    /// The running package manager is not the one the project expects
    #[error("project expects {expected} but was run with {running}")]
    Mismatch {
        expected: PackageManager,
        running: PackageManager,
    },
}

/// Errors in npm range expressions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// A comparator token is not a version or partial version
    #[error("invalid version '{token}'")]
    InvalidVersion { token: String },

    /// An operator is not followed by a version
    #[error("operator '{operator}' has no version")]
    DanglingOperator { operator: String },

    /// A hyphen range is missing one of its bounds
    #[error("incomplete hyphen range")]
    IncompleteHyphen,

    /// A prerelease identifier is malformed
    #[error("invalid prerelease '{value}'")]
    InvalidPrerelease { value: String },
}

impl ManifestError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new JsonParseError
    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl CheckError {
    /// Creates an InvalidRangeSyntax error from a grammar failure
    pub fn invalid_range(range: impl Into<String>, source: &RangeError) -> Self {
        CheckError::InvalidRangeSyntax {
            range: range.into(),
            message: source.to_string(),
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
