//! Current Node.js runtime version detection
//!
//! This module provides:
//! - Parsing of `node --version` output (`v18.12.1`)
//! - A probe that asks the node binary for its version
//! - A fixed probe for environments that supply the version directly

use crate::config::Config;
use crate::error::RuntimeError;
use semver::Version;
use std::path::PathBuf;
use std::process::Command;

/// Trait for obtaining the version of the running Node.js
pub trait RuntimeProbe {
    /// Returns the current runtime version
    fn current_version(&self) -> Result<Version, RuntimeError>;
}

/// Parse a Node.js version string, with or without the leading `v`
pub fn parse_node_version(value: &str) -> Result<Version, RuntimeError> {
    let trimmed = value.trim();
    let stripped = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(stripped).map_err(|e| RuntimeError::InvalidVersion {
        value: trimmed.to_string(),
        message: e.to_string(),
    })
}

/// Probe that runs `<binary> --version`
#[derive(Debug, Clone)]
pub struct NodeRuntime {
    binary: PathBuf,
}

impl NodeRuntime {
    /// Create a probe for the given node binary
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl RuntimeProbe for NodeRuntime {
    fn current_version(&self) -> Result<Version, RuntimeError> {
        let output = Command::new(&self.binary)
            .arg("--version")
            .output()
            .map_err(|e| RuntimeError::Spawn {
                binary: self.binary.clone(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(RuntimeError::ProbeFailed {
                binary: self.binary.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_node_version(&stdout)
    }
}

/// Probe that reports a version supplied up front (`NOVER_NODE_VERSION`)
///
/// The value is parsed on every call.
#[derive(Debug, Clone)]
pub struct FixedRuntime {
    value: String,
}

impl FixedRuntime {
    /// Create a probe that always reports `value`
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl RuntimeProbe for FixedRuntime {
    fn current_version(&self) -> Result<Version, RuntimeError> {
        parse_node_version(&self.value)
    }
}

/// Pick the probe for a configuration
///
/// `NOVER_NODE_VERSION` wins over running the node binary.
pub fn probe_from_config(config: &Config) -> Box<dyn RuntimeProbe> {
    match &config.node_version {
        Some(value) => Box::new(FixedRuntime::new(value.clone())),
        None => Box::new(NodeRuntime::new(config.node_binary.clone())),
    }
}
