//! Resolved target version constraint

use std::fmt;

/// Where the target constraint came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSource {
    /// Command line argument (index 1)
    Argument,
    /// `engines.node` in package.json
    Manifest,
}

impl fmt::Display for TargetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetSource::Argument => write!(f, "argument"),
            TargetSource::Manifest => write!(f, "package.json engines.node"),
        }
    }
}

/// The range the running Node.js version is checked against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetConstraint {
    /// The range expression as written
    pub raw: String,
    /// Where the expression was found
    pub source: TargetSource,
}

impl TargetConstraint {
    /// Creates a new target constraint
    pub fn new(raw: impl Into<String>, source: TargetSource) -> Self {
        Self {
            raw: raw.into(),
            source,
        }
    }

    /// Creates a constraint taken from the command line
    pub fn from_argument(raw: impl Into<String>) -> Self {
        Self::new(raw, TargetSource::Argument)
    }

    /// Creates a constraint taken from package.json
    pub fn from_manifest(raw: impl Into<String>) -> Self {
        Self::new(raw, TargetSource::Manifest)
    }
}

impl fmt::Display for TargetConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
