//! Target resolution and version comparison
//!
//! Resolution: the argument override replaces the package.json declaration;
//! if neither exists the check fails with `MissingTarget`.
//!
//! Comparison: the target must parse as an npm range, then the running
//! version must satisfy it.

use crate::domain::{NodeRange, TargetConstraint};
use crate::error::CheckError;
use semver::Version;

/// A passed version check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// The running Node.js version
    pub current: Version,
    /// The target the version was checked against
    pub target: TargetConstraint,
    /// Desugared form of the target range
    pub normalized: String,
}

/// Resolve the effective target range
///
/// Empty or whitespace-only values count as absent.
pub fn resolve_target(
    manifest: Option<&str>,
    argument: Option<&str>,
) -> Result<TargetConstraint, CheckError> {
    let mut target = present(manifest).map(TargetConstraint::from_manifest);
    if let Some(argument) = present(argument) {
        target = Some(TargetConstraint::from_argument(argument));
    }

    target.ok_or(CheckError::MissingTarget)
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parse the target into a range, failing with `InvalidRangeSyntax`
pub fn validate_range(target: &TargetConstraint) -> Result<NodeRange, CheckError> {
    NodeRange::parse(&target.raw).map_err(|e| CheckError::invalid_range(&target.raw, &e))
}

/// Check `current` against an already validated range
pub fn compare(
    target: &TargetConstraint,
    range: &NodeRange,
    current: &Version,
) -> Result<CheckReport, CheckError> {
    let normalized = range.to_string();

    if !range.satisfies(current) {
        return Err(CheckError::VersionMismatch {
            current: current.to_string(),
            range: target.raw.clone(),
            normalized,
        });
    }

    Ok(CheckReport {
        current: current.clone(),
        target: target.clone(),
        normalized,
    })
}
