//! package.json reader for the fields the pre-flight check needs
//!
//! Handles:
//! - engines.node
//! - packageManager

use crate::error::ManifestError;
use serde::Deserialize;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::Path;

/// Well-known manifest filename, relative to the project directory
pub const MANIFEST_FILENAME: &str = "package.json";

/// The subset of package.json read by nover
///
/// Fields are kept as raw JSON values so that an unexpected type in one of
/// them is treated as absence rather than failing the whole manifest.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageJson {
    #[serde(default)]
    engines: Option<Value>,
    #[serde(default)]
    package_manager: Option<Value>,
}

impl PackageJson {
    /// Parse package.json content read from `path`
    fn parse(path: &Path, content: &str) -> Result<Self, ManifestError> {
        serde_json::from_str(content)
            .map_err(|e| ManifestError::json_parse_error(path, e.to_string()))
    }

    /// Load package.json from a directory
    ///
    /// A missing file is not an error: it yields `Ok(None)`.
    pub fn load(dir: &Path) -> Result<Option<Self>, ManifestError> {
        let path = dir.join(MANIFEST_FILENAME);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("no {} in {}", MANIFEST_FILENAME, dir.display());
                return Ok(None);
            }
            Err(e) => return Err(ManifestError::read_error(path, e)),
        };

        Self::parse(&path, &content).map(Some)
    }

    /// The `engines.node` range, if declared as a string
    pub fn engine_constraint(&self) -> Option<&str> {
        let node = self.engines.as_ref()?.get("node")?;
        match node.as_str() {
            Some(s) => Some(s),
            None => {
                tracing::warn!("ignoring non-string engines.node: {}", node);
                None
            }
        }
    }

    /// The `packageManager` field, e.g. `pnpm@8.6.0`
    pub fn package_manager(&self) -> Option<&str> {
        let value = self.package_manager.as_ref()?;
        match value.as_str() {
            Some(s) => Some(s),
            None => {
                tracing::warn!("ignoring non-string packageManager: {}", value);
                None
            }
        }
    }
}
