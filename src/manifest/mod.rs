//! Manifest file reading
//!
//! This module provides functionality to:
//! - Locate package.json in the project directory
//! - Extract the declared Node.js engine range
//! - Extract the declared package manager (corepack `packageManager`)

mod package_json;

pub use package_json::{PackageJson, MANIFEST_FILENAME};
