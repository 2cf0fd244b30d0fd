//! Domain types for version checking
//!
//! This module provides:
//! - npm range expressions and satisfaction checks
//! - The resolved target constraint and where it came from

mod node_range;
mod target;

pub use node_range::NodeRange;
pub use target::{TargetConstraint, TargetSource};
