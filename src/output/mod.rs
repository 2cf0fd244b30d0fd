//! Console output for check results
//!
//! This module provides:
//! - Localized text messages for every outcome
//! - Semantic colors (red = error, yellow = value, green = success)

mod text;

pub use text::TextReporter;

use crate::error::AppError;
use crate::package_manager::Verdict;
use std::io::Write;

/// Configuration for output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether to use colors
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

impl OutputConfig {
    /// Follow `colored`'s own detection (NO_COLOR, CLICOLOR, CLICOLOR_FORCE)
    pub fn from_env() -> Self {
        Self {
            color: colored::control::SHOULD_COLORIZE.should_colorize(),
        }
    }
}

/// Trait for reporting check outcomes
pub trait Reporter {
    /// Report a passed version check
    fn report_success(&self, writer: &mut dyn Write) -> std::io::Result<()>;

    /// Report the package manager verdict
    fn report_package_manager(
        &self,
        verdict: &Verdict,
        writer: &mut dyn Write,
    ) -> std::io::Result<()>;

    /// Report a failure
    fn report_error(&self, error: &AppError, writer: &mut dyn Write) -> std::io::Result<()>;
}

/// Create a reporter based on configuration
pub fn create_reporter(config: OutputConfig) -> Box<dyn Reporter> {
    Box::new(TextReporter::with_color(config.color))
}
