//! Text reporter for human-readable, localized display

use crate::error::{AppError, CheckError, PackageManagerError};
use crate::output::Reporter;
use crate::package_manager::Verdict;
use colored::Colorize;
use std::io::Write;

const MSG_MISSING_TARGET: &str = "未获取目标版本信息，请参考 README.md 设置";
const MSG_INVALID_RANGE: &str = "目标版本信息设置错误，请参考 README.md 设置";
const MSG_VERSION_MISMATCH: &str = "当前 node 版本与目标 node 版本不一致，请切换当前 node 版本";
const MSG_VERSION_MATCH: &str = "当前 node 版本与目标 node 版本一致";
const MSG_MANIFEST_FAILED: &str = "读取 package.json 失败";
const MSG_RUNTIME_FAILED: &str = "获取当前 node 版本失败";
const MSG_PM_MATCH: &str = "当前包管理器与项目要求一致";
const MSG_PM_MISMATCH: &str = "当前包管理器与项目要求不一致，请使用以下包管理器";

const LABEL_CURRENT_NODE: &str = "当前 node 版本: ";
const LABEL_TARGET_NODE: &str = "目标 node 版本: ";
const LABEL_CURRENT_PM: &str = "当前包管理器: ";
const LABEL_TARGET_PM: &str = "目标包管理器: ";

/// Text reporter for terminal output
pub struct TextReporter {
    /// Whether to use colors
    color: bool,
}

impl TextReporter {
    /// Create a new text reporter with color option
    pub fn with_color(color: bool) -> Self {
        Self { color }
    }

    fn error_line(&self, writer: &mut dyn Write, message: &str) -> std::io::Result<()> {
        if self.color {
            writeln!(writer, "{}", message.red())
        } else {
            writeln!(writer, "{}", message)
        }
    }

    fn success_line(&self, writer: &mut dyn Write, message: &str) -> std::io::Result<()> {
        if self.color {
            writeln!(writer, "{}", message.green())
        } else {
            writeln!(writer, "{}", message)
        }
    }

    fn value_line(&self, writer: &mut dyn Write, label: &str, value: &str) -> std::io::Result<()> {
        if self.color {
            writeln!(writer, "{}{}", label, value.yellow())
        } else {
            writeln!(writer, "{}{}", label, value)
        }
    }

    /// The raw range, followed by its desugared form when that differs
    fn format_range(raw: &str, normalized: &str) -> String {
        if raw == normalized {
            raw.to_string()
        } else {
            format!("{} ({})", raw, normalized)
        }
    }

    fn report_check_error(&self, error: &CheckError, writer: &mut dyn Write) -> std::io::Result<()> {
        match error {
            CheckError::MissingTarget => self.error_line(writer, MSG_MISSING_TARGET),
            CheckError::InvalidRangeSyntax { range, message } => {
                self.error_line(writer, MSG_INVALID_RANGE)?;
                self.value_line(writer, LABEL_TARGET_NODE, &format!("{} ({})", range, message))
            }
            CheckError::VersionMismatch {
                current,
                range,
                normalized,
            } => {
                self.error_line(writer, MSG_VERSION_MISMATCH)?;
                self.value_line(writer, LABEL_CURRENT_NODE, current)?;
                self.value_line(writer, LABEL_TARGET_NODE, &Self::format_range(range, normalized))
            }
        }
    }
}

impl Reporter for TextReporter {
    fn report_success(&self, writer: &mut dyn Write) -> std::io::Result<()> {
        self.success_line(writer, MSG_VERSION_MATCH)
    }

    fn report_package_manager(
        &self,
        verdict: &Verdict,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        match verdict {
            Verdict::Match(_) => self.success_line(writer, MSG_PM_MATCH),
            Verdict::Mismatch { expected, running } => {
                self.error_line(writer, MSG_PM_MISMATCH)?;
                self.value_line(writer, LABEL_CURRENT_PM, running.name())?;
                self.value_line(writer, LABEL_TARGET_PM, expected.name())
            }
            // Nothing to compare against: stay silent
            Verdict::NoExpectation | Verdict::NotLaunchedByPackageManager => Ok(()),
        }
    }

    fn report_error(&self, error: &AppError, writer: &mut dyn Write) -> std::io::Result<()> {
        match error {
            AppError::Check(e) => self.report_check_error(e, writer),
            AppError::Manifest(e) => {
                self.error_line(writer, &format!("{}: {}", MSG_MANIFEST_FAILED, e))
            }
            AppError::Runtime(e) => {
                self.error_line(writer, &format!("{}: {}", MSG_RUNTIME_FAILED, e))
            }
            AppError::PackageManager(PackageManagerError::Mismatch { expected, running }) => self
                .report_package_manager(
                    &Verdict::Mismatch {
                        expected: *expected,
                        running: *running,
                    },
                    writer,
                ),
            AppError::Output(e) => self.error_line(writer, &e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ManifestError, RuntimeError};
    use crate::package_manager::PackageManager;

    fn render_error(error: AppError) -> String {
        let reporter = TextReporter::with_color(false);
        let mut buf = Vec::new();
        reporter.report_error(&error, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn render_verdict(verdict: Verdict) -> String {
        let reporter = TextReporter::with_color(false);
        let mut buf = Vec::new();
        reporter.report_package_manager(&verdict, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_format_range() {
        assert_eq!(TextReporter::format_range("16.0.0", "16.0.0"), "16.0.0");
        assert_eq!(
            TextReporter::format_range("^16", ">=16.0.0 <17.0.0-0"),
            "^16 (>=16.0.0 <17.0.0-0)"
        );
    }

    #[test]
    fn test_report_success() {
        let reporter = TextReporter::with_color(false);
        let mut buf = Vec::new();
        reporter.report_success(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), format!("{}\n", MSG_VERSION_MATCH));
    }

    #[test]
    fn test_report_missing_target() {
        let output = render_error(CheckError::MissingTarget.into());
        assert_eq!(output, format!("{}\n", MSG_MISSING_TARGET));
        assert!(output.contains("README.md"));
    }

    #[test]
    fn test_report_invalid_range() {
        let output = render_error(
            CheckError::InvalidRangeSyntax {
                range: "notaversion".to_string(),
                message: "invalid version 'notaversion'".to_string(),
            }
            .into(),
        );
        assert!(output.starts_with(MSG_INVALID_RANGE));
        assert!(output.contains("notaversion"));
    }

    #[test]
    fn test_report_version_mismatch() {
        let output = render_error(
            CheckError::VersionMismatch {
                current: "18.0.0".to_string(),
                range: "^16".to_string(),
                normalized: ">=16.0.0 <17.0.0-0".to_string(),
            }
            .into(),
        );
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], MSG_VERSION_MISMATCH);
        assert_eq!(lines[1], "当前 node 版本: 18.0.0");
        assert_eq!(lines[2], "目标 node 版本: ^16 (>=16.0.0 <17.0.0-0)");
    }

    #[test]
    fn test_report_manifest_error() {
        let output = render_error(
            ManifestError::json_parse_error("package.json", "EOF while parsing").into(),
        );
        assert!(output.starts_with(MSG_MANIFEST_FAILED));
        assert!(output.contains("EOF while parsing"));
    }

    #[test]
    fn test_report_runtime_error() {
        let output = render_error(
            RuntimeError::InvalidVersion {
                value: "latest".to_string(),
                message: "unexpected character".to_string(),
            }
            .into(),
        );
        assert!(output.starts_with(MSG_RUNTIME_FAILED));
        assert!(output.contains("latest"));
    }

    #[test]
    fn test_report_package_manager_mismatch() {
        let output = render_error(
            PackageManagerError::Mismatch {
                expected: PackageManager::Pnpm,
                running: PackageManager::Npm,
            }
            .into(),
        );
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], MSG_PM_MISMATCH);
        assert_eq!(lines[1], "当前包管理器: npm");
        assert_eq!(lines[2], "目标包管理器: pnpm");
    }

    #[test]
    fn test_report_package_manager_match() {
        let output = render_verdict(Verdict::Match(PackageManager::Yarn));
        assert_eq!(output, format!("{}\n", MSG_PM_MATCH));
    }

    #[test]
    fn test_report_package_manager_skipped() {
        assert!(render_verdict(Verdict::NoExpectation).is_empty());
        assert!(render_verdict(Verdict::NotLaunchedByPackageManager).is_empty());
    }

    #[test]
    fn test_colored_output_keeps_values() {
        colored::control::set_override(true);
        let reporter = TextReporter::with_color(true);
        let mut buf = Vec::new();
        reporter
            .report_error(
                &CheckError::VersionMismatch {
                    current: "18.0.0".to_string(),
                    range: "^16".to_string(),
                    normalized: ">=16.0.0 <17.0.0-0".to_string(),
                }
                .into(),
                &mut buf,
            )
            .unwrap();
        colored::control::unset_override();
        let output = String::from_utf8(buf).unwrap();
        assert!(output.contains("18.0.0"));
        assert!(output.contains("^16"));
    }
}
