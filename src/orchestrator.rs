//! Check orchestrator coordinating the pre-flight workflow
//!
//! This module provides:
//! - Workflow coordination: load manifest → resolve target → validate range
//!   → probe runtime → compare → verify package manager
//! - Failures returned as `AppError` so that `main` performs the only exit

use crate::check::{compare, resolve_target, validate_range, CheckReport};
use crate::cli::CliArgs;
use crate::config::Config;
use crate::error::{PackageManagerError, Result};
use crate::manifest::PackageJson;
use crate::output::Reporter;
use crate::package_manager::{PackageManagerDetector, SystemDetector, Verdict};
use crate::runtime::RuntimeProbe;
use std::io::Write;

/// Orchestrator for a single pre-flight check
pub struct Orchestrator {
    /// CLI arguments
    args: CliArgs,
    /// Environment derived configuration
    config: Config,
    /// Source of the running Node.js version
    probe: Box<dyn RuntimeProbe>,
    /// Package manager detector; built from the manifest when not set
    detector: Option<Box<dyn PackageManagerDetector>>,
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// The passed version check
    pub report: CheckReport,
    /// Package manager verdict, `None` when verification was disabled
    pub verdict: Option<Verdict>,
}

impl Orchestrator {
    /// Create a new orchestrator
    pub fn new(args: CliArgs, config: Config, probe: Box<dyn RuntimeProbe>) -> Self {
        Self {
            args,
            config,
            probe,
            detector: None,
        }
    }

    /// Use a specific package manager detector
    pub fn with_detector(mut self, detector: Box<dyn PackageManagerDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Run the check, writing progress messages through `reporter`
    ///
    /// Every failure is returned, never reported here.
    pub fn run(&self, reporter: &dyn Reporter, writer: &mut dyn Write) -> Result<CheckOutcome> {
        let manifest = PackageJson::load(&self.config.project_dir)?;

        let report = self.check_version(manifest.as_ref())?;
        reporter.report_success(writer)?;

        if !self.args.pm_verify_enabled() {
            tracing::debug!("package manager verification disabled");
            return Ok(CheckOutcome {
                report,
                verdict: None,
            });
        }

        let verdict = self.verify_package_manager(manifest.as_ref());
        tracing::debug!("package manager verdict: {:?}", verdict);
        if let Verdict::Mismatch { expected, running } = verdict {
            return Err(PackageManagerError::Mismatch { expected, running }.into());
        }
        reporter.report_package_manager(&verdict, writer)?;

        Ok(CheckOutcome {
            report,
            verdict: Some(verdict),
        })
    }

    /// Resolve the target, validate it and compare the running version
    pub fn check_version(&self, manifest: Option<&PackageJson>) -> Result<CheckReport> {
        let declared = manifest.and_then(PackageJson::engine_constraint);
        let target = resolve_target(declared, self.args.target_override())?;
        tracing::debug!("target node version '{}' from {}", target.raw, target.source);

        let range = validate_range(&target)?;
        let current = self.probe.current_version()?;
        tracing::debug!("current node version {}", current);

        Ok(compare(&target, &range, &current)?)
    }

    fn verify_package_manager(&self, manifest: Option<&PackageJson>) -> Verdict {
        match &self.detector {
            Some(detector) => detector.verify(),
            None => SystemDetector::new(
                self.config.project_dir.clone(),
                manifest
                    .and_then(PackageJson::package_manager)
                    .map(str::to_string),
                self.config.user_agent.clone(),
            )
            .verify(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, CheckError, RuntimeError};
    use crate::output::TextReporter;
    use crate::package_manager::PackageManager;
    use crate::runtime::FixedRuntime;
    use semver::Version;
    use std::cell::Cell;
    use std::fs;
    use std::path::Path;
    use std::rc::Rc;

    struct MockDetector {
        verdict: Verdict,
        calls: Rc<Cell<usize>>,
    }

    impl PackageManagerDetector for MockDetector {
        fn verify(&self) -> Verdict {
            self.calls.set(self.calls.get() + 1);
            self.verdict.clone()
        }
    }

    struct FailingProbe;

    impl RuntimeProbe for FailingProbe {
        fn current_version(&self) -> std::result::Result<Version, RuntimeError> {
            Err(RuntimeError::InvalidVersion {
                value: "?".to_string(),
                message: "probe should not run".to_string(),
            })
        }
    }

    fn config(dir: &Path) -> Config {
        Config::from_lookup(dir.to_path_buf(), |_| None)
    }

    fn orchestrator(dir: &Path, args: &[&str], current: &str) -> Orchestrator {
        Orchestrator::new(
            CliArgs::from_args(args.iter().copied()),
            config(dir),
            Box::new(FixedRuntime::new(current)),
        )
    }

    fn write_manifest(dir: &Path, content: &str) {
        fs::write(dir.join("package.json"), content).unwrap();
    }

    fn run(orchestrator: &Orchestrator) -> (Result<CheckOutcome>, String) {
        let reporter = TextReporter::with_color(false);
        let mut buf = Vec::new();
        let result = orchestrator.run(&reporter, &mut buf);
        (result, String::from_utf8(buf).unwrap())
    }

    #[test]
    fn test_manifest_target_mismatch() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_manifest(temp_dir.path(), r#"{ "engines": { "node": "^16" } }"#);

        let (result, output) = run(&orchestrator(temp_dir.path(), &[], "18.0.0"));
        match result {
            Err(AppError::Check(CheckError::VersionMismatch { current, range, .. })) => {
                assert_eq!(current, "18.0.0");
                assert_eq!(range, "^16");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(output.is_empty());
    }

    #[test]
    fn test_argument_overrides_manifest() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_manifest(temp_dir.path(), r#"{ "engines": { "node": "^16" } }"#);

        let (result, output) = run(&orchestrator(
            temp_dir.path(),
            &["-t", "^18", "--enable-pm-verify", "false"],
            "18.0.0",
        ));
        let outcome = result.unwrap();
        assert_eq!(outcome.report.target.raw, "^18");
        assert_eq!(outcome.verdict, None);
        assert!(output.contains("一致"));
    }

    #[test]
    fn test_missing_target_skips_probe() {
        let temp_dir = tempfile::tempdir().unwrap();
        let orchestrator = Orchestrator::new(
            CliArgs::from_args(["-t"]),
            config(temp_dir.path()),
            Box::new(FailingProbe),
        );

        let (result, _) = run(&orchestrator);
        assert!(matches!(
            result,
            Err(AppError::Check(CheckError::MissingTarget))
        ));
    }

    #[test]
    fn test_invalid_range_skips_probe() {
        let temp_dir = tempfile::tempdir().unwrap();
        let orchestrator = Orchestrator::new(
            CliArgs::from_args(["-t", "notaversion"]),
            config(temp_dir.path()),
            Box::new(FailingProbe),
        );

        let (result, _) = run(&orchestrator);
        assert!(matches!(
            result,
            Err(AppError::Check(CheckError::InvalidRangeSyntax { .. }))
        ));
    }

    #[test]
    fn test_probe_failure_propagates() {
        let temp_dir = tempfile::tempdir().unwrap();
        let orchestrator = Orchestrator::new(
            CliArgs::from_args(["-t", "^18"]),
            config(temp_dir.path()),
            Box::new(FailingProbe),
        );

        let (result, _) = run(&orchestrator);
        assert!(matches!(result, Err(AppError::Runtime(_))));
    }

    #[test]
    fn test_malformed_manifest() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_manifest(temp_dir.path(), "{ \"engines\": ");

        let (result, _) = run(&orchestrator(temp_dir.path(), &["-t", "^18"], "18.0.0"));
        assert!(matches!(result, Err(AppError::Manifest(_))));
    }

    #[test]
    fn test_detector_not_called_when_disabled() {
        let temp_dir = tempfile::tempdir().unwrap();
        let calls = Rc::new(Cell::new(0));
        let orchestrator = orchestrator(
            temp_dir.path(),
            &["-t", "^18", "enable-pm-verify", "false"],
            "18.0.0",
        )
        .with_detector(Box::new(MockDetector {
            verdict: Verdict::Match(PackageManager::Npm),
            calls: Rc::clone(&calls),
        }));

        let (result, _) = run(&orchestrator);
        assert!(result.is_ok());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_detector_called_by_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let calls = Rc::new(Cell::new(0));
        let orchestrator = orchestrator(temp_dir.path(), &["-t", "^18"], "18.0.0").with_detector(
            Box::new(MockDetector {
                verdict: Verdict::Match(PackageManager::Pnpm),
                calls: Rc::clone(&calls),
            }),
        );

        let (result, output) = run(&orchestrator);
        assert_eq!(
            result.unwrap().verdict,
            Some(Verdict::Match(PackageManager::Pnpm))
        );
        assert_eq!(calls.get(), 1);
        assert_eq!(output.lines().count(), 2);
    }

    #[test]
    fn test_detector_not_called_after_failed_check() {
        let temp_dir = tempfile::tempdir().unwrap();
        let calls = Rc::new(Cell::new(0));
        let orchestrator = orchestrator(temp_dir.path(), &["-t", "^16"], "18.0.0").with_detector(
            Box::new(MockDetector {
                verdict: Verdict::Match(PackageManager::Npm),
                calls: Rc::clone(&calls),
            }),
        );

        let (result, _) = run(&orchestrator);
        assert!(result.is_err());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_package_manager_mismatch() {
        let temp_dir = tempfile::tempdir().unwrap();
        let orchestrator = orchestrator(temp_dir.path(), &["-t", "^18"], "18.0.0").with_detector(
            Box::new(MockDetector {
                verdict: Verdict::Mismatch {
                    expected: PackageManager::Pnpm,
                    running: PackageManager::Npm,
                },
                calls: Rc::new(Cell::new(0)),
            }),
        );

        let (result, output) = run(&orchestrator);
        assert!(matches!(
            result,
            Err(AppError::PackageManager(PackageManagerError::Mismatch {
                expected: PackageManager::Pnpm,
                running: PackageManager::Npm,
            }))
        ));
        // The version check already passed and was reported
        assert!(output.contains("一致"));
    }

    #[test]
    fn test_system_detector_uses_manifest_field() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_manifest(
            temp_dir.path(),
            r#"{ "engines": { "node": ">=18" }, "packageManager": "pnpm@8.6.0" }"#,
        );
        let config = Config::from_lookup(temp_dir.path().to_path_buf(), |key| {
            (key == "npm_config_user_agent")
                .then(|| "npm/9.5.1 node/v18.15.0 linux x64".to_string())
        });
        let orchestrator = Orchestrator::new(
            CliArgs::default(),
            config,
            Box::new(FixedRuntime::new("18.15.0")),
        );

        let (result, _) = run(&orchestrator);
        assert!(matches!(
            result,
            Err(AppError::PackageManager(PackageManagerError::Mismatch {
                expected: PackageManager::Pnpm,
                running: PackageManager::Npm,
            }))
        ));
    }
}
