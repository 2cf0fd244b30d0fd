//! Package manager verification
//!
//! This module provides:
//! - Detection of the package manager the project expects
//!   (`packageManager` field, then lockfiles)
//! - Detection of the package manager running the current script
//!   (`npm_config_user_agent`)
//! - A verdict comparing the two

use std::fmt;
use std::path::{Path, PathBuf};

/// Node.js package managers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
    Bun,
}

impl PackageManager {
    /// All package managers, in lockfile preference order
    pub fn all() -> &'static [PackageManager] {
        &[
            PackageManager::Pnpm,
            PackageManager::Yarn,
            PackageManager::Bun,
            PackageManager::Npm,
        ]
    }

    /// Returns the command name for this package manager
    pub fn name(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Bun => "bun",
        }
    }

    /// Returns the lock filenames written by this package manager
    pub fn lock_filenames(&self) -> &'static [&'static str] {
        match self {
            PackageManager::Npm => &["package-lock.json", "npm-shrinkwrap.json"],
            PackageManager::Yarn => &["yarn.lock"],
            PackageManager::Pnpm => &["pnpm-lock.yaml"],
            PackageManager::Bun => &["bun.lockb", "bun.lock"],
        }
    }

    /// Look up a package manager by command name
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::all()
            .iter()
            .copied()
            .find(|pm| pm.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Parse the running package manager from a user agent
///
/// e.g. `pnpm/8.6.0 npm/? node/v18.0.0 linux x64`
pub fn parse_user_agent(user_agent: &str) -> Option<PackageManager> {
    let first = user_agent.split_whitespace().next()?;
    let name = first.split_once('/').map_or(first, |(name, _)| name);
    PackageManager::from_name(name)
}

/// Parse a corepack `packageManager` field
///
/// e.g. `pnpm@8.6.0+sha256.abc`
pub fn parse_package_manager_field(field: &str) -> Option<PackageManager> {
    let name = field.split_once('@').map_or(field, |(name, _)| name);
    PackageManager::from_name(name)
}

/// Detect the package manager from lockfiles in a directory
pub fn detect_lockfile(dir: &Path) -> Option<PackageManager> {
    PackageManager::all().iter().copied().find(|pm| {
        pm.lock_filenames()
            .iter()
            .any(|lock| dir.join(lock).exists())
    })
}

/// Outcome of package manager verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The running package manager is the expected one
    Match(PackageManager),
    /// The running package manager differs from the expected one
    Mismatch {
        expected: PackageManager,
        running: PackageManager,
    },
    /// The project does not declare or imply a package manager
    NoExpectation,
    /// The check was not started from a package manager script
    NotLaunchedByPackageManager,
}

/// Trait for the package manager verification step
pub trait PackageManagerDetector {
    /// Compare the expected and the running package manager
    fn verify(&self) -> Verdict;
}

/// Default detector reading the project directory and the user agent
#[derive(Debug, Clone, Default)]
pub struct SystemDetector {
    project_dir: PathBuf,
    declared: Option<String>,
    user_agent: Option<String>,
}

impl SystemDetector {
    /// Create a new system detector
    ///
    /// `declared` is the package.json `packageManager` field.
    pub fn new(
        project_dir: impl Into<PathBuf>,
        declared: Option<String>,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            project_dir: project_dir.into(),
            declared,
            user_agent,
        }
    }

    /// The package manager the project expects
    fn expected(&self) -> Option<PackageManager> {
        if let Some(declared) = &self.declared {
            match parse_package_manager_field(declared) {
                Some(pm) => return Some(pm),
                None => tracing::warn!("unknown packageManager '{}', using lockfiles", declared),
            }
        }
        detect_lockfile(&self.project_dir)
    }

    /// The package manager running this process
    fn running(&self) -> Option<PackageManager> {
        self.user_agent.as_deref().and_then(parse_user_agent)
    }
}

impl PackageManagerDetector for SystemDetector {
    fn verify(&self) -> Verdict {
        let Some(expected) = self.expected() else {
            return Verdict::NoExpectation;
        };
        let Some(running) = self.running() else {
            return Verdict::NotLaunchedByPackageManager;
        };

        if expected == running {
            Verdict::Match(running)
        } else {
            Verdict::Mismatch { expected, running }
        }
    }
}
