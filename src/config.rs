//! Runtime configuration collected from the process environment
//!
//! Environment variables:
//! - `NOVER_NODE_VERSION`: use this version instead of asking the node binary
//! - `npm_node_execpath`: node binary the package manager runs scripts with
//! - `npm_config_user_agent`: identifies the package manager running the script
//! - `NOVER_LOG`: tracing filter directive (read by `main`)

use std::path::PathBuf;

/// Overrides the probed Node.js version
pub const NODE_VERSION_ENV: &str = "NOVER_NODE_VERSION";

/// Exported by npm, yarn, pnpm and bun for lifecycle scripts
pub const NODE_EXECPATH_ENV: &str = "npm_node_execpath";

/// Exported by npm, yarn, pnpm and bun for lifecycle scripts
pub const USER_AGENT_ENV: &str = "npm_config_user_agent";

/// Tracing filter for diagnostics on stderr
pub const LOG_ENV: &str = "NOVER_LOG";

/// Node binary used when no package manager tells us which one runs scripts
const DEFAULT_NODE_BINARY: &str = "node";

/// Configuration for a single check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding package.json (the working directory)
    pub project_dir: PathBuf,
    /// Fixed runtime version, bypassing the node probe
    pub node_version: Option<String>,
    /// Node binary to probe
    pub node_binary: PathBuf,
    /// Package manager user agent string
    pub user_agent: Option<String>,
}

impl Config {
    /// Read configuration from the current process
    pub fn from_env() -> std::io::Result<Self> {
        let cwd = std::env::current_dir()?;
        Ok(Self::from_lookup(cwd, |key| std::env::var(key).ok()))
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(project_dir: PathBuf, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            project_dir,
            node_version: get(NODE_VERSION_ENV),
            node_binary: get(NODE_EXECPATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_NODE_BINARY)),
            user_agent: get(USER_AGENT_ENV),
        }
    }
}
