//! CLI argument parsing module for nover
//!
//! The argument list is kept raw: position 1 is the target range override
//! and `enable-pm-verify` may appear anywhere, followed by its value.
//!
//! ```text
//! nover -t ^18
//! nover -t ">=16 <19" --enable-pm-verify false
//! ```

use clap::Parser;

/// Flag controlling package manager verification
pub const PM_VERIFY_FLAG: &str = "enable-pm-verify";

/// Index of the target range override in the argument list
const TARGET_INDEX: usize = 1;

/// Values that switch a flag off; anything else leaves it on
const DISABLING_VALUES: [&str; 4] = ["false", "0", "no", "off"];

/// Check that the running Node.js version matches the project's target range
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "nover",
    version,
    about = "Check that the running Node.js version matches the project's target range"
)]
pub struct CliArgs {
    /// Raw arguments: [command-name] [target-version] [--enable-pm-verify [value]]
    #[arg(
        value_name = "ARGS",
        num_args = 0..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub args: Vec<String>,
}

impl CliArgs {
    /// Build from an already split argument list (without the program name)
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// The target range override, read unconditionally from position 1
    pub fn target_override(&self) -> Option<&str> {
        self.args
            .get(TARGET_INDEX)
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// The token following the flag (`name` or `--name`), if present and given
    pub fn flag_value(&self, name: &str) -> Option<&str> {
        let position = self.flag_position(name)?;
        self.args.get(position + 1).map(String::as_str)
    }

    /// Whether package manager verification should run
    ///
    /// On by default; only an explicit disabling value turns it off.
    pub fn pm_verify_enabled(&self) -> bool {
        match self.flag_value(PM_VERIFY_FLAG) {
            Some(value) => !is_disabling(value),
            None => true,
        }
    }

    fn flag_position(&self, name: &str) -> Option<usize> {
        self.args
            .iter()
            .position(|arg| arg.strip_prefix("--").unwrap_or(arg.as_str()) == name)
    }
}

fn is_disabling(value: &str) -> bool {
    let value = value.trim();
    DISABLING_VALUES
        .iter()
        .any(|disabling| value.eq_ignore_ascii_case(disabling))
}
