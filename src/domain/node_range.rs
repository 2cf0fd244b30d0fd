//! npm-style version range expressions
//!
//! Handles range formats:
//! - Primitive comparators: `>=16.0.0`, `<18`, `=16.3.1`, `>= 16`
//! - Caret: `^16`, `^0.2.3`
//! - Tilde: `~16.14`, `~>16.14.0`
//! - Wildcard: `*`, `16.x`, `16.14.*`, `16`
//! - Hyphen: `14.17.0 - 18`
//! - Alternatives: `^14.17 || ^16 || >=18`
//!
//! Every expression is desugared into primitive comparators the way npm's
//! semver package does, so `^16` becomes `>=16.0.0 <17.0.0-0`.

use crate::error::RangeError;
use semver::{BuildMetadata, Prerelease, Version};
use std::cmp::Ordering;
use std::fmt;

/// Primitive comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// `=` (printed without an operator)
    Exact,
    /// `>`
    Greater,
    /// `>=`
    GreaterEq,
    /// `<`
    Less,
    /// `<=`
    LessEq,
}

impl Op {
    fn symbol(&self) -> &'static str {
        match self {
            Op::Exact => "",
            Op::Greater => ">",
            Op::GreaterEq => ">=",
            Op::Less => "<",
            Op::LessEq => "<=",
        }
    }
}

/// A single primitive comparator such as `>=16.0.0`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparator {
    pub op: Op,
    pub version: Version,
}

impl Comparator {
    fn new(op: Op, version: Version) -> Self {
        Self { op, version }
    }

    /// Returns true if `version` passes this comparator
    pub fn matches(&self, version: &Version) -> bool {
        let ord = precedence(version, &self.version);
        match self.op {
            Op::Exact => ord == Ordering::Equal,
            Op::Greater => ord == Ordering::Greater,
            Op::GreaterEq => ord != Ordering::Less,
            Op::Less => ord == Ordering::Less,
            Op::LessEq => ord != Ordering::Greater,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op.symbol(), self.version)
    }
}

/// A parsed range: alternatives of comparator sets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRange {
    sets: Vec<Vec<Comparator>>,
}

impl NodeRange {
    /// Parse a range expression
    pub fn parse(input: &str) -> Result<Self, RangeError> {
        let sets = input
            .split("||")
            .map(parse_set)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { sets })
    }

    /// Returns true if `version` satisfies any alternative
    pub fn satisfies(&self, version: &Version) -> bool {
        self.sets.iter().any(|set| set_matches(set, version))
    }
}

impl fmt::Display for NodeRange {
    /// Writes the desugared form, e.g. `>=16.0.0 <17.0.0-0`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, set) in self.sets.iter().enumerate() {
            if i > 0 {
                f.write_str("||")?;
            }
            if set.is_empty() {
                f.write_str("*")?;
                continue;
            }
            for (j, comparator) in set.iter().enumerate() {
                if j > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}", comparator)?;
            }
        }
        Ok(())
    }
}

/// SemVer precedence: build metadata does not participate
fn precedence(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch)
        .cmp(&(b.major, b.minor, b.patch))
        .then_with(|| a.pre.cmp(&b.pre))
}

fn set_matches(set: &[Comparator], version: &Version) -> bool {
    if !set.iter().all(|c| c.matches(version)) {
        return false;
    }
    if version.pre.is_empty() {
        return true;
    }

    // A prerelease only matches when a comparator opts into prereleases
    // of the same major.minor.patch tuple.
    set.iter().any(|c| {
        !c.version.pre.is_empty()
            && c.version.major == version.major
            && c.version.minor == version.minor
            && c.version.patch == version.patch
    })
}

/// Largest accepted version component (2^53 - 1), so bounds can always be bumped
const MAX_COMPONENT: u64 = 9_007_199_254_740_991;

/// A version with optional (wildcard) components
#[derive(Debug, Clone, PartialEq, Eq)]
struct Partial {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    pre: Prerelease,
}

impl Partial {
    fn parse(token: &str) -> Result<Self, RangeError> {
        let invalid = || RangeError::InvalidVersion {
            token: token.to_string(),
        };

        let s = token.strip_prefix('=').unwrap_or(token);
        let s = s.strip_prefix(['v', 'V']).unwrap_or(s);
        if s.is_empty() {
            return Err(invalid());
        }

        // Build metadata never affects matching
        let s = s.split_once('+').map_or(s, |(core, _)| core);
        let (core, pre) = match s.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => (s, None),
        };

        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() > 3 {
            return Err(invalid());
        }

        let mut numbers = [None; 3];
        let mut wildcard = false;
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            if matches!(*part, "x" | "X" | "*") {
                wildcard = true;
                continue;
            }
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            if part.len() > 1 && part.starts_with('0') {
                return Err(invalid());
            }
            let value: u64 = part.parse().map_err(|_| invalid())?;
            if value > MAX_COMPONENT {
                return Err(invalid());
            }
            // Components after a wildcard are ignored (`1.x.3` is `1.x`)
            if !wildcard {
                *slot = Some(value);
            }
        }

        let pre = match pre {
            Some("") => {
                return Err(RangeError::InvalidPrerelease {
                    value: String::new(),
                })
            }
            Some(p) => Prerelease::new(p).map_err(|_| RangeError::InvalidPrerelease {
                value: p.to_string(),
            })?,
            None => Prerelease::EMPTY,
        };

        let [major, minor, patch] = numbers;
        Ok(Self {
            major,
            minor,
            patch,
            pre,
        })
    }

    fn is_full(&self) -> bool {
        self.patch.is_some()
    }

    /// Lowest version covered by this partial
    fn floor(&self) -> Version {
        let mut v = version(
            self.major.unwrap_or(0),
            self.minor.unwrap_or(0),
            self.patch.unwrap_or(0),
        );
        if self.is_full() {
            v.pre = self.pre.clone();
        }
        v
    }
}

fn version(major: u64, minor: u64, patch: u64) -> Version {
    Version {
        major,
        minor,
        patch,
        pre: Prerelease::EMPTY,
        build: BuildMetadata::EMPTY,
    }
}

/// `M.m.p-0`, the lowest possible version of that tuple
fn version_floor(major: u64, minor: u64, patch: u64) -> Version {
    let mut v = version(major, minor, patch);
    v.pre = Prerelease::new("0").unwrap_or(Prerelease::EMPTY);
    v
}

fn nothing() -> Vec<Comparator> {
    vec![Comparator::new(Op::Less, version_floor(0, 0, 0))]
}

const OPERATORS: [&str; 8] = ["~>", "~", "^", ">=", "<=", ">", "<", "="];

fn is_operator(token: &str) -> bool {
    OPERATORS.contains(&token)
}

fn parse_set(input: &str) -> Result<Vec<Comparator>, RangeError> {
    let mut tokens: Vec<String> = Vec::new();
    let mut pending_operator: Option<&str> = None;

    // Glue detached operators onto their versions (`>= 16` is `>=16`)
    for token in input.split_whitespace() {
        match pending_operator.take() {
            Some(op) => tokens.push(format!("{}{}", op, token)),
            None if is_operator(token) => pending_operator = Some(token),
            None => tokens.push(token.to_string()),
        }
    }
    if let Some(op) = pending_operator {
        return Err(RangeError::DanglingOperator {
            operator: op.to_string(),
        });
    }

    let mut comparators = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        if tokens.get(i + 1).map(String::as_str) == Some("-") {
            let to = tokens.get(i + 2).ok_or(RangeError::IncompleteHyphen)?;
            comparators.extend(hyphen(&tokens[i], to)?);
            i += 3;
            continue;
        }
        if tokens[i] == "-" {
            return Err(RangeError::IncompleteHyphen);
        }
        comparators.extend(parse_comparator(&tokens[i])?);
        i += 1;
    }

    Ok(comparators)
}

fn parse_comparator(token: &str) -> Result<Vec<Comparator>, RangeError> {
    let (operator, rest) = OPERATORS
        .iter()
        .find_map(|op| token.strip_prefix(op).map(|rest| (*op, rest)))
        .unwrap_or(("", token));

    if rest.is_empty() {
        return Err(RangeError::DanglingOperator {
            operator: operator.to_string(),
        });
    }
    // `==16` and `>==16`: the operator already consumed its `=`
    if !operator.is_empty() && rest.starts_with('=') {
        return Err(RangeError::InvalidVersion {
            token: token.to_string(),
        });
    }
    let partial = Partial::parse(rest)?;

    Ok(match operator {
        "^" => caret(&partial),
        "~" | "~>" => tilde(&partial),
        "" | "=" => xrange(&partial),
        ">" => greater(&partial),
        ">=" => greater_eq(&partial),
        "<" => less(&partial),
        "<=" => less_eq(&partial),
        _ => unreachable!("operator table is exhaustive"),
    })
}

/// Upper bound covering every version of the partial's last given component
fn bump_upper(p: &Partial) -> Option<Version> {
    match (p.major, p.minor, p.patch) {
        (None, _, _) => None,
        (Some(major), None, _) => Some(version_floor(major + 1, 0, 0)),
        (Some(major), Some(minor), None) => Some(version_floor(major, minor + 1, 0)),
        (Some(_), Some(_), Some(_)) => None,
    }
}

fn range_between(p: &Partial, upper: Version) -> Vec<Comparator> {
    vec![
        Comparator::new(Op::GreaterEq, p.floor()),
        Comparator::new(Op::Less, upper),
    ]
}

fn caret(p: &Partial) -> Vec<Comparator> {
    let Some(major) = p.major else {
        return Vec::new();
    };
    let upper = match (p.minor, p.patch) {
        (None, _) => version_floor(major + 1, 0, 0),
        (Some(minor), None) if major == 0 => version_floor(0, minor + 1, 0),
        (Some(_), None) => version_floor(major + 1, 0, 0),
        (Some(_), Some(_)) if major != 0 => version_floor(major + 1, 0, 0),
        (Some(minor), Some(_)) if minor != 0 => version_floor(0, minor + 1, 0),
        (Some(_), Some(patch)) => version_floor(0, 0, patch + 1),
    };
    range_between(p, upper)
}

fn tilde(p: &Partial) -> Vec<Comparator> {
    let Some(major) = p.major else {
        return Vec::new();
    };
    let upper = match p.minor {
        None => version_floor(major + 1, 0, 0),
        Some(minor) => version_floor(major, minor + 1, 0),
    };
    range_between(p, upper)
}

fn xrange(p: &Partial) -> Vec<Comparator> {
    if p.major.is_none() {
        return Vec::new();
    }
    match bump_upper(p) {
        Some(upper) => range_between(p, upper),
        None => vec![Comparator::new(Op::Exact, p.floor())],
    }
}

fn greater(p: &Partial) -> Vec<Comparator> {
    match (p.major, p.minor) {
        (None, _) => nothing(),
        (Some(major), None) => vec![Comparator::new(Op::GreaterEq, version(major + 1, 0, 0))],
        (Some(major), Some(minor)) if !p.is_full() => {
            vec![Comparator::new(Op::GreaterEq, version(major, minor + 1, 0))]
        }
        _ => vec![Comparator::new(Op::Greater, p.floor())],
    }
}

fn greater_eq(p: &Partial) -> Vec<Comparator> {
    if p.major.is_none() {
        return Vec::new();
    }
    vec![Comparator::new(Op::GreaterEq, p.floor())]
}

fn less(p: &Partial) -> Vec<Comparator> {
    let Some(major) = p.major else {
        return nothing();
    };
    if p.is_full() {
        return vec![Comparator::new(Op::Less, p.floor())];
    }
    let upper = version_floor(major, p.minor.unwrap_or(0), 0);
    vec![Comparator::new(Op::Less, upper)]
}

fn less_eq(p: &Partial) -> Vec<Comparator> {
    if p.major.is_none() {
        return Vec::new();
    }
    match bump_upper(p) {
        Some(upper) => vec![Comparator::new(Op::Less, upper)],
        None => vec![Comparator::new(Op::LessEq, p.floor())],
    }
}

fn hyphen(from: &str, to: &str) -> Result<Vec<Comparator>, RangeError> {
    let from = Partial::parse(from)?;
    let to = Partial::parse(to)?;

    let mut comparators = Vec::new();
    if from.major.is_some() {
        comparators.push(Comparator::new(Op::GreaterEq, from.floor()));
    }
    if to.major.is_some() {
        match bump_upper(&to) {
            Some(upper) => comparators.push(Comparator::new(Op::Less, upper)),
            None => comparators.push(Comparator::new(Op::LessEq, to.floor())),
        }
    }
    Ok(comparators)
}
