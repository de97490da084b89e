//! Version parsing and constraint evaluation
//!
//! Versions follow semantic versioning. Ordering uses semver precedence:
//! build metadata is ignored and a pre-release sorts before its release.
//!
//! Constraint strings accept the usual comparison operators (`>=`, `>`, `<=`,
//! `<`, `=`), `^`, `~`, wildcards, comma-separated conjunctions and inclusive
//! hyphen ranges (`1.0.0 - 2.0.0`). A bare version such as `1.2.0` means
//! "at least 1.2.0".

use std::cmp::Ordering;
use std::fmt;

use semver::{Comparator, Op, VersionReq};

use crate::error::{BranchpackError, Result};

/// A parsed semantic version
#[derive(Debug, Clone)]
pub struct Version(semver::Version);

impl Version {
    /// Parse a version string
    pub fn parse(s: &str) -> Result<Self> {
        semver::Version::parse(s.trim())
            .map(Version)
            .map_err(|e| BranchpackError::InvalidVersion {
                version: s.to_string(),
                reason: e.to_string(),
            })
    }

    /// Check whether this version is strictly newer than `other`
    pub fn is_newer_than(&self, other: &Version) -> bool {
        self > other
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp_precedence(&other.0)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A version requirement attached to a dependency edge
#[derive(Debug, Clone)]
pub struct Constraint {
    raw: String,
    req: VersionReq,
}

impl Constraint {
    /// Parse a constraint string
    pub fn parse(s: &str) -> Result<Self> {
        let normalized = normalize(s);
        let req = VersionReq::parse(&normalized).map_err(|e| BranchpackError::InvalidVersion {
            version: s.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            raw: s.trim().to_string(),
            req,
        })
    }

    /// Check whether `version` satisfies every comparator of this constraint
    pub fn matches(&self, version: &Version) -> bool {
        self.req
            .comparators
            .iter()
            .all(|comparator| comparator_matches(comparator, &version.0))
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Check whether `version` satisfies `constraint`
///
/// An absent constraint is always satisfied. A constraint that fails to parse
/// is an error; a candidate version that fails to parse never satisfies.
pub fn satisfies(version: &str, constraint: Option<&str>) -> Result<bool> {
    let Some(constraint) = constraint else {
        return Ok(true);
    };

    let constraint = Constraint::parse(constraint)?;
    Ok(Version::parse(version).is_ok_and(|v| constraint.matches(&v)))
}

/// Fully specified ordering comparators compare by precedence, so that
/// `>=1.0.0` accepts `1.1.0-beta`. Partial, caret, tilde and wildcard
/// comparators keep semver's own matching rules.
fn comparator_matches(comparator: &Comparator, version: &semver::Version) -> bool {
    let (Some(minor), Some(patch)) = (comparator.minor, comparator.patch) else {
        return comparator.matches(version);
    };

    let bound = semver::Version {
        major: comparator.major,
        minor,
        patch,
        pre: comparator.pre.clone(),
        build: semver::BuildMetadata::EMPTY,
    };
    let ordering = version.cmp_precedence(&bound);

    match comparator.op {
        Op::Exact => ordering == Ordering::Equal,
        Op::Greater => ordering == Ordering::Greater,
        Op::GreaterEq => ordering != Ordering::Less,
        Op::Less => ordering == Ordering::Less,
        Op::LessEq => ordering != Ordering::Greater,
        _ => comparator.matches(version),
    }
}

fn normalize(s: &str) -> String {
    let trimmed = s.trim();

    if trimmed.is_empty() || trimmed == "latest" {
        return "*".to_string();
    }

    if let Some((low, high)) = trimmed.split_once(" - ") {
        return format!(">={}, <={}", low.trim(), high.trim());
    }

    trimmed
        .split(',')
        .map(|part| normalize_comparator(part.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn normalize_comparator(part: &str) -> String {
    if let Some(rest) = part.strip_prefix("==") {
        return format!("={}", rest.trim());
    }

    let bare_version = semver::Version::parse(part).is_ok()
        || (!part.is_empty() && part.chars().all(|c| c.is_ascii_digit() || c == '.'));
    if bare_version {
        return format!(">={part}");
    }

    part.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_least_constraint() {
        assert!(satisfies("1.2.0", Some(">=1.1.0")).unwrap());
        assert!(satisfies("1.1.0", Some(">=1.1.0")).unwrap());
        assert!(!satisfies("1.0.0", Some(">=1.1.0")).unwrap());
    }

    #[test]
    fn test_absent_constraint_always_satisfied() {
        assert!(satisfies("0.0.1", None).unwrap());
        assert!(satisfies("not-a-version", None).unwrap());
    }

    #[test]
    fn test_bare_version_means_at_least() {
        assert!(satisfies("2.0.0", Some("1.2.0")).unwrap());
        assert!(satisfies("1.2.0", Some("1.2.0")).unwrap());
        assert!(!satisfies("1.1.9", Some("1.2.0")).unwrap());
    }

    #[test]
    fn test_exact_constraint() {
        assert!(satisfies("1.2.0", Some("=1.2.0")).unwrap());
        assert!(satisfies("1.2.0", Some("==1.2.0")).unwrap());
        assert!(!satisfies("1.2.1", Some("=1.2.0")).unwrap());
    }

    #[test]
    fn test_range_constraints() {
        assert!(satisfies("1.5.0", Some(">=1.0.0, <2.0.0")).unwrap());
        assert!(!satisfies("2.0.0", Some(">=1.0.0, <2.0.0")).unwrap());
        assert!(satisfies("2.0.0", Some("1.0.0 - 2.0.0")).unwrap());
        assert!(!satisfies("2.0.1", Some("1.0.0 - 2.0.0")).unwrap());
    }

    #[test]
    fn test_caret_and_tilde() {
        assert!(satisfies("1.9.3", Some("^1.2.0")).unwrap());
        assert!(!satisfies("2.0.0", Some("^1.2.0")).unwrap());
        assert!(satisfies("1.2.9", Some("~1.2.0")).unwrap());
        assert!(!satisfies("1.3.0", Some("~1.2.0")).unwrap());
    }

    #[test]
    fn test_wildcards() {
        assert!(satisfies("3.1.4", Some("*")).unwrap());
        assert!(satisfies("3.1.4", Some("latest")).unwrap());
        assert!(satisfies("1.4.0", Some("1.x")).unwrap());
    }

    #[test]
    fn test_prerelease_ordering_follows_precedence() {
        assert!(satisfies("1.1.0-beta.1", Some(">=1.0.0")).unwrap());
        assert!(!satisfies("1.0.0-rc.1", Some(">=1.0.0")).unwrap());
        assert!(satisfies("1.0.0-rc.1", Some("<1.0.0")).unwrap());
    }

    #[test]
    fn test_invalid_constraint_is_error() {
        let err = satisfies("1.0.0", Some(">=banana")).unwrap_err();
        assert!(matches!(err, BranchpackError::InvalidVersion { .. }));
    }

    #[test]
    fn test_unparsable_candidate_does_not_satisfy() {
        assert!(!satisfies("one point oh", Some(">=1.0.0")).unwrap());
    }

    #[test]
    fn test_version_ordering() {
        let v = |s| Version::parse(s).unwrap();
        assert!(v("1.1.0").is_newer_than(&v("1.0.0")));
        assert!(!v("1.1.0").is_newer_than(&v("1.2.0")));
        assert!(!v("1.0.0").is_newer_than(&v("1.0.0")));
        assert!(v("1.0.0").is_newer_than(&v("1.0.0-alpha")));
        assert!(v("1.0.0-beta").is_newer_than(&v("1.0.0-alpha")));
        assert_eq!(v("1.0.0+build.1"), v("1.0.0+build.2"));
    }

    #[test]
    fn test_invalid_version() {
        let err = Version::parse("1.0").unwrap_err();
        assert!(matches!(err, BranchpackError::InvalidVersion { version, .. } if version == "1.0"));
    }

    #[test]
    fn test_constraint_display_keeps_original_text() {
        let constraint = Constraint::parse(" >=1.1.0 ").unwrap();
        assert_eq!(constraint.to_string(), ">=1.1.0");
    }
}
