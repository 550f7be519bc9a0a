//! Result model produced by the resolution pipeline

use std::fmt;

/// Outcome of a latest-version lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LatestVersion {
    /// Version reported by the registry (or the cache)
    Resolved(String),
    /// Registry reported the package as absent
    NotFound,
    /// Lookup failed (transport, parse or unexpected error)
    Error,
}

impl LatestVersion {
    pub fn as_resolved(&self) -> Option<&str> {
        match self {
            LatestVersion::Resolved(version) => Some(version),
            _ => None,
        }
    }
}

impl fmt::Display for LatestVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LatestVersion::Resolved(version) => f.write_str(version),
            LatestVersion::NotFound => f.write_str("N/A (Not Found)"),
            LatestVersion::Error => f.write_str("Error"),
        }
    }
}

/// Outcome of a vulnerability lookup
///
/// Everything other than `Checked` renders as a single sentinel label
/// explaining why no real check happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VulnerabilityStatus {
    /// Checked; identifiers of known vulnerabilities (empty = none known)
    Checked(Vec<String>),
    /// No API token configured
    NoToken,
    /// Declared version is a range, placeholder or unknown
    VersionRange,
    /// Declared version is not pinned and the latest-version lookup failed
    LookupFailed,
    Unauthorized,
    Forbidden,
    RateLimited,
    Timeout,
    Network,
    Parse,
    /// Any other non-success status from the vulnerability API
    Api,
    /// The lookup unit failed before a check could happen
    Processing,
}

impl VulnerabilityStatus {
    /// Sentinel label, `None` for `Checked`
    pub fn sentinel(&self) -> Option<&'static str> {
        let label = match self {
            VulnerabilityStatus::Checked(_) => return None,
            VulnerabilityStatus::NoToken => "N/A (No Token)",
            VulnerabilityStatus::VersionRange => "N/A (Version Range)",
            VulnerabilityStatus::LookupFailed => "N/A (Version Lookup Failed)",
            VulnerabilityStatus::Unauthorized => "Error (Unauthorized)",
            VulnerabilityStatus::Forbidden => "Error (Forbidden)",
            VulnerabilityStatus::RateLimited => "Error (Rate Limit)",
            VulnerabilityStatus::Timeout => "Error (Timeout)",
            VulnerabilityStatus::Network => "Error (Network)",
            VulnerabilityStatus::Parse => "Error (Parse)",
            VulnerabilityStatus::Api => "Error (API)",
            VulnerabilityStatus::Processing => "Error (Processing)",
        };
        Some(label)
    }

    /// Vulnerability identifiers, or a one-element list holding the sentinel
    pub fn labels(&self) -> Vec<String> {
        match self {
            VulnerabilityStatus::Checked(ids) => ids.clone(),
            other => other.sentinel().map(str::to_string).into_iter().collect(),
        }
    }
}

/// Uniform per-dependency result handed to the report formatter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResult {
    pub name: String,
    pub declared_version: String,
    pub latest_version: LatestVersion,
    pub vulnerabilities: VulnerabilityStatus,
}

impl LookupResult {
    /// Result for a unit that failed as a whole
    pub fn failed(name: impl Into<String>, declared_version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_version: declared_version.into(),
            latest_version: LatestVersion::Error,
            vulnerabilities: VulnerabilityStatus::Processing,
        }
    }

    /// `(name, declared_version, latest_version, vulnerabilities)` as report text
    pub fn to_row(&self) -> (String, String, String, Vec<String>) {
        (
            self.name.clone(),
            self.declared_version.clone(),
            self.latest_version.to_string(),
            self.vulnerabilities.labels(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(LatestVersion::Resolved("5.0.0".to_string()), "5.0.0")]
    #[case(LatestVersion::NotFound, "N/A (Not Found)")]
    #[case(LatestVersion::Error, "Error")]
    fn latest_version_displays_sentinels(#[case] latest: LatestVersion, #[case] expected: &str) {
        assert_eq!(latest.to_string(), expected);
    }

    #[test]
    fn checked_status_with_no_findings_has_no_labels() {
        assert!(VulnerabilityStatus::Checked(vec![]).labels().is_empty());
    }

    #[test]
    fn sentinel_status_renders_single_label() {
        assert_eq!(
            VulnerabilityStatus::VersionRange.labels(),
            vec!["N/A (Version Range)".to_string()]
        );
    }

    #[test]
    fn failed_result_marks_both_fields() {
        let result = LookupResult::failed("express", "^4.17.1");
        assert_eq!(
            result.to_row(),
            (
                "express".to_string(),
                "^4.17.1".to_string(),
                "Error".to_string(),
                vec!["Error (Processing)".to_string()]
            )
        );
    }
}
