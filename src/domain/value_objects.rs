//! Severity, issue type, and server-epoch value objects

use serde::{Deserialize, Serialize};

/// Issue and hotspot severity, ordered from least to most severe.
///
/// The derived `Ord` follows declaration order, so `Minor < Major <
/// Critical < Blocker`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Minor,
    Major,
    Critical,
    Blocker,
}

impl Severity {
    /// Numeric ordinal used for the descending report sort.
    pub fn rank(self) -> u8 {
        match self {
            Self::Minor => 0,
            Self::Major => 1,
            Self::Critical => 2,
            Self::Blocker => 3,
        }
    }

    /// Parse a severity from its wire form. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "MINOR" => Some(Self::Minor),
            "MAJOR" => Some(Self::Major),
            "CRITICAL" => Some(Self::Critical),
            "BLOCKER" => Some(Self::Blocker),
            _ => None,
        }
    }

    /// Map a hotspot `vulnerabilityProbability` to a severity.
    ///
    /// HIGH -> CRITICAL, MEDIUM -> MAJOR, LOW -> MINOR. Anything else is
    /// unrecognized and left to the caller to default.
    pub fn from_vulnerability_probability(probability: &str) -> Option<Self> {
        match probability {
            "HIGH" => Some(Self::Critical),
            "MEDIUM" => Some(Self::Major),
            "LOW" => Some(Self::Minor),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Minor => write!(f, "MINOR"),
            Self::Major => write!(f, "MAJOR"),
            Self::Critical => write!(f, "CRITICAL"),
            Self::Blocker => write!(f, "BLOCKER"),
        }
    }
}

/// Issue type as reported by the server.
///
/// `Other` absorbs any type this crate does not know about so that an
/// unexpected server value never aborts a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueType {
    Bug,
    Vulnerability,
    CodeSmell,
    SecurityHotspot,
    Other,
}

impl IssueType {
    pub fn parse(value: &str) -> Self {
        match value {
            "BUG" => Self::Bug,
            "VULNERABILITY" => Self::Vulnerability,
            "CODE_SMELL" => Self::CodeSmell,
            "SECURITY_HOTSPOT" => Self::SecurityHotspot,
            _ => Self::Other,
        }
    }
}

/// Behavioral epoch of the SonarQube server, derived once from the version
/// string reported by `api/system/status`.
///
/// The epoch determines which type filters and issue statuses are valid and
/// whether security hotspots live in a dedicated endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerEpoch {
    /// Before 7.3 — hotspots do not exist.
    Pre73,
    /// 7.3 up to 7.8 — hotspots live in the issues endpoint, but the
    /// TO_REVIEW/IN_REVIEW statuses are not queryable yet.
    From73,
    /// 7.8 up to 8.0 — hotspots live in the issues endpoint with the full
    /// status set.
    From78,
    /// 8.0 and later — hotspots moved to a dedicated endpoint; rules still
    /// carry the SECURITY_HOTSPOT type but issues do not.
    From80,
}

impl ServerEpoch {
    /// Classify a raw server version string.
    ///
    /// The string is truncated to its first three characters (major.minor
    /// precision) and compared lexically against the fixed boundaries. This
    /// mirrors how the server's own ecosystem treats versions and keeps
    /// unusual strings tolerated rather than rejected.
    pub fn classify(version: &str) -> Self {
        let v = version.get(..3).unwrap_or(version);
        if v < "7.3" {
            Self::Pre73
        } else if v < "7.8" {
            Self::From73
        } else if v < "8.0" {
            Self::From78
        } else {
            Self::From80
        }
    }

    /// Whether this epoch serves hotspots from the dedicated
    /// `api/hotspots/*` endpoints rather than the issues search.
    pub fn has_dedicated_hotspots(self) -> bool {
        matches!(self, Self::From80)
    }
}

/// Hotspot listing is restricted to this status; everything reviewed is out
/// of scope for the report.
pub const HOTSPOT_STATUSES: &str = "TO_REVIEW";

/// Query-filter fragments derived from the server epoch.
///
/// Type fields are comma-separated type lists; an empty string means
/// unfiltered. Built once per run and shared read-only by the collectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterBundle {
    /// `types` filter for the issues search.
    pub issue_types: &'static str,
    /// `types` filter for the rules search.
    pub rule_types: &'static str,
    /// `statuses` filter for the issues search.
    pub issue_statuses: &'static str,
}

impl FilterBundle {
    /// Resolve the filter bundle for an epoch.
    ///
    /// When hotspot reporting is disabled by flag the server is treated as
    /// pre-7.3 regardless of its actual version.
    pub fn resolve(epoch: ServerEpoch, hotspots_disabled: bool) -> Self {
        let epoch = if hotspots_disabled { ServerEpoch::Pre73 } else { epoch };
        match epoch {
            ServerEpoch::Pre73 => Self {
                issue_types: "VULNERABILITY",
                rule_types: "VULNERABILITY",
                issue_statuses: "OPEN,CONFIRMED,REOPENED",
            },
            ServerEpoch::From73 => Self {
                issue_types: "VULNERABILITY,SECURITY_HOTSPOT",
                rule_types: "VULNERABILITY,SECURITY_HOTSPOT",
                issue_statuses: "OPEN,CONFIRMED,REOPENED",
            },
            ServerEpoch::From78 => Self {
                issue_types: "VULNERABILITY,SECURITY_HOTSPOT",
                rule_types: "VULNERABILITY,SECURITY_HOTSPOT",
                issue_statuses: "OPEN,CONFIRMED,REOPENED,TO_REVIEW,IN_REVIEW",
            },
            ServerEpoch::From80 => Self {
                issue_types: "VULNERABILITY",
                rule_types: "VULNERABILITY,SECURITY_HOTSPOT",
                issue_statuses: "OPEN,CONFIRMED,REOPENED",
            },
        }
    }

    /// Clear both type filters (the all-bugs override), independent of epoch.
    pub fn without_type_filters(self) -> Self {
        Self {
            issue_types: "",
            rule_types: "",
            ..self
        }
    }
}
