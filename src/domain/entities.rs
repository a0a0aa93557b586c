//! Report entities collected from the server

use serde::{Deserialize, Serialize};

use super::value_objects::{IssueType, Severity};

/// An active rule definition, used as a lookup table to backfill issue and
/// hotspot metadata. Read-only once the catalog is populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub key: String,
    pub name: String,
    pub html_desc: String,
    /// Severity of the rule itself; inherited by issues that carry none.
    pub severity: Option<Severity>,
}

/// A normalized issue record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Key of the rule that raised this issue.
    pub rule: String,
    pub severity: Severity,
    pub status: String,
    /// Project-relative file path, stripped of the project-key prefix.
    pub component: String,
    pub line: Option<u64>,
    /// Resolved rule name, or `"/"` when the rule is unknown.
    pub description: String,
    pub message: String,
    pub key: String,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
}

/// A fully-resolved security hotspot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hotspot {
    pub rule: String,
    /// Mapped from the hotspot's vulnerability probability.
    pub severity: Severity,
    pub status: String,
    pub component: String,
    pub line: Option<u64>,
    pub description: String,
    pub message: String,
    pub key: String,
}

/// Duplicated-line information for one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Duplication {
    /// Source file key the duplication groups were fetched for.
    pub key: String,
    pub blocks: Vec<DuplicationBlock>,
}

/// One contiguous duplicated block, resolved against the response's
/// file-reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicationBlock {
    /// First line of the block.
    pub line: u64,
    /// Number of duplicated lines.
    pub size: u64,
    /// Name of the file the block belongs to.
    pub file: String,
}

/// Per-language line count decoded from `ncloc_language_distribution`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
    pub line_count: u64,
}

/// Quality-gate evaluation snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityGateStatus {
    pub status: String,
    #[serde(default)]
    pub conditions: Vec<QualityGateCondition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityGateCondition {
    pub status: String,
    #[serde(rename = "metricKey")]
    pub metric_key: String,
    #[serde(default)]
    pub comparator: Option<String>,
    #[serde(rename = "errorThreshold", default)]
    pub error_threshold: Option<String>,
    #[serde(rename = "actualValue", default)]
    pub actual_value: Option<String>,
}
