//! The assembled report model - the pipeline's sole external artifact

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::entities::{Duplication, Hotspot, Issue, Language, QualityGateStatus, Rule};
use super::value_objects::Severity;

/// The finished report model handed to the downstream renderer.
///
/// Constructed once at the end of the pipeline and immutable afterwards.
/// The issue list is sorted descending by severity (stable, so ties keep the
/// server's own return order).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Human-readable generation date.
    pub date: String,
    pub project_name: Option<String>,
    pub application_name: Option<String>,
    pub release_name: Option<String>,
    pub branch: Option<String>,
    pub pull_request: Option<String>,
    pub since_leak_period: bool,
    /// `"Yes"`/`"No"` rendering of the leak-period flag.
    pub delta_analysis: String,
    /// Leak-period setting value, empty unless `since_leak_period` is set.
    pub previous_period: String,
    pub all_bugs: bool,
    pub fix_missing_rule: bool,
    pub no_security_hotspot: bool,
    pub sonar_base_url: String,
    pub sonar_organization: Option<String>,
    pub quality_gate_status: Option<QualityGateStatus>,
    pub rules: HashMap<String, Rule>,
    pub issues: Vec<Issue>,
    pub hotspots: Vec<Hotspot>,
    pub duplications: Vec<Duplication>,
    pub languages: Vec<Language>,
    /// Raw metric values keyed by metric name.
    pub measures: BTreeMap<String, String>,
    pub summary: Summary,
}

/// Issue counts over the final issue set, by type and by severity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub bugs: usize,
    pub code_smells: usize,
    pub vulnerabilities: usize,
    pub blocker: usize,
    pub critical: usize,
    pub major: usize,
    pub minor: usize,
}

impl Summary {
    /// Count issues matching each type and severity value.
    pub fn of(issues: &[Issue]) -> Self {
        use crate::domain::value_objects::IssueType;

        let count_type = |t: IssueType| issues.iter().filter(|i| i.issue_type == t).count();
        let count_severity = |s: Severity| issues.iter().filter(|i| i.severity == s).count();

        Self {
            bugs: count_type(IssueType::Bug),
            code_smells: count_type(IssueType::CodeSmell),
            vulnerabilities: count_type(IssueType::Vulnerability),
            blocker: count_severity(Severity::Blocker),
            critical: count_severity(Severity::Critical),
            major: count_severity(Severity::Major),
            minor: count_severity(Severity::Minor),
        }
    }
}
