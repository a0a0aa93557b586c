//! Report assembly - pure merge, sort, and summarize
//!
//! No network or I/O. Takes everything the collectors produced and builds
//! the final [`Report`], stable-sorting issues descending by severity and
//! computing the summary counts.

use std::collections::{BTreeMap, HashMap};

use crate::config::Config;
use crate::domain::entities::{
    Duplication, Hotspot, Issue, Language, QualityGateStatus, Rule,
};
use crate::domain::report::{Report, Summary};

/// Everything the collectors produced, ready for assembly.
#[derive(Debug, Default)]
pub struct CollectedData {
    pub previous_period: String,
    pub quality_gate_status: Option<QualityGateStatus>,
    pub measures: BTreeMap<String, String>,
    pub languages: Vec<Language>,
    pub rules: HashMap<String, Rule>,
    pub issues: Vec<Issue>,
    pub hotspots: Vec<Hotspot>,
    pub duplications: Vec<Duplication>,
}

/// Assemble the final report.
pub fn assemble(config: &Config, mut data: CollectedData) -> Report {
    sort_issues(&mut data.issues);
    let summary = Summary::of(&data.issues);

    Report {
        date: chrono::Utc::now().format("%a %b %d %Y").to_string(),
        project_name: config.project.clone(),
        application_name: config.application.clone(),
        release_name: config.release.clone(),
        branch: config.branch.clone(),
        pull_request: config.pull_request.clone(),
        since_leak_period: config.since_leak_period,
        delta_analysis: if config.since_leak_period { "Yes" } else { "No" }.to_string(),
        previous_period: data.previous_period,
        all_bugs: config.all_bugs,
        fix_missing_rule: config.fix_missing_rule,
        no_security_hotspot: config.no_security_hotspot,
        sonar_base_url: config.sonar_url.clone(),
        sonar_organization: config.organization.clone(),
        quality_gate_status: data.quality_gate_status,
        rules: data.rules,
        issues: data.issues,
        hotspots: data.hotspots,
        duplications: data.duplications,
        languages: data.languages,
        measures: data.measures,
        summary,
    }
}

/// Stable descending sort by severity ordinal. Ties keep the server's own
/// return order.
pub fn sort_issues(issues: &mut [Issue]) {
    issues.sort_by(|a, b| b.severity.rank().cmp(&a.severity.rank()));
}
