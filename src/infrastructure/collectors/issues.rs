//! Issue collection
//!
//! Paginated fetch over the issues search, normalizing each raw record
//! against the rule catalog. Severity comes from the raw issue when present
//! and is otherwise inherited from the referenced rule; an issue with
//! neither is a data-integrity fault, surfaced rather than defaulted.

use std::collections::HashMap;

use serde::Deserialize;

use super::{branch_params, languages_param, organization_param, reduce_component_path, types_param};
use crate::application::errors::ReportError;
use crate::config::Config;
use crate::domain::entities::{Issue, Language, Rule};
use crate::domain::value_objects::{FilterBundle, IssueType, Severity};
use crate::infrastructure::client::SonarClient;
use crate::infrastructure::paginator::{fetch_all_pages, PAGE_SIZE};

#[derive(Debug, Deserialize)]
struct IssuesResponse {
    #[serde(default)]
    issues: Vec<RawIssue>,
}

#[derive(Debug, Deserialize)]
struct RawIssue {
    rule: String,
    #[serde(default)]
    severity: Option<String>,
    #[serde(default)]
    status: String,
    component: String,
    #[serde(default)]
    line: Option<u64>,
    #[serde(default)]
    message: Option<String>,
    key: String,
    #[serde(rename = "type", default)]
    issue_type: Option<String>,
}

/// Fetch and normalize all issues for the configured component.
pub async fn collect(
    client: &SonarClient,
    config: &Config,
    filters: &FilterBundle,
    languages: &[Language],
    rules: &HashMap<String, Rule>,
) -> Result<Vec<Issue>, ReportError> {
    let component = &config.sonar_component;
    let statuses = filters.issue_statuses;
    let leak_filter = if config.since_leak_period {
        "&sinceLeakPeriod=true"
    } else {
        ""
    };
    let type_filter = types_param(filters.issue_types);
    let branch_filter = branch_params(config.branch.as_deref(), config.pull_request.as_deref());
    let organization = organization_param(config.organization.as_deref());
    let language_filter = languages_param(languages);

    let raw_issues = fetch_all_pages(|page| {
        let path = format!(
            "/api/issues/search?componentKeys={component}&ps={PAGE_SIZE}&p={page}\
             &statuses={statuses}&resolutions=&s=SEVERITY&asc=no\
             {leak_filter}{type_filter}{branch_filter}{organization}{language_filter}"
        );
        async move {
            client
                .get_json::<IssuesResponse>(&path, "getting issues")
                .await
                .map(|response| response.issues)
        }
    })
    .await?;

    raw_issues
        .into_iter()
        .map(|raw| normalize(raw, rules))
        .collect()
}

/// Normalize one raw issue against the rule catalog.
fn normalize(raw: RawIssue, rules: &HashMap<String, Rule>) -> Result<Issue, ReportError> {
    let rule = rules.get(&raw.rule);

    // Security hotspots surfaced through the issues endpoint carry no
    // severity until confirmed; inherit the rule's severity instead.
    let severity = raw
        .severity
        .as_deref()
        .and_then(Severity::parse)
        .or_else(|| rule.and_then(|r| r.severity))
        .ok_or_else(|| {
            ReportError::DataIntegrity(format!(
                "issue {} carries no severity and rule {} cannot supply one",
                raw.key, raw.rule
            ))
        })?;

    let description = rule
        .map(|r| r.name.clone())
        .unwrap_or_else(|| "/".to_string());

    Ok(Issue {
        severity,
        description,
        status: raw.status,
        component: reduce_component_path(&raw.component),
        line: raw.line,
        message: raw.message.unwrap_or_default(),
        issue_type: raw
            .issue_type
            .as_deref()
            .map(IssueType::parse)
            .unwrap_or(IssueType::Other),
        rule: raw.rule,
        key: raw.key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(severity: Option<&str>) -> RawIssue {
        RawIssue {
            rule: "java:S2076".to_string(),
            severity: severity.map(str::to_string),
            status: "OPEN".to_string(),
            component: "myproject:src/main/Foo.java".to_string(),
            line: Some(42),
            message: Some("do not do this".to_string()),
            key: "AX-issue-1".to_string(),
            issue_type: Some("VULNERABILITY".to_string()),
        }
    }

    fn catalog(severity: Option<Severity>) -> HashMap<String, Rule> {
        let mut rules = HashMap::new();
        rules.insert(
            "java:S2076".to_string(),
            Rule {
                key: "java:S2076".to_string(),
                name: "Command injection".to_string(),
                html_desc: String::new(),
                severity,
            },
        );
        rules
    }

    #[test]
    fn severity_taken_from_raw_issue_when_present() {
        let issue = normalize(raw(Some("BLOCKER")), &catalog(Some(Severity::Critical))).unwrap();
        assert_eq!(issue.severity, Severity::Blocker);
    }

    #[test]
    fn severity_inherited_from_rule_when_absent() {
        let issue = normalize(raw(None), &catalog(Some(Severity::Critical))).unwrap();
        assert_eq!(issue.severity, Severity::Critical);
        assert_eq!(issue.description, "Command injection");
        assert_eq!(issue.component, "src/main/Foo.java");
        assert_eq!(issue.issue_type, IssueType::Vulnerability);
    }

    #[test]
    fn unknown_rule_degrades_description_to_placeholder() {
        let issue = normalize(raw(Some("MAJOR")), &HashMap::new()).unwrap();
        assert_eq!(issue.description, "/");
        assert_eq!(issue.severity, Severity::Major);
    }

    #[test]
    fn missing_severity_and_unresolvable_rule_is_a_fault() {
        let result = normalize(raw(None), &HashMap::new());
        assert!(matches!(result, Err(ReportError::DataIntegrity(_))));
    }

    #[test]
    fn missing_severity_with_severityless_rule_is_a_fault() {
        let result = normalize(raw(None), &catalog(None));
        assert!(matches!(result, Err(ReportError::DataIntegrity(_))));
    }
}
