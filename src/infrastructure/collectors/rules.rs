//! Rule catalog
//!
//! Fetches active rule definitions into a key-indexed lookup table. The
//! catalog is consulted, never mutated, by the issue and hotspot collectors
//! to backfill missing severity and description metadata.

use std::collections::HashMap;

use serde::Deserialize;

use super::{languages_param, organization_param, types_param};
use crate::application::errors::ReportError;
use crate::config::Config;
use crate::domain::entities::{Language, Rule};
use crate::domain::value_objects::{FilterBundle, Severity};
use crate::infrastructure::client::SonarClient;
use crate::infrastructure::paginator::{fetch_all_pages, PAGE_SIZE};

#[derive(Debug, Deserialize)]
struct RulesResponse {
    #[serde(default)]
    rules: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    key: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "htmlDesc", default)]
    html_desc: Option<String>,
    #[serde(default)]
    severity: Option<String>,
}

/// Fetch all active rules matching the epoch's rule-type filter.
///
/// `fix_missing_rule` clears the type filter for this fetch only, so issue
/// descriptions resolve even when the issue search stays filtered.
pub async fn collect(
    client: &SonarClient,
    config: &Config,
    filters: &FilterBundle,
    languages: &[Language],
) -> Result<HashMap<String, Rule>, ReportError> {
    let type_filter = if config.fix_missing_rule {
        String::new()
    } else {
        types_param(filters.rule_types)
    };
    let organization = organization_param(config.organization.as_deref());
    let language_filter = languages_param(languages);

    let rules = fetch_all_pages(|page| {
        let path = format!(
            "/api/rules/search?activation=true&f=name,htmlDesc,severity&ps={PAGE_SIZE}&p={page}\
             {type_filter}{organization}{language_filter}"
        );
        async move {
            client
                .get_json::<RulesResponse>(&path, "getting rules")
                .await
                .map(|response| response.rules)
        }
    })
    .await?;

    tracing::debug!(count = rules.len(), "rule catalog populated");

    Ok(rules
        .into_iter()
        .map(|raw| {
            let rule = Rule {
                key: raw.key.clone(),
                name: raw.name.unwrap_or_default(),
                html_desc: raw.html_desc.unwrap_or_default(),
                severity: raw.severity.as_deref().and_then(Severity::parse),
            };
            (raw.key, rule)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn test_config(url: &str) -> Config {
        Config {
            sonar_url: url.to_string(),
            sonar_component: "my-app".to_string(),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn indexes_rules_by_key() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/rules/search")
            .match_query(Matcher::UrlEncoded("types".into(), "VULNERABILITY".into()))
            .with_status(200)
            .with_body(
                r#"{"rules":[
                    {"key":"java:S2076","name":"OS commands should not be vulnerable to injection",
                     "htmlDesc":"<p>...</p>","severity":"BLOCKER"},
                    {"key":"java:S5131","name":"XSS","severity":"UNKNOWN_LEVEL"}
                ]}"#,
            )
            .create_async()
            .await;

        let client = SonarClient::new(&server.url(), None).unwrap();
        let config = test_config(&server.url());
        let filters = FilterBundle {
            issue_types: "VULNERABILITY",
            rule_types: "VULNERABILITY",
            issue_statuses: "OPEN,CONFIRMED,REOPENED",
        };

        let catalog = collect(&client, &config, &filters, &[]).await.unwrap();

        assert_eq!(catalog.len(), 2);
        let rule = &catalog["java:S2076"];
        assert_eq!(rule.severity, Some(Severity::Blocker));
        assert!(rule.name.starts_with("OS commands"));
        // Unparsable severities degrade to None rather than aborting.
        assert_eq!(catalog["java:S5131"].severity, None);
    }

    #[tokio::test]
    async fn fix_missing_rule_drops_the_type_filter() {
        let mut server = mockito::Server::new_async().await;
        let unfiltered = server
            .mock("GET", "/api/rules/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"rules":[]}"#)
            .expect(1)
            .create_async()
            .await;
        // A filtered request would match this more specific mock instead.
        let filtered = server
            .mock("GET", "/api/rules/search")
            .match_query(Matcher::UrlEncoded("types".into(), "VULNERABILITY".into()))
            .with_status(200)
            .with_body(r#"{"rules":[]}"#)
            .expect(0)
            .create_async()
            .await;

        let client = SonarClient::new(&server.url(), None).unwrap();
        let config = Config {
            fix_missing_rule: true,
            ..test_config(&server.url())
        };
        let filters = FilterBundle {
            issue_types: "VULNERABILITY",
            rule_types: "VULNERABILITY",
            issue_statuses: "OPEN,CONFIRMED,REOPENED",
        };

        collect(&client, &config, &filters, &[]).await.unwrap();
        unfiltered.assert_async().await;
        filtered.assert_async().await;
    }
}
