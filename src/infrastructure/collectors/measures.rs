//! Project-level measures
//!
//! Single fetch of a fixed metric-key list. The language-distribution metric
//! is additionally decomposed into a per-language line-count breakdown that
//! drives the rule catalog's language restriction.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::application::errors::ReportError;
use crate::domain::entities::Language;
use crate::infrastructure::client::SonarClient;

/// Metrics fetched for every report.
pub const METRIC_KEYS: &str = "ncloc_language_distribution,alert_status,bugs,code_smells,\
                               vulnerabilities,security_hotspots,coverage,duplicated_lines_density,\
                               reliability_rating,security_rating,security_review_rating,sqale_rating";

#[derive(Debug, Deserialize)]
struct ComponentMeasuresResponse {
    component: RawComponent,
}

#[derive(Debug, Deserialize)]
struct RawComponent {
    #[serde(default)]
    measures: Vec<RawMeasure>,
}

#[derive(Debug, Deserialize)]
struct RawMeasure {
    metric: String,
    #[serde(default)]
    value: Option<String>,
}

/// Collected metric values plus the decoded language list.
#[derive(Debug, Default)]
pub struct MeasureSet {
    pub measures: BTreeMap<String, String>,
    pub languages: Vec<Language>,
}

/// Fetch the project's measures and decode the language distribution.
pub async fn collect(client: &SonarClient, component: &str) -> Result<MeasureSet, ReportError> {
    let path = format!("/api/measures/component?component={component}&metricKeys={METRIC_KEYS}");
    let response: ComponentMeasuresResponse =
        client.get_json(&path, "getting measures").await?;

    let mut set = MeasureSet::default();
    for measure in response.component.measures {
        let value = measure.value.unwrap_or_default();
        if measure.metric == "ncloc_language_distribution" {
            set.languages = decode_language_distribution(&value);
        }
        set.measures.insert(measure.metric, value);
    }
    Ok(set)
}

/// Decode the `lang=count;lang=count` encoding, order preserved.
pub fn decode_language_distribution(value: &str) -> Vec<Language> {
    value
        .split(';')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (name, count) = pair.split_once('=')?;
            Some(Language {
                name: name.to_string(),
                line_count: count.trim().parse().unwrap_or(0),
            })
        })
        .collect()
}
