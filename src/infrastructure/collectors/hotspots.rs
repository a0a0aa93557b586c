//! Security hotspot collection (two-phase)
//!
//! Active only when the server epoch serves hotspots from the dedicated
//! endpoints. Phase 1 pages through the hotspot search accumulating keys;
//! phase 2 fetches full detail per key, one at a time, mapping the rule's
//! vulnerability probability to a report severity.

use serde::Deserialize;

use super::{branch_params, organization_param, reduce_component_path};
use crate::application::errors::ReportError;
use crate::config::Config;
use crate::domain::entities::Hotspot;
use crate::domain::value_objects::{Severity, HOTSPOT_STATUSES};
use crate::infrastructure::client::SonarClient;
use crate::infrastructure::paginator::{fetch_all_pages, PAGE_SIZE};

#[derive(Debug, Deserialize)]
struct HotspotSearchResponse {
    #[serde(default)]
    hotspots: Vec<HotspotListEntry>,
}

#[derive(Debug, Deserialize)]
struct HotspotListEntry {
    key: String,
}

#[derive(Debug, Deserialize)]
struct HotspotDetail {
    key: String,
    status: String,
    #[serde(default)]
    line: Option<u64>,
    #[serde(default)]
    message: Option<String>,
    component: HotspotComponent,
    rule: HotspotRule,
}

#[derive(Debug, Deserialize)]
struct HotspotComponent {
    key: String,
}

#[derive(Debug, Deserialize)]
struct HotspotRule {
    key: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "vulnerabilityProbability", default)]
    vulnerability_probability: Option<String>,
}

/// List hotspot keys, then resolve each key to a full hotspot record.
///
/// Detail fetches are intentionally sequential; the first failure aborts the
/// run with the failing key's context. A hotspot that disappeared between
/// listing and detail fetch therefore surfaces as an HTTP fault.
pub async fn collect(client: &SonarClient, config: &Config) -> Result<Vec<Hotspot>, ReportError> {
    let keys = list_keys(client, config).await?;
    tracing::debug!(count = keys.len(), "hotspot keys listed");

    let mut hotspots = Vec::with_capacity(keys.len());
    for key in keys {
        let path = format!("/api/hotspots/show?hotspot={key}");
        let detail: HotspotDetail = client.get_json(&path, "getting hotspot details").await?;
        hotspots.push(resolve(detail));
    }
    Ok(hotspots)
}

async fn list_keys(client: &SonarClient, config: &Config) -> Result<Vec<String>, ReportError> {
    let component = &config.sonar_component;
    let branch_filter = branch_params(config.branch.as_deref(), config.pull_request.as_deref());
    let organization = organization_param(config.organization.as_deref());

    fetch_all_pages(|page| {
        let path = format!(
            "/api/hotspots/search?projectKey={component}{branch_filter}{organization}\
             &ps={PAGE_SIZE}&p={page}&statuses={HOTSPOT_STATUSES}&s=SEVERITY"
        );
        async move {
            client
                .get_json::<HotspotSearchResponse>(&path, "getting hotspot list")
                .await
                .map(|response| response.hotspots.into_iter().map(|h| h.key).collect())
        }
    })
    .await
}

fn resolve(detail: HotspotDetail) -> Hotspot {
    let severity = detail
        .rule
        .vulnerability_probability
        .as_deref()
        .and_then(Severity::from_vulnerability_probability)
        .unwrap_or_else(|| {
            tracing::warn!(
                hotspot = %detail.key,
                probability = ?detail.rule.vulnerability_probability,
                "unknown hotspot vulnerability probability, defaulting to MAJOR"
            );
            Severity::Major
        });

    Hotspot {
        severity,
        status: detail.status,
        component: reduce_component_path(&detail.component.key),
        line: detail.line,
        description: detail.rule.name.unwrap_or_else(|| "/".to_string()),
        message: detail.message.unwrap_or_default(),
        rule: detail.rule.key,
        key: detail.key,
    }
}
