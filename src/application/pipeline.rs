//! The aggregation pipeline
//!
//! Strictly sequential orchestration: the server version is fetched first
//! and fixes the filters for everything downstream, then each collector
//! runs in order. Shared mutable state is limited to the accumulating
//! [`CollectedData`]; a fault anywhere aborts the run with no partial
//! report.

use serde::Deserialize;

use super::assembler::{self, CollectedData};
use super::errors::ReportError;
use crate::config::Config;
use crate::domain::entities::QualityGateStatus;
use crate::domain::report::Report;
use crate::domain::value_objects::{FilterBundle, ServerEpoch};
use crate::infrastructure::client::SonarClient;
use crate::infrastructure::collectors::{duplications, hotspots, issues, measures, rules};

#[derive(Debug, Deserialize)]
struct SystemStatus {
    version: String,
}

#[derive(Debug, Deserialize)]
struct SettingsValuesResponse {
    #[serde(default)]
    settings: Vec<SettingValue>,
}

#[derive(Debug, Deserialize)]
struct SettingValue {
    #[serde(default)]
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProjectStatusResponse {
    #[serde(rename = "projectStatus")]
    project_status: QualityGateStatus,
}

/// Run the whole pipeline and return the assembled report.
pub async fn run(config: &Config) -> Result<Report, ReportError> {
    let mut client = SonarClient::new(&config.sonar_url, config.proxy.as_deref())?;

    let status: SystemStatus = client
        .get_json("/api/system/status", "getting server version")
        .await?;
    tracing::info!(version = %status.version, "sonarqube server version");

    let epoch = ServerEpoch::classify(&status.version);
    let mut filters = FilterBundle::resolve(epoch, config.no_security_hotspot);
    if config.all_bugs {
        filters = filters.without_type_filters();
    }

    if let (Some(username), Some(password)) = (&config.username, &config.password) {
        client.login(username, password).await?;
    } else if let Some(token) = &config.token {
        client.set_token(token)?;
    }

    let mut data = CollectedData::default();

    if config.since_leak_period {
        data.previous_period = fetch_leak_period(&client, &config.sonar_component).await?;
    }

    if config.quality_gate_status {
        data.quality_gate_status = Some(fetch_quality_gate(&client, config).await?);
    }

    let measure_set = measures::collect(&client, &config.sonar_component).await?;
    data.measures = measure_set.measures;
    data.languages = measure_set.languages;

    data.rules = rules::collect(&client, config, &filters, &data.languages).await?;
    data.issues = issues::collect(&client, config, &filters, &data.languages, &data.rules).await?;

    // Dedicated hotspot and duplication phases exist only on >= 8.0 servers
    // and are skipped entirely when hotspot reporting is disabled.
    if epoch.has_dedicated_hotspots() && !config.no_security_hotspot {
        data.hotspots = hotspots::collect(&client, config).await?;
        data.duplications = duplications::collect(&client, config).await?;
    }

    Ok(assembler::assemble(config, data))
}

/// The server-defined leak period setting, recorded for the report header.
async fn fetch_leak_period(client: &SonarClient, component: &str) -> Result<String, ReportError> {
    let context = "getting leak period";
    let path = format!("/api/settings/values?component={component}&keys=sonar.leak.period");
    let response: SettingsValuesResponse = client.get_json(&path, context).await?;

    response
        .settings
        .into_iter()
        .next()
        .and_then(|setting| setting.value)
        .ok_or_else(|| ReportError::MalformedResponse {
            context,
            message: "no sonar.leak.period setting returned".to_string(),
        })
}

async fn fetch_quality_gate(
    client: &SonarClient,
    config: &Config,
) -> Result<QualityGateStatus, ReportError> {
    let mut qualifier = String::new();
    if let Some(branch) = &config.branch {
        qualifier = format!("&branch={branch}");
    } else if let Some(pr) = &config.pull_request {
        qualifier = format!("&pullRequest={pr}");
    }

    let path = format!(
        "/api/qualitygates/project_status?projectKey={}{qualifier}",
        config.sonar_component
    );
    let response: ProjectStatusResponse = client
        .get_json(&path, "getting quality gate status")
        .await?;

    let mut status = response.project_status;
    // Metric keys are displayed verbatim downstream; make them readable.
    for condition in &mut status.conditions {
        condition.metric_key = condition.metric_key.replace('_', " ");
    }
    Ok(status)
}
