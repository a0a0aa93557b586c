//! Run configuration
//!
//! Built once from the command line and environment, validated, and shared
//! read-only by the whole pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::Cli;

/// Configuration for one report run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the SonarQube instance, no trailing slash.
    pub sonar_url: String,
    /// Key of the component (project) to report on.
    pub sonar_component: String,
    /// Display name for the report header.
    pub project: Option<String>,
    pub application: Option<String>,
    pub release: Option<String>,
    pub branch: Option<String>,
    pub pull_request: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
    /// SonarCloud organization qualifier.
    pub organization: Option<String>,
    /// Restrict the report to issues introduced since the leak period.
    pub since_leak_period: bool,
    /// Report all issue types, not only vulnerabilities.
    pub all_bugs: bool,
    /// Fetch rules without a type filter so descriptions always resolve.
    pub fix_missing_rule: bool,
    /// Disable hotspot reporting (servers without hotspot support).
    pub no_security_hotspot: bool,
    /// Include the quality-gate snapshot in the report.
    pub quality_gate_status: bool,
    /// Forward proxy URL, taken from the `http_proxy` environment variable.
    pub proxy: Option<String>,
}

impl Config {
    /// Build and validate a configuration from parsed CLI arguments plus
    /// the process environment.
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let proxy = std::env::var("http_proxy")
            .ok()
            .filter(|value| !value.is_empty());

        let config = Self {
            sonar_url: cli.sonar_url.trim_end_matches('/').to_string(),
            sonar_component: cli.sonar_component,
            project: cli.project,
            application: cli.application,
            release: cli.release,
            branch: cli.branch,
            pull_request: cli.pull_request,
            username: cli.sonar_username,
            password: cli.sonar_password,
            token: cli.sonar_token,
            organization: cli.sonar_organization,
            since_leak_period: cli.since_leak_period,
            all_bugs: cli.all_bugs,
            fix_missing_rule: cli.fix_missing_rule,
            no_security_hotspot: cli.no_security_hotspot,
            quality_gate_status: cli.quality_gate_status,
            proxy,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sonar_url.is_empty() {
            return Err(ConfigError::MissingSonarUrl);
        }
        if self.sonar_component.is_empty() {
            return Err(ConfigError::MissingComponent);
        }
        if self.username.is_some() != self.password.is_some() {
            return Err(ConfigError::IncompleteCredentials);
        }
        Ok(())
    }
}

/// Invalid invocation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("a SonarQube base URL is required")]
    MissingSonarUrl,

    #[error("a SonarQube component key is required")]
    MissingComponent,

    #[error("form authentication needs both a username and a password")]
    IncompleteCredentials,
}
