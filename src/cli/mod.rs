//! Command-line interface
//!
//! Thin argument surface; everything is normalized into [`crate::Config`]
//! before the pipeline runs.

use clap::Parser;

/// Generate a vulnerability report model from a SonarQube instance.
#[derive(Parser, Debug)]
#[command(
    name = "sonar-report",
    version,
    about = "Generate a vulnerability report from a SonarQube instance",
    long_about = "Queries a SonarQube instance's REST API and aggregates rules, issues, \
                  security hotspots, duplications, and measures into a single report model, \
                  written as JSON on stdout.\n\n\
                  Environment:\n  \
                  http_proxy  proxy to use to reach the SonarQube instance (http://<host>:<port>)"
)]
pub struct Cli {
    /// Base URL of the SonarQube instance to query from
    #[arg(long = "sonarurl")]
    pub sonar_url: String,

    /// Key of the component to query from
    #[arg(long = "sonarcomponent")]
    pub sonar_component: String,

    /// Name of the project, displayed in the report header
    #[arg(long)]
    pub project: Option<String>,

    /// Name of the application, displayed in the report header
    #[arg(long)]
    pub application: Option<String>,

    /// Name of the release, displayed in the report header
    #[arg(long)]
    pub release: Option<String>,

    /// Branch to get the issues for
    #[arg(long)]
    pub branch: Option<String>,

    /// Pull request ID to get the issues/hotspots for
    #[arg(long = "pullrequest")]
    pub pull_request: Option<String>,

    /// Auth username (form authentication, needs --sonarpassword)
    #[arg(long = "sonarusername")]
    pub sonar_username: Option<String>,

    /// Auth password (form authentication)
    #[arg(long = "sonarpassword")]
    pub sonar_password: Option<String>,

    /// Auth token (HTTP Basic with empty password)
    #[arg(long = "sonartoken", env = "SONAR_TOKEN")]
    pub sonar_token: Option<String>,

    /// Name of the sonarcloud.io organization
    #[arg(long = "sonarorganization")]
    pub sonar_organization: Option<String>,

    /// Report only issues introduced since the last leak period
    #[arg(long = "sinceleakperiod")]
    pub since_leak_period: bool,

    /// Report all issue types, not only vulnerabilities
    #[arg(long = "allbugs")]
    pub all_bugs: bool,

    /// Extract rules without a type filter so descriptions always resolve
    #[arg(long = "fix-missing-rule")]
    pub fix_missing_rule: bool,

    /// Disable hotspot reporting (old SonarQube versions without hotspots)
    #[arg(long = "no-security-hotspot")]
    pub no_security_hotspot: bool,

    /// Include the quality-gate status in the report
    #[arg(long = "quality-gate-status")]
    pub quality_gate_status: bool,

    /// Log filter (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
