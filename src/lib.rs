//! sonar-report - SonarQube vulnerability report aggregation
//!
//! This crate queries a SonarQube instance's REST API and reconciles its
//! paginated, cross-referenced collections into a single [`Report`] model.
//!
//! # Modules
//!
//! - [`config`] — Run configuration built from the command line and environment
//! - [`domain`] — Report model, entities, and value objects
//! - [`application`] — The aggregation pipeline and its error types
//! - [`infrastructure`] — SonarQube HTTP client, paginator, and collectors
//! - [`logging`] — Structured logging with tracing
//!
//! # Pipeline
//!
//! The pipeline is strictly sequential. The server version is fetched first
//! and classified into a behavioral epoch which fixes the query filters for
//! everything downstream; measures, rules, issues, hotspots, and duplications
//! are then collected in order and assembled into the final report:
//!
//! ```text
//! system/status                              -> epoch + filters
//! measures/component                         -> metrics + language distribution
//! rules/search                               -> rule catalog (key -> rule)
//! issues/search                              -> issues (severity backfilled)
//! hotspots/search + hotspots/show            -> hotspots (two-phase)
//! measures/component_tree + duplications/show -> duplications (two-phase)
//! ```
//!
//! Any transport, HTTP, or decoding failure aborts the run; no partial
//! report is ever produced.
//!
//! # Usage
//!
//! ```rust,ignore
//! use sonar_report::{application::pipeline, config::Config};
//!
//! let report = pipeline::run(&config).await?;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;

pub use application::errors::ReportError;
pub use config::Config;
pub use domain::report::Report;
pub use logging::init_tracing;
