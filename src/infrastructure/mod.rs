//! Infrastructure - SonarQube HTTP client, pagination, and collectors

pub mod client;
pub mod collectors;
pub mod paginator;

pub use client::SonarClient;
