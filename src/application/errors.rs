//! Pipeline error taxonomy
//!
//! Every fetch carries an operation context (`"getting issues"`, ...) so a
//! failure is attributable to exactly one in-flight operation. Transport,
//! HTTP, and decoding faults are always fatal for the run; data-integrity
//! faults are raised where a required cross-reference cannot be resolved.

use thiserror::Error;

/// Fatal faults of the aggregation pipeline.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Network, DNS, or TLS failure before a response was obtained.
    #[error("transport failure while {context}: {source}")]
    Transport {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success status code from the server.
    #[error("server returned HTTP {status} while {context}: {body}")]
    HttpStatus {
        context: &'static str,
        status: u16,
        body: String,
    },

    /// Response body could not be decoded into the expected shape.
    #[error("malformed response while {context}: {message}")]
    MalformedResponse {
        context: &'static str,
        message: String,
    },

    /// A referenced entity (rule, file reference) could not be resolved
    /// where resolution is required.
    #[error("data integrity fault: {0}")]
    DataIntegrity(String),

    /// HTTP client could not be constructed (bad proxy URL, TLS setup).
    #[error("failed to build HTTP client: {0}")]
    ClientSetup(String),
}
