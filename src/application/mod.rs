//! Application layer - the aggregation pipeline and its error types

pub mod assembler;
pub mod errors;
pub mod pipeline;

pub use errors::ReportError;
