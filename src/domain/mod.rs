//! Domain model - report entities and value objects

pub mod entities;
pub mod report;
pub mod value_objects;

pub use entities::{Duplication, DuplicationBlock, Hotspot, Issue, Language, QualityGateStatus, Rule};
pub use report::{Report, Summary};
pub use value_objects::{FilterBundle, IssueType, ServerEpoch, Severity};
