//! Duplication collection (two-phase)
//!
//! Phase 1 pages through the component tree sorted by duplicated-line
//! density, retaining only files whose density is strictly above zero.
//! Phase 2 fetches block-level detail per file and resolves each block
//! against the response's file-reference table.

use serde::Deserialize;

use crate::application::errors::ReportError;
use crate::config::Config;
use crate::domain::entities::{Duplication, DuplicationBlock};
use crate::infrastructure::client::SonarClient;
use crate::infrastructure::paginator::{fetch_all_pages, PAGE_SIZE};

#[derive(Debug, Deserialize)]
struct ComponentTreeResponse {
    #[serde(default)]
    components: Vec<TreeComponent>,
}

#[derive(Debug, Deserialize)]
struct TreeComponent {
    key: String,
    #[serde(default)]
    measures: Vec<TreeMeasure>,
}

#[derive(Debug, Deserialize)]
struct TreeMeasure {
    #[serde(default)]
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DuplicationsShowResponse {
    #[serde(default)]
    duplications: Vec<DuplicationGroup>,
    files: FileTable,
}

#[derive(Debug, Deserialize)]
struct DuplicationGroup {
    #[serde(default)]
    blocks: Vec<RawBlock>,
}

#[derive(Debug, Deserialize)]
struct RawBlock {
    #[serde(rename = "_ref")]
    file_ref: FileRefId,
    from: u64,
    size: u64,
}

/// Block file references arrive as numbers or strings depending on server
/// version; the table itself is either an index-addressed list or a
/// ref-keyed object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FileRefId {
    Index(u64),
    Key(String),
}

impl std::fmt::Display for FileRefId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Key(k) => write!(f, "{k}"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FileTable {
    List(Vec<FileRef>),
    Map(std::collections::BTreeMap<String, FileRef>),
}

#[derive(Debug, Deserialize)]
struct FileRef {
    name: String,
}

impl FileTable {
    fn resolve(&self, id: &FileRefId) -> Option<&str> {
        match (self, id) {
            (Self::List(files), FileRefId::Index(i)) => {
                files.get(*i as usize).map(|f| f.name.as_str())
            }
            (Self::List(files), FileRefId::Key(k)) => k
                .parse::<usize>()
                .ok()
                .and_then(|i| files.get(i))
                .map(|f| f.name.as_str()),
            (Self::Map(files), FileRefId::Key(k)) => files.get(k).map(|f| f.name.as_str()),
            (Self::Map(files), FileRefId::Index(i)) => {
                files.get(&i.to_string()).map(|f| f.name.as_str())
            }
        }
    }
}

/// Collect block-level duplication detail for every file with non-zero
/// duplicated-line density.
pub async fn collect(client: &SonarClient, config: &Config) -> Result<Vec<Duplication>, ReportError> {
    let keys = list_duplicated_files(client, &config.sonar_component).await?;
    tracing::debug!(count = keys.len(), "files with duplicated lines listed");

    let mut duplications = Vec::new();
    for key in keys {
        let path = format!("/api/duplications/show?key={key}");
        let response: DuplicationsShowResponse = client
            .get_json(&path, "getting duplication details")
            .await?;

        for group in response.duplications {
            let mut blocks = Vec::with_capacity(group.blocks.len());
            for block in group.blocks {
                let file = response.files.resolve(&block.file_ref).ok_or_else(|| {
                    ReportError::DataIntegrity(format!(
                        "duplication block in {} references unknown file ref {}",
                        key, block.file_ref
                    ))
                })?;
                blocks.push(DuplicationBlock {
                    line: block.from,
                    size: block.size,
                    file: file.to_string(),
                });
            }
            duplications.push(Duplication {
                key: key.clone(),
                blocks,
            });
        }
    }
    Ok(duplications)
}

/// Phase 1: component keys whose duplicated-line density is strictly > 0.
async fn list_duplicated_files(
    client: &SonarClient,
    component: &str,
) -> Result<Vec<String>, ReportError> {
    let components = fetch_all_pages(|page| {
        let path = format!(
            "/api/measures/component_tree?component={component}&ps={PAGE_SIZE}&p={page}\
             &asc=false&metricSort=duplicated_lines_density&s=metric\
             &metricSortFilter=withMeasuresOnly\
             &metricKeys=duplicated_lines_density,duplicated_lines&strategy=leaves"
        );
        async move {
            client
                .get_json::<ComponentTreeResponse>(&path, "getting duplication candidates")
                .await
                .map(|response| response.components)
        }
    })
    .await?;

    Ok(components
        .into_iter()
        .filter(|c| {
            c.measures
                .first()
                .and_then(|m| m.value.as_deref())
                .and_then(|v| v.parse::<f64>().ok())
                .is_some_and(|density| density > 0.0)
        })
        .map(|c| c.key)
        .collect())
}
