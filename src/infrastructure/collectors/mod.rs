//! Collectors - one module per resource collection
//!
//! Each collector owns its endpoint's query construction and raw response
//! shape, and normalizes into domain entities. Shared query-fragment helpers
//! live here.

pub mod duplications;
pub mod hotspots;
pub mod issues;
pub mod measures;
pub mod rules;

use crate::domain::entities::Language;

/// `&types=` fragment, empty when unfiltered.
pub(crate) fn types_param(csv: &str) -> String {
    if csv.is_empty() {
        String::new()
    } else {
        format!("&types={csv}")
    }
}

/// `&organization=` fragment for SonarCloud organizations.
pub(crate) fn organization_param(organization: Option<&str>) -> String {
    organization
        .map(|org| format!("&organization={org}"))
        .unwrap_or_default()
}

/// `&languages=` restriction derived from the project's detected languages.
pub(crate) fn languages_param(languages: &[Language]) -> String {
    if languages.is_empty() {
        return String::new();
    }
    let names: Vec<&str> = languages.iter().map(|l| l.name.as_str()).collect();
    format!("&languages={}", names.join(","))
}

/// Branch/pull-request qualifiers shared by the issue and hotspot searches.
pub(crate) fn branch_params(branch: Option<&str>, pull_request: Option<&str>) -> String {
    let mut params = String::new();
    if let Some(pr) = pull_request {
        params.push_str(&format!("&pullRequest={pr}"));
    }
    if let Some(branch) = branch {
        params.push_str(&format!("&branch={branch}"));
    }
    params
}

/// Reduce a component key to the project-relative file path by discarding
/// the `:`-delimited project-key prefix.
pub(crate) fn reduce_component_path(component: &str) -> String {
    component
        .rsplit(':')
        .next()
        .unwrap_or(component)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_path_drops_project_key() {
        assert_eq!(
            reduce_component_path("myproject:src/main/Foo.java"),
            "src/main/Foo.java"
        );
        assert_eq!(reduce_component_path("no-colon-path"), "no-colon-path");
    }

    #[test]
    fn languages_param_joins_names() {
        let languages = vec![
            Language { name: "java".into(), line_count: 10 },
            Language { name: "kotlin".into(), line_count: 20 },
        ];
        assert_eq!(languages_param(&languages), "&languages=java,kotlin");
        assert_eq!(languages_param(&[]), "");
    }

    #[test]
    fn type_and_organization_params() {
        assert_eq!(types_param(""), "");
        assert_eq!(types_param("VULNERABILITY"), "&types=VULNERABILITY");
        assert_eq!(organization_param(None), "");
        assert_eq!(organization_param(Some("acme")), "&organization=acme");
    }

    #[test]
    fn branch_params_compose() {
        assert_eq!(branch_params(None, None), "");
        assert_eq!(branch_params(Some("main"), None), "&branch=main");
        assert_eq!(
            branch_params(Some("main"), Some("42")),
            "&pullRequest=42&branch=main"
        );
    }
}
