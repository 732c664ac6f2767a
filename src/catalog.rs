//! JSON catalogs of tag declarations.
//!
//! ```json
//! { "tags": ["wammy", ["partial", "incomplete"]] }
//! ```
//!
//! Each entry is a bare tag name or a `[primary, alias...]` group.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::registry::{TagDeclaration, TagRegistry};

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogRecord {
    #[serde(default)]
    tags: Vec<CatalogEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogEntry {
    Single(String),
    Group(Vec<String>),
}

impl From<CatalogEntry> for TagDeclaration {
    fn from(entry: CatalogEntry) -> Self {
        match entry {
            CatalogEntry::Single(name) => TagDeclaration::new(name),
            CatalogEntry::Group(names) => TagDeclaration::from_group(names),
        }
    }
}

/// Parse catalog text into declarations, in file order.
pub fn parse_catalog(text: &str) -> Result<Vec<TagDeclaration>> {
    let record: CatalogRecord =
        serde_json::from_str(text).with_context(|| "failed to parse tag catalog")?;
    Ok(record.tags.into_iter().map(TagDeclaration::from).collect())
}

pub fn load_catalog(path: &Path) -> Result<Vec<TagDeclaration>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read tag catalog {}", path.display()))?;
    parse_catalog(&text).with_context(|| format!("in tag catalog {}", path.display()))
}

/// Declare every tag in the catalog at `path` as one batch.
pub fn apply_catalog(registry: &mut TagRegistry, path: &Path) -> Result<usize> {
    let declarations = load_catalog(path)?;
    let count = declarations.len();
    registry
        .declare_tags(declarations)
        .with_context(|| format!("failed to declare tags from {}", path.display()))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use crate::error::TagError;

    #[test]
    fn parses_names_and_groups() -> Result<()> {
        let declarations = parse_catalog(r#"{"tags": ["wammy", ["partial", "incomplete"], []]}"#)?;
        assert_eq!(
            declarations,
            vec![
                TagDeclaration::new("wammy"),
                TagDeclaration::with_aliases("partial", ["incomplete"]),
                TagDeclaration::new(""),
            ]
        );
        Ok(())
    }

    #[test]
    fn missing_tags_key_is_empty() -> Result<()> {
        assert!(parse_catalog("{}")?.is_empty());
        Ok(())
    }

    #[test]
    fn rejects_malformed_catalogs() {
        assert!(parse_catalog(r#"{"tags": [1]}"#).is_err());
        assert!(parse_catalog(r#"{"tagz": []}"#).is_err());
        assert!(parse_catalog("not json").is_err());
    }

    #[test]
    fn applies_catalog_file() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, r#"{{"tags": ["wammy", ["partial", "incomplete"]]}}"#)?;

        let mut registry = TagRegistry::new();
        assert_eq!(apply_catalog(&mut registry, file.path())?, 2);
        let result = registry.construct("incomplete", "Hello")?;
        assert!(registry.check("partial?", &result)?);
        assert!(registry.check("wammy?", &registry.construct("wammy", 1)?)?);
        Ok(())
    }

    #[test]
    fn conflicting_catalog_keeps_tag_error() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, r#"{{"tags": [["broken", "ok"]]}}"#)?;

        let mut registry = TagRegistry::new();
        let err = apply_catalog(&mut registry, file.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TagError>(),
            Some(TagError::AccessorDefined { .. })
        ));
        assert!(!registry.responds_to("broken"));
        Ok(())
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_catalog(Path::new("/nonexistent/tags.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/tags.json"));
    }
}
