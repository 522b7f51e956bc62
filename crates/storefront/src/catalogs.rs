//! Catalog listing.
//!
//! Catalog descriptors come from a JSON array (`catalogs.json`). The listing
//! shows visible catalogs grouped by category, categories in alphabetical
//! order, catalogs in file order within each category.

use std::path::Path;

use gvcatalogs_core::Catalog;
use thiserror::Error;

/// Errors loading the catalog list.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalogs: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalogs: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Catalogs listed under one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup {
    pub category: String,
    pub catalogs: Vec<Catalog>,
}

/// Load catalog descriptors from a JSON file.
///
/// # Errors
///
/// Returns `CatalogError` if the file cannot be read or is not a JSON array
/// of catalogs.
pub fn load_catalogs(path: &Path) -> Result<Vec<Catalog>, CatalogError> {
    let contents = std::fs::read_to_string(path)?;
    parse_catalogs(&contents)
}

/// Parse catalog descriptors from JSON.
///
/// # Errors
///
/// Returns `CatalogError::Parse` if the JSON is not an array of catalogs.
pub fn parse_catalogs(json: &str) -> Result<Vec<Catalog>, CatalogError> {
    Ok(serde_json::from_str(json)?)
}

/// Group visible catalogs by category, sorted by category name.
#[must_use]
pub fn group_by_category(catalogs: &[Catalog]) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();
    for catalog in catalogs.iter().filter(|c| c.visible) {
        let category = catalog.category_label();
        match groups.iter_mut().find(|g| g.category == category) {
            Some(group) => group.catalogs.push(catalog.clone()),
            None => groups.push(CategoryGroup {
                category: category.to_string(),
                catalogs: vec![catalog.clone()],
            }),
        }
    }
    groups.sort_by(|a, b| a.category.cmp(&b.category));
    groups
}
