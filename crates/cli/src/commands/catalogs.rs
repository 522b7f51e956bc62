//! Catalog listing command.

use std::fmt::Write as _;
use std::path::Path;

use gvcatalogs_storefront::catalogs::{CatalogError, group_by_category, load_catalogs};

/// List visible catalogs grouped by category.
///
/// An empty catalog file reports "No catalogs available."; a file whose
/// catalogs are all hidden lists nothing.
///
/// # Errors
///
/// Returns `CatalogError` if the file cannot be read or parsed.
pub fn list(path: &Path) -> Result<String, CatalogError> {
    let catalogs = load_catalogs(path)?;
    let groups = group_by_category(&catalogs);
    tracing::debug!(
        total = catalogs.len(),
        categories = groups.len(),
        "Loaded catalogs"
    );

    if catalogs.is_empty() {
        return Ok("No catalogs available.".to_string());
    }

    let mut out = String::new();
    for group in &groups {
        let _ = writeln!(out, "{}", group.category);
        for catalog in &group.catalogs {
            let _ = writeln!(out, "  {} ({})", catalog.title, catalog.path);
        }
    }
    Ok(out.trim_end().to_string())
}
