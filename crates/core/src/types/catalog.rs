//! Catalog descriptors as listed in `catalogs.json`.

use serde::{Deserialize, Serialize};

/// Label used for line items whose catalog name is unknown.
pub const UNKNOWN_CATALOG: &str = "Unknown Catalog";

/// Label used for catalogs without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A browsable product catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Display title, also used as the catalog name on cart lines.
    pub title: String,
    /// Link to the catalog page.
    pub path: String,
    /// Cover image shown on the listing card.
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: Option<String>,
    /// Hidden catalogs stay in the file but are not listed.
    #[serde(default)]
    pub visible: bool,
}

impl Catalog {
    /// Category this catalog is listed under.
    #[must_use]
    pub fn category_label(&self) -> &str {
        match self.category.as_deref().map(str::trim) {
            Some(category) if !category.is_empty() => category,
            _ => UNCATEGORIZED,
        }
    }
}
