//! Cart line identity.
//!
//! A line item is identified by the catalog it was added from and its SKU.
//! Both parts go through [`normalize_identifier`] before they are joined, so
//! `" Herbs "` / `"A1 "` and `"Herbs"` / `"A1"` name the same line.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Separator between the catalog name and the SKU in a [`CartKey`].
pub const KEY_SEPARATOR: char = '-';

/// Canonical form of a catalog name or SKU.
///
/// Every cart operation runs its identifiers through this function, both for
/// key derivation and for the values stored on the line item.
#[must_use]
pub fn normalize_identifier(raw: &str) -> String {
    raw.trim().to_string()
}

/// Composite identity of a line item: `catalogName-sku`.
///
/// Comparison is case sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartKey(String);

impl CartKey {
    /// Derive the key for a catalog name and SKU.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use gvcatalogs_core::CartKey;
    /// let key = CartKey::new("  Herbs ", " A1");
    /// assert_eq!(key.as_str(), "Herbs-A1");
    /// assert_eq!(key, CartKey::new("Herbs", "A1"));
    /// ```
    #[must_use]
    pub fn new(catalog_name: &str, sku: &str) -> Self {
        Self(format!(
            "{}{KEY_SEPARATOR}{}",
            normalize_identifier(catalog_name),
            normalize_identifier(sku)
        ))
    }

    /// Get the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CartKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CartKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_joins_with_separator() {
        assert_eq!(CartKey::new("Herbs", "A1").as_str(), "Herbs-A1");
    }

    #[test]
    fn test_key_ignores_surrounding_whitespace() {
        let variants = [
            CartKey::new("Herbs", "A1"),
            CartKey::new(" Herbs", "A1 "),
            CartKey::new("Herbs\t", "\nA1"),
            CartKey::new("  Herbs  ", "  A1  "),
        ];
        for key in &variants {
            assert_eq!(key, &variants[0]);
        }
    }

    #[test]
    fn test_key_keeps_inner_whitespace_and_case() {
        assert_eq!(CartKey::new("Dry Herbs", "A1").as_str(), "Dry Herbs-A1");
        assert_ne!(CartKey::new("Herbs", "a1"), CartKey::new("Herbs", "A1"));
    }

    #[test]
    fn test_normalize_identifier() {
        assert_eq!(normalize_identifier("  A1 "), "A1");
        assert_eq!(normalize_identifier(""), "");
        assert_eq!(normalize_identifier("   "), "");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let key = CartKey::new("Herbs", "A1");
        assert_eq!(serde_json::to_string(&key).ok().as_deref(), Some("\"Herbs-A1\""));
    }
}
