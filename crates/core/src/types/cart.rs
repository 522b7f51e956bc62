//! Cart contents: products, line items, and the cart mapping itself.
//!
//! The JSON produced here is the persisted cart format:
//!
//! ```json
//! {
//!   "Herbs-A1": {
//!     "sku": "A1",
//!     "catalogName": "Herbs",
//!     "name": "Tea",
//!     "price": 500,
//!     "image": "x.png",
//!     "quantity": 3
//!   }
//! }
//! ```

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use super::key::{CartKey, normalize_identifier};

/// Largest quantity a single line item may hold.
pub const MAX_LINE_QUANTITY: u32 = 999;

/// Largest unit price a product may carry.
///
/// Keeps `MAX_UNIT_PRICE * MAX_LINE_QUANTITY` summed over any realistic
/// number of lines far inside `Decimal` range. Prices are stored as exact
/// JSON numbers, so any scale `Decimal` supports round-trips unchanged.
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Errors raised when a product cannot become a line item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("product SKU is empty")]
    EmptySku,
    #[error("product {sku} has a negative price: {price}")]
    NegativePrice { sku: String, price: Decimal },
    #[error("product {sku} price {price} exceeds the maximum of {max}", max = MAX_UNIT_PRICE)]
    PriceTooLarge { sku: String, price: Decimal },
}

/// A product as offered by a catalog page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub sku: String,
    pub name: String,
    #[serde(rename = "price", with = "rust_decimal::serde::arbitrary_precision")]
    pub unit_price: Decimal,
    #[serde(default)]
    pub image: String,
}

impl Product {
    /// Create a new product.
    #[must_use]
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        unit_price: Decimal,
        image: impl Into<String>,
    ) -> Self {
        Self {
            sku: sku.into(),
            name: name.into(),
            unit_price,
            image: image.into(),
        }
    }
}

/// One (catalog, product) entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub sku: String,
    /// Display name of the owning catalog. Blobs written before catalog
    /// names were stored lack this field.
    #[serde(default)]
    pub catalog_name: String,
    pub name: String,
    #[serde(rename = "price", with = "rust_decimal::serde::arbitrary_precision")]
    pub unit_price: Decimal,
    #[serde(default)]
    pub image: String,
    pub quantity: u32,
}

impl LineItem {
    /// Build a quantity-1 line item for a product added from `catalog_name`.
    ///
    /// The SKU and catalog name are normalized; name and image are kept as given.
    ///
    /// # Errors
    ///
    /// Returns `CartError::EmptySku` if the SKU is blank,
    /// `CartError::NegativePrice` if the unit price is below zero, and
    /// `CartError::PriceTooLarge` if it exceeds [`MAX_UNIT_PRICE`].
    pub fn from_product(product: &Product, catalog_name: &str) -> Result<Self, CartError> {
        let sku = normalize_identifier(&product.sku);
        if sku.is_empty() {
            return Err(CartError::EmptySku);
        }
        if product.unit_price.is_sign_negative() && !product.unit_price.is_zero() {
            return Err(CartError::NegativePrice {
                sku,
                price: product.unit_price,
            });
        }
        if product.unit_price > MAX_UNIT_PRICE {
            return Err(CartError::PriceTooLarge {
                sku,
                price: product.unit_price,
            });
        }

        Ok(Self {
            sku,
            catalog_name: normalize_identifier(catalog_name),
            name: product.name.clone(),
            unit_price: product.unit_price,
            image: product.image.clone(),
            quantity: 1,
        })
    }

    /// Identity of this line within a cart.
    #[must_use]
    pub fn key(&self) -> CartKey {
        CartKey::new(&self.catalog_name, &self.sku)
    }

    /// Unit price times quantity, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price.saturating_mul(Decimal::from(self.quantity))
    }

    fn has_valid_price(&self) -> bool {
        (self.unit_price.is_zero() || !self.unit_price.is_sign_negative())
            && self.unit_price <= MAX_UNIT_PRICE
    }
}

/// The cart: line items keyed by [`CartKey`], in insertion order.
///
/// Deserialization re-derives every key from the item's own fields, so a
/// blob written under another key scheme still resolves to the lines the
/// item fields describe. Lines that collapse onto the same key are merged;
/// lines with a zero quantity or a price [`LineItem::from_product`] would
/// reject are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: IndexMap<CartKey, LineItem>,
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, LineItem>::deserialize(deserializer)?;
        Ok(raw.into_values().collect())
    }
}

impl FromIterator<LineItem> for Cart {
    fn from_iter<I: IntoIterator<Item = LineItem>>(iter: I) -> Self {
        let mut cart = Self::new();
        for mut item in iter {
            item.sku = normalize_identifier(&item.sku);
            item.catalog_name = normalize_identifier(&item.catalog_name);
            if item.quantity == 0 || !item.has_valid_price() {
                continue;
            }
            let key = item.key();
            match cart.items.get_mut(&key) {
                Some(existing) => {
                    existing.quantity = existing
                        .quantity
                        .saturating_add(item.quantity)
                        .min(MAX_LINE_QUANTITY);
                }
                None => {
                    item.quantity = item.quantity.min(MAX_LINE_QUANTITY);
                    cart.items.insert(key, item);
                }
            }
        }
        cart
    }
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a persisted cart blob.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the blob is not a valid cart.
    pub fn from_json(blob: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(blob)
    }

    /// Serialize the cart into its persisted form.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn get(&self, key: &CartKey) -> Option<&LineItem> {
        self.items.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &CartKey) -> bool {
        self.items.contains_key(key)
    }

    /// Insert a line item under its own key, replacing any existing entry.
    ///
    /// Items with a zero quantity are not inserted and quantities above
    /// [`MAX_LINE_QUANTITY`] are clamped. Returns whether the item was
    /// inserted.
    pub fn insert(&mut self, mut item: LineItem) -> bool {
        if item.quantity == 0 {
            return false;
        }
        item.quantity = item.quantity.min(MAX_LINE_QUANTITY);
        self.items.insert(item.key(), item);
        true
    }

    /// Set the quantity of an existing line. Zero removes the line and
    /// quantities above [`MAX_LINE_QUANTITY`] are clamped.
    ///
    /// Returns the stored quantity (0 once removed), or `None` if the line
    /// is not in the cart.
    pub fn set_quantity(&mut self, key: &CartKey, quantity: u32) -> Option<u32> {
        if quantity == 0 {
            return self.remove(key).map(|_| 0);
        }
        let item = self.items.get_mut(key)?;
        item.quantity = quantity.min(MAX_LINE_QUANTITY);
        Some(item.quantity)
    }

    /// Remove a line item, keeping the order of the remaining ones.
    pub fn remove(&mut self, key: &CartKey) -> Option<LineItem> {
        self.items.shift_remove(key)
    }

    /// Iterate over line items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&CartKey, &LineItem)> {
        self.items.iter()
    }

    /// Iterate over line items in insertion order, without keys.
    pub fn items(&self) -> impl Iterator<Item = &LineItem> {
        self.items.values()
    }

    /// Sum of every line's subtotal, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items
            .values()
            .map(LineItem::subtotal)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.values().map(|item| u64::from(item.quantity)).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tea() -> Product {
        Product::new("A1", "Tea", Decimal::from(500), "x.png")
    }

    #[test]
    fn test_from_product_normalizes_identifiers() {
        let product = Product::new("  A1 ", "Tea", Decimal::from(500), "x.png");
        let item = LineItem::from_product(&product, " Herbs ").unwrap();
        assert_eq!(item.sku, "A1");
        assert_eq!(item.catalog_name, "Herbs");
        assert_eq!(item.quantity, 1);
        assert_eq!(item.key(), CartKey::new("Herbs", "A1"));
    }

    #[test]
    fn test_from_product_rejects_blank_sku() {
        let product = Product::new("   ", "Tea", Decimal::from(500), "x.png");
        assert_eq!(
            LineItem::from_product(&product, "Herbs"),
            Err(CartError::EmptySku)
        );
    }

    #[test]
    fn test_from_product_rejects_negative_price() {
        let product = Product::new("A1", "Tea", Decimal::from(-1), "x.png");
        assert!(matches!(
            LineItem::from_product(&product, "Herbs"),
            Err(CartError::NegativePrice { .. })
        ));
    }

    #[test]
    fn test_from_product_allows_free_items() {
        let product = Product::new("A1", "Sample", Decimal::ZERO, "x.png");
        assert!(LineItem::from_product(&product, "Herbs").is_ok());
    }

    #[test]
    fn test_subtotal() {
        let mut item = LineItem::from_product(&tea(), "Herbs").unwrap();
        item.quantity = 3;
        assert_eq!(item.subtotal(), Decimal::from(1500));
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut cart = Cart::new();
        for sku in ["A1", "B2", "C3"] {
            let product = Product::new(sku, sku, Decimal::ONE, "");
            cart.insert(LineItem::from_product(&product, "Herbs").unwrap());
        }
        cart.remove(&CartKey::new("Herbs", "B2"));

        let skus: Vec<_> = cart.items().map(|item| item.sku.as_str()).collect();
        assert_eq!(skus, vec!["A1", "C3"]);
    }

    #[test]
    fn test_total_and_item_count() {
        let mut cart = Cart::new();
        let mut tea = LineItem::from_product(&tea(), "Herbs").unwrap();
        tea.quantity = 2;
        cart.insert(tea);
        let oil = Product::new("B7", "Oil", Decimal::new(24_950, 2), "oil.png");
        cart.insert(LineItem::from_product(&oil, "Oils").unwrap());

        assert_eq!(cart.total(), Decimal::new(124_950, 2));
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_json_field_names() {
        let mut cart = Cart::new();
        cart.insert(LineItem::from_product(&tea(), "Herbs").unwrap());
        let value: serde_json::Value = serde_json::from_str(&cart.to_json().unwrap()).unwrap();

        let item = &value["Herbs-A1"];
        assert_eq!(item["sku"], "A1");
        assert_eq!(item["catalogName"], "Herbs");
        assert_eq!(item["name"], "Tea");
        assert_eq!(item["image"], "x.png");
        assert_eq!(item["quantity"], 1);
        assert!(item["price"].is_number());
    }

    #[test]
    fn test_parses_legacy_blob() {
        // Older blobs carry a catalogId and integer prices, and may lack catalogName.
        let blob = r#"{
            "cat7-A1": {"sku": "A1", "catalogId": "cat7", "name": "Tea", "price": 500, "image": "x.png", "quantity": 2}
        }"#;
        let cart = Cart::from_json(blob).unwrap();
        let (key, item) = cart.iter().next().unwrap();
        assert_eq!(key.as_str(), "-A1");
        assert_eq!(item.catalog_name, "");
        assert_eq!(item.unit_price, Decimal::from(500));
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn test_parses_fractional_price() {
        let blob = r#"{"Herbs-A1": {"sku": "A1", "catalogName": "Herbs", "name": "Tea", "price": 249.5, "image": "", "quantity": 1}}"#;
        let cart = Cart::from_json(blob).unwrap();
        assert_eq!(cart.total(), Decimal::new(2495, 1));
    }

    #[test]
    fn test_parse_merges_colliding_lines_and_drops_empty_ones() {
        let blob = r#"{
            "Herbs-A1": {"sku": "A1", "catalogName": "Herbs", "name": "Tea", "price": 500, "quantity": 2},
            " Herbs-A1 ": {"sku": " A1 ", "catalogName": " Herbs", "name": "Tea", "price": 500, "quantity": 3},
            "Herbs-Z9": {"sku": "Z9", "catalogName": "Herbs", "name": "Gone", "price": 10, "quantity": 0}
        }"#;
        let cart = Cart::from_json(blob).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(&CartKey::new("Herbs", "A1")).unwrap().quantity, 5);
    }

    #[test]
    fn test_from_product_rejects_price_above_ceiling() {
        let at_ceiling = Product::new("A1", "Tea", MAX_UNIT_PRICE, "x.png");
        assert!(LineItem::from_product(&at_ceiling, "Herbs").is_ok());

        let price: Decimal = "40000000000000000000000000000".parse().unwrap();
        let huge = Product::new("A1", "Tea", price, "x.png");
        assert!(matches!(
            LineItem::from_product(&huge, "Herbs"),
            Err(CartError::PriceTooLarge { .. })
        ));
    }

    #[test]
    fn test_subtotal_and_total_saturate_instead_of_overflowing() {
        let mut item = LineItem::from_product(&tea(), "Herbs").unwrap();
        item.unit_price = Decimal::MAX;
        item.quantity = 2;
        assert_eq!(item.subtotal(), Decimal::MAX);

        let mut cart = Cart::new();
        cart.insert(item.clone());
        item.catalog_name = "Teas".to_string();
        cart.insert(item);
        assert_eq!(cart.total(), Decimal::MAX);
    }

    #[test]
    fn test_parse_drops_lines_with_out_of_range_prices() {
        let blob = r#"{
            "Herbs-A1": {"sku": "A1", "catalogName": "Herbs", "name": "Tea", "price": 500, "quantity": 1},
            "Herbs-B2": {"sku": "B2", "catalogName": "Herbs", "name": "Huge", "price": 40000000000000000000000000000, "quantity": 2},
            "Herbs-C3": {"sku": "C3", "catalogName": "Herbs", "name": "Refund", "price": -5, "quantity": 1}
        }"#;
        let cart = Cart::from_json(blob).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total(), Decimal::from(500));
    }

    #[test]
    fn test_high_precision_price_survives_round_trip() {
        let price: Decimal = "123456789.123456789".parse().unwrap();
        let mut cart = Cart::new();
        cart.insert(LineItem::from_product(&Product::new("A1", "Tea", price, ""), "Herbs").unwrap());

        let blob = cart.to_json().unwrap();
        assert!(blob.contains(r#""price":123456789.123456789"#));
        let reread = Cart::from_json(&blob).unwrap();
        assert_eq!(reread.items().next().unwrap().unit_price, price);
    }

    #[test]
    fn test_insert_skips_zero_quantity_and_clamps() {
        let mut cart = Cart::new();
        let mut item = LineItem::from_product(&tea(), "Herbs").unwrap();
        item.quantity = 0;
        assert!(!cart.insert(item.clone()));
        assert!(cart.is_empty());

        item.quantity = MAX_LINE_QUANTITY + 50;
        assert!(cart.insert(item));
        assert_eq!(cart.items().next().unwrap().quantity, MAX_LINE_QUANTITY);
    }

    #[test]
    fn test_set_quantity_keeps_lines_positive() {
        let mut cart = Cart::new();
        cart.insert(LineItem::from_product(&tea(), "Herbs").unwrap());
        let key = CartKey::new("Herbs", "A1");

        assert_eq!(cart.set_quantity(&key, 5), Some(5));
        assert_eq!(cart.set_quantity(&key, u32::MAX), Some(MAX_LINE_QUANTITY));
        assert_eq!(cart.set_quantity(&key, 0), Some(0));
        assert!(!cart.contains(&key));
        assert_eq!(cart.set_quantity(&key, 3), None);
    }

    #[test]
    fn test_rejects_malformed_blob() {
        assert!(Cart::from_json("{not json").is_err());
        assert!(Cart::from_json("[1, 2, 3]").is_err());
    }
}
