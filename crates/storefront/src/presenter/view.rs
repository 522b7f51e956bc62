//! Cart view model.
//!
//! [`derive_view_model`] is pure: it turns a [`Cart`] into an
//! [`OrderSummary`] with totals, minimum-order progress, and line items
//! grouped by catalog. [`CartView`] is the same data pre-formatted for
//! templates.

use gvcatalogs_core::{Cart, LineItem, UNKNOWN_CATALOG, format_money};
use rust_decimal::{Decimal, RoundingStrategy};

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Line items from one catalog, in cart order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogGroup {
    pub catalog_name: String,
    pub items: Vec<LineItem>,
}

/// Totals and grouping derived from a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    /// Sum of `unit_price * quantity` over every line.
    pub total: Decimal,
    pub minimum_order: Decimal,
    /// `minimum_order - total`; negative once the minimum is exceeded.
    pub remaining: Decimal,
    /// Progress towards the minimum, in `0..=100`.
    pub percentage: Decimal,
    /// Groups in the order their catalog first appears in the cart.
    pub groups: Vec<CatalogGroup>,
    pub item_count: u64,
}

impl OrderSummary {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Whether the order may be submitted.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.total >= self.minimum_order
    }
}

/// Derive the order summary for `cart` against `minimum_order`.
#[must_use]
pub fn derive_view_model(cart: &Cart, minimum_order: Decimal) -> OrderSummary {
    let total = cart.total();

    let mut groups: Vec<CatalogGroup> = Vec::new();
    for item in cart.items() {
        let name = display_catalog_name(item);
        match groups.iter_mut().find(|group| group.catalog_name == name) {
            Some(group) => group.items.push(item.clone()),
            None => groups.push(CatalogGroup {
                catalog_name: name.to_string(),
                items: vec![item.clone()],
            }),
        }
    }

    OrderSummary {
        total,
        minimum_order,
        remaining: minimum_order - total,
        percentage: progress_percentage(total, minimum_order),
        groups,
        item_count: cart.item_count(),
    }
}

/// Catalog name shown for a line, falling back to [`UNKNOWN_CATALOG`].
#[must_use]
pub fn display_catalog_name(item: &LineItem) -> &str {
    let name = item.catalog_name.trim();
    if name.is_empty() { UNKNOWN_CATALOG } else { name }
}

fn progress_percentage(total: Decimal, minimum_order: Decimal) -> Decimal {
    if minimum_order <= Decimal::ZERO {
        return ONE_HUNDRED;
    }
    total
        .checked_div(minimum_order)
        .and_then(|ratio| ratio.checked_mul(ONE_HUNDRED))
        .unwrap_or(ONE_HUNDRED)
        .clamp(Decimal::ZERO, ONE_HUNDRED)
}

// =============================================================================
// Template View
// =============================================================================

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub sku: String,
    pub catalog_name: String,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Catalog group display data for templates.
#[derive(Debug, Clone)]
pub struct CatalogGroupView {
    pub name: String,
    pub items: Vec<CartItemView>,
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub is_empty: bool,
    pub groups: Vec<CatalogGroupView>,
    pub total: String,
    pub minimum_order: String,
    /// Progress bar width, e.g. "41.67".
    pub progress: String,
    pub status_message: String,
    pub minimum_reached: bool,
    pub can_submit: bool,
    pub item_count: u64,
}

impl From<&OrderSummary> for CartView {
    fn from(summary: &OrderSummary) -> Self {
        let minimum_reached = summary.remaining <= Decimal::ZERO;
        let status_message = if minimum_reached {
            "Minimum order reached! You can place your order.".to_string()
        } else {
            format!(
                "You are {} away from the minimum order of {}.",
                format_money(summary.remaining),
                format_money(summary.minimum_order)
            )
        };

        Self {
            is_empty: summary.is_empty(),
            groups: summary.groups.iter().map(CatalogGroupView::from).collect(),
            total: format_money(summary.total),
            minimum_order: format_money(summary.minimum_order),
            progress: summary
                .percentage
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
                .normalize()
                .to_string(),
            status_message,
            minimum_reached,
            can_submit: summary.can_submit(),
            item_count: summary.item_count,
        }
    }
}

impl From<&CatalogGroup> for CatalogGroupView {
    fn from(group: &CatalogGroup) -> Self {
        Self {
            name: group.catalog_name.clone(),
            items: group.items.iter().map(CartItemView::from).collect(),
        }
    }
}

impl From<&LineItem> for CartItemView {
    fn from(item: &LineItem) -> Self {
        Self {
            sku: item.sku.clone(),
            catalog_name: item.catalog_name.clone(),
            name: item.name.clone(),
            image: item.image.clone(),
            quantity: item.quantity,
            price: format_money(item.unit_price),
            line_price: format_money(item.subtotal()),
        }
    }
}
