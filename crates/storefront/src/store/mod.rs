//! Cart persistence.
//!
//! [`CartStore`] owns the canonical cart. Every operation reads the blob from
//! its [`BlobStore`], applies the mutation, and writes the blob back before
//! returning. Operations that change nothing do not write.
//!
//! The blob is JSON keyed by [`CartKey`]; see `gvcatalogs_core::types::cart`
//! for the format. A blob that fails to parse is treated as an empty cart and
//! is overwritten by the next mutation.

pub mod blob;

use gvcatalogs_core::{
    CART_STORAGE_KEY, Cart, CartError, CartKey, LineItem, MAX_LINE_QUANTITY, Product,
};
use thiserror::Error;
use tracing::{debug, warn};

pub use blob::{BlobStore, FileBlobStore, MemoryBlobStore, StorageError};

/// Errors surfaced by cart mutations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid product: {0}")]
    Cart(#[from] CartError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("failed to serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The cart, persisted through an injected blob store.
#[derive(Debug, Clone)]
pub struct CartStore<S> {
    storage: S,
    key: String,
}

impl<S: BlobStore> CartStore<S> {
    /// Create a cart store persisting under [`CART_STORAGE_KEY`].
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, CART_STORAGE_KEY)
    }

    /// Create a cart store persisting under a custom key.
    #[must_use]
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Get a reference to the underlying blob store.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the cart store, returning the blob store.
    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Storage key the cart lives under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Add one unit of `product` from `catalog_name`.
    ///
    /// An existing line for the same catalog and SKU has its quantity bumped
    /// and keeps its stored name, price, and image. Otherwise a new line with
    /// quantity 1 is appended.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Cart` for a blank SKU or a price outside
    /// `0..=MAX_UNIT_PRICE`, and `StoreError::Storage` if the cart cannot be
    /// written.
    pub fn add_item(&mut self, product: &Product, catalog_name: &str) -> Result<(), StoreError> {
        let item = LineItem::from_product(product, catalog_name)?;
        let key = item.key();
        let mut cart = self.load();

        let quantity = match cart.get(&key).map(|existing| existing.quantity) {
            Some(current) if current >= MAX_LINE_QUANTITY => {
                warn!(cart_key = %key, "Line item already at maximum quantity");
                return Ok(());
            }
            Some(current) => cart.set_quantity(&key, current + 1).unwrap_or(current),
            None => {
                cart.insert(item);
                1
            }
        };

        debug!(cart_key = %key, quantity, "Added item to cart");
        self.save(&cart)
    }

    /// Set the quantity of an existing line.
    ///
    /// A quantity of zero or less removes the line. Quantities above
    /// [`MAX_LINE_QUANTITY`] are clamped. Unknown lines are left alone.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the cart cannot be written.
    pub fn set_quantity(
        &mut self,
        sku: &str,
        catalog_name: &str,
        quantity: i64,
    ) -> Result<(), StoreError> {
        let key = CartKey::new(catalog_name, sku);
        let mut cart = self.load();

        let Some(current) = cart.get(&key).map(|item| item.quantity) else {
            debug!(cart_key = %key, "Quantity update for item not in cart");
            return Ok(());
        };

        if quantity > 0 {
            let clamped = clamp_quantity(quantity);
            if i64::from(clamped) != quantity {
                warn!(cart_key = %key, requested = quantity, clamped, "Quantity clamped");
            }
            if clamped == current {
                return Ok(());
            }
            cart.set_quantity(&key, clamped);
            debug!(cart_key = %key, quantity = clamped, "Updated cart quantity");
        } else {
            cart.remove(&key);
            debug!(cart_key = %key, "Removed item from cart (quantity {quantity})");
        }

        self.save(&cart)
    }

    /// Remove a line from the cart. Unknown lines are left alone.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the cart cannot be written.
    pub fn remove_item(&mut self, sku: &str, catalog_name: &str) -> Result<(), StoreError> {
        let key = CartKey::new(catalog_name, sku);
        let mut cart = self.load();

        if cart.remove(&key).is_none() {
            debug!(cart_key = %key, "Remove for item not in cart");
            return Ok(());
        }

        debug!(cart_key = %key, "Removed item from cart");
        self.save(&cart)
    }

    /// Current cart contents. The returned cart is a copy; mutate through
    /// the store.
    #[must_use]
    pub fn contents(&self) -> Cart {
        self.load()
    }

    /// The raw persisted blob, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the medium cannot be read.
    pub fn blob(&self) -> Result<Option<String>, StoreError> {
        Ok(self.storage.read(&self.key)?)
    }

    fn load(&self) -> Cart {
        match self.storage.read(&self.key) {
            Ok(Some(blob)) => Cart::from_json(&blob).unwrap_or_else(|e| {
                warn!(key = %self.key, error = %e, "Discarding unreadable cart blob");
                Cart::new()
            }),
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read cart, starting empty");
                Cart::new()
            }
        }
    }

    fn save(&mut self, cart: &Cart) -> Result<(), StoreError> {
        let blob = cart.to_json()?;
        self.storage.write(&self.key, &blob)?;
        Ok(())
    }
}

/// Clamp a positive requested quantity into `1..=MAX_LINE_QUANTITY`.
fn clamp_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity)
        .unwrap_or(u32::MAX)
        .clamp(1, MAX_LINE_QUANTITY)
}
