pub mod normalize;

use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::checkout::CheckoutSummary;
use crate::domain::cart::CartLine;
use crate::domain::product::ProductId;
use crate::errors::{CartError, CheckoutError};
use crate::pricing;
use crate::storage::{CartStorage, DEFAULT_CART_KEY};

pub use normalize::{normalize, NormalizeReport};

/// Owns the shopper's cart and mirrors every change into durable storage.
///
/// Construct one per session with [`CartManager::load`] and hand it to
/// whatever presents the cart. Mutations apply in memory first; when the
/// storage write fails the in-memory cart still reflects the change and the
/// error is returned so the caller can tell the shopper.
pub struct CartManager<S> {
    catalog: Catalog,
    storage: S,
    key: String,
    lines: Vec<CartLine>,
    synced: bool,
}

impl<S: CartStorage> CartManager<S> {
    pub fn load(catalog: Catalog, storage: S) -> Self {
        Self::load_with_key(catalog, storage, DEFAULT_CART_KEY)
    }

    /// Reads the stored cart, normalizes it against `catalog`, and writes the
    /// normalized result straight back.
    pub fn load_with_key(catalog: Catalog, storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let raw = match storage.read(&key) {
            Ok(raw) => raw,
            Err(error) => {
                warn!(
                    event_name = "cart.load.read_failed",
                    storage_key = %key,
                    error = %error,
                    "stored cart could not be read, starting empty"
                );
                None
            }
        };

        let (lines, report) = normalize(raw.as_deref(), &catalog);
        if report.is_clean() {
            debug!(event_name = "cart.load.clean", lines = lines.len(), "stored cart loaded");
        } else {
            info!(
                event_name = "cart.load.normalized",
                malformed = report.malformed,
                discarded = report.discarded,
                coerced_quantities = report.coerced_quantities,
                merged_duplicates = report.merged_duplicates,
                lines = lines.len(),
                "stored cart repaired during load"
            );
        }

        let mut manager = Self { catalog, storage, key, lines, synced: false };
        // A failed write-back leaves `synced` false; the next mutation retries.
        let _ = manager.persist();
        manager
    }

    /// Adds one unit of `product_id`. Returns `Ok(false)` without touching
    /// storage when the product is not in the catalog.
    pub fn add(&mut self, product_id: ProductId) -> Result<bool, CartError> {
        let Some(product) = self.catalog.find(product_id) else {
            debug!(event_name = "cart.add.unknown_product", product_id = %product_id, "add ignored");
            return Ok(false);
        };

        let quantity = match self.position(product_id) {
            Some(position) => {
                let line = &mut self.lines[position];
                line.quantity = line.quantity.saturating_add(1);
                line.quantity
            }
            None => {
                self.lines.push(CartLine::from_product(product, 1));
                1
            }
        };

        info!(event_name = "cart.line_added", product_id = %product_id, quantity, "item added to cart");
        self.persist()?;
        Ok(true)
    }

    /// Adds one unit of the first catalog product named `name`.
    pub fn add_by_name(&mut self, name: &str) -> Result<Option<ProductId>, CartError> {
        let Some(product_id) = self.catalog.find_by_name(name).map(|product| product.id) else {
            return Ok(None);
        };
        self.add(product_id)?;
        Ok(Some(product_id))
    }

    /// Shifts a line's quantity by `delta`. A result of zero or less deletes
    /// the line. Returns `Ok(false)` when no line exists for `product_id`.
    pub fn set_quantity_delta(
        &mut self,
        product_id: ProductId,
        delta: i64,
    ) -> Result<bool, CartError> {
        let Some(position) = self.position(product_id) else {
            return Ok(false);
        };

        match self.lines[position].adjusted(delta) {
            Some(quantity) => {
                self.lines[position].quantity = quantity;
                info!(
                    event_name = "cart.quantity_changed",
                    product_id = %product_id,
                    delta,
                    quantity,
                    "cart line quantity changed"
                );
            }
            None => {
                self.lines.remove(position);
                info!(
                    event_name = "cart.line_removed",
                    product_id = %product_id,
                    delta,
                    "cart line dropped after quantity reached zero"
                );
            }
        }

        self.persist()?;
        Ok(true)
    }

    pub fn remove(&mut self, product_id: ProductId) -> Result<bool, CartError> {
        let Some(position) = self.position(product_id) else {
            return Ok(false);
        };

        self.lines.remove(position);
        info!(event_name = "cart.line_removed", product_id = %product_id, "item removed from cart");
        self.persist()?;
        Ok(true)
    }

    /// Empties the cart. An already empty cart is left alone and nothing is
    /// written.
    pub fn clear(&mut self) -> Result<bool, CartError> {
        if self.lines.is_empty() {
            return Ok(false);
        }

        let cleared = self.lines.len();
        self.lines.clear();
        info!(event_name = "cart.cleared", cleared_lines = cleared, "cart cleared");
        self.persist()?;
        Ok(true)
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total_quantity(&self) -> u64 {
        pricing::total_quantity(&self.lines)
    }

    pub fn total_price(&self) -> u64 {
        pricing::total_price(&self.lines)
    }

    pub fn checkout_summary(&self) -> Result<CheckoutSummary, CheckoutError> {
        CheckoutSummary::from_lines(&self.lines)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Whether storage holds exactly the in-memory cart.
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    fn persist(&mut self) -> Result<(), CartError> {
        let result = serde_json::to_string(&self.lines)
            .map_err(CartError::from)
            .and_then(|snapshot| self.storage.write(&self.key, &snapshot).map_err(CartError::from));

        self.synced = result.is_ok();
        if let Err(error) = &result {
            warn!(
                event_name = "cart.persist_failed",
                storage_key = %self.key,
                error = %error,
                "cart snapshot was not written"
            );
        }
        result
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines.iter().position(|line| line.product_id == product_id)
    }
}
