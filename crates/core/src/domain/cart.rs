use serde::{Deserialize, Serialize};

use crate::domain::product::{Product, ProductId};

/// One entry in the cart. Display fields are a snapshot of the product taken
/// when the line was created.
///
/// The serialized shape (`id`, `name`, `price`, `img`, `qty`) is the persisted
/// storage format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    pub name: String,
    pub price: u64,
    #[serde(rename = "img")]
    pub image: String,
    #[serde(rename = "qty")]
    pub quantity: u32,
}

impl CartLine {
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity,
        }
    }

    pub fn line_total(&self) -> u64 {
        self.price.saturating_mul(u64::from(self.quantity))
    }

    /// Applies a signed quantity change. Returns `None` when the line should
    /// be deleted rather than kept at zero or below.
    pub fn adjusted(&self, delta: i64) -> Option<u32> {
        let next = i64::from(self.quantity).saturating_add(delta);
        if next <= 0 {
            return None;
        }
        Some(u32::try_from(next).unwrap_or(u32::MAX))
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::product::Product;

    use super::CartLine;

    fn plantain() -> Product {
        Product::new(3, "Ripe Plantain (Bunch)", 2200, "Organic ripe plantain", "plantain.jpg", 4.7)
    }

    #[test]
    fn snapshot_copies_display_fields_from_product() {
        let line = CartLine::from_product(&plantain(), 1);

        assert_eq!(line.product_id.0, 3);
        assert_eq!(line.name, "Ripe Plantain (Bunch)");
        assert_eq!(line.price, 2200);
        assert_eq!(line.image, "plantain.jpg");
        assert_eq!(line.quantity, 1);
    }

    #[test]
    fn serializes_with_storage_field_names() {
        let line = CartLine::from_product(&plantain(), 2);
        let value = serde_json::to_value(&line).expect("serialize line");

        assert_eq!(value["id"], 3);
        assert_eq!(value["img"], "plantain.jpg");
        assert_eq!(value["qty"], 2);
        assert!(value.get("quantity").is_none());
    }

    #[test]
    fn adjustment_to_zero_or_below_deletes() {
        let line = CartLine::from_product(&plantain(), 1);

        assert_eq!(line.adjusted(1), Some(2));
        assert_eq!(line.adjusted(-1), None);
        assert_eq!(line.adjusted(-5), None);
    }

    #[test]
    fn line_total_multiplies_price_by_quantity() {
        assert_eq!(CartLine::from_product(&plantain(), 3).line_total(), 6600);
    }
}
