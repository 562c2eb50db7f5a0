use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A purchasable item. Prices are whole currency units with no minor part.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub rating: f32,
}

impl Product {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        price: u64,
        description: impl Into<String>,
        image: impl Into<String>,
        rating: f32,
    ) -> Self {
        Self {
            id: ProductId(id),
            name: name.into(),
            price,
            description: description.into(),
            image: image.into(),
            rating,
        }
    }
}
