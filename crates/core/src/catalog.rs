use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::product::{Product, ProductId};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read catalog file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("product id must be positive (product `{name}`)")]
    InvalidId { name: String },
    #[error("product id {0} appears more than once in the catalog")]
    DuplicateId(ProductId),
}

/// The immutable, ordered list of purchasable products.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if product.id.0 == 0 {
                return Err(CatalogError::InvalidId { name: product.name.clone() });
            }
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
        }

        Ok(Self { products })
    }

    /// The storefront's shipped product range.
    pub fn builtin() -> Self {
        Self {
            products: vec![
                Product::new(
                    1,
                    "Ofada Rice (5kg)",
                    8500,
                    "Premium local rice",
                    "Assets/Items/Ofada rice.JPG",
                    4.8,
                ),
                Product::new(
                    2,
                    "Poundo Yam (2kg)",
                    6800,
                    "Fresh poundo yam",
                    "Assets/Items/Poundo yam.JPG",
                    4.6,
                ),
                Product::new(
                    3,
                    "Ripe Plantain (Bunch)",
                    2200,
                    "Organic ripe plantain",
                    "Assets/Items/Ripe plantain.JPG",
                    4.7,
                ),
                Product::new(
                    4,
                    "Honey Beans (3kg)",
                    7200,
                    "Quality honey beans",
                    "Assets/Items/Honey beans.JPG",
                    4.5,
                ),
                Product::new(
                    5,
                    "Gari (5kg)",
                    8800,
                    "Premium quality gari",
                    "Assets/Items/Gari.jpg",
                    4.9,
                ),
                Product::new(
                    6,
                    "Palm Oil (5L)",
                    11500,
                    "Pure palm oil",
                    "Assets/Items/palm oil.jpg",
                    4.7,
                ),
            ],
        }
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| CatalogError::ReadFile { path: path.to_path_buf(), source })?;
        let file = toml::from_str::<CatalogFile>(&raw)
            .map_err(|source| CatalogError::ParseFile { path: path.to_path_buf(), source })?;
        Self::new(file.products)
    }

    pub fn find(&self, product_id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == product_id)
    }

    /// Exact name lookup. When several products share a name the first one in
    /// catalog order wins.
    pub fn find_by_name(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.name == name)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use crate::domain::product::{Product, ProductId};

    use super::{Catalog, CatalogError};

    #[test]
    fn builtin_catalog_has_unique_positive_ids() {
        let builtin = Catalog::builtin();
        let revalidated = Catalog::new(builtin.products().to_vec()).expect("builtin is valid");

        assert_eq!(revalidated.len(), 6);
        assert_eq!(builtin.find(ProductId(6)).map(|p| p.price), Some(11500));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let error = Catalog::new(vec![
            Product::new(1, "Rice", 100, "", "", 4.0),
            Product::new(1, "Beans", 200, "", "", 4.0),
        ])
        .expect_err("duplicate id should be rejected");

        assert!(matches!(error, CatalogError::DuplicateId(ProductId(1))));
    }

    #[test]
    fn rejects_zero_id() {
        let error = Catalog::new(vec![Product::new(0, "Rice", 100, "", "", 4.0)])
            .expect_err("zero id should be rejected");

        assert!(matches!(error, CatalogError::InvalidId { ref name } if name == "Rice"));
    }

    #[test]
    fn name_lookup_returns_first_match() {
        let catalog = Catalog::new(vec![
            Product::new(7, "Gari (5kg)", 100, "", "first.jpg", 4.0),
            Product::new(8, "Gari (5kg)", 200, "", "second.jpg", 4.0),
        ])
        .expect("valid catalog");

        assert_eq!(catalog.find_by_name("Gari (5kg)").map(|p| p.id), Some(ProductId(7)));
        assert!(catalog.find_by_name("gari (5kg)").is_none());
    }

    #[test]
    fn loads_catalog_from_toml_file() -> Result<(), String> {
        let dir = TempDir::new().map_err(|err| err.to_string())?;
        let path = dir.path().join("catalog.toml");
        fs::write(
            &path,
            r#"
[[products]]
id = 10
name = "Egusi (1kg)"
price = 5400
description = "Ground melon seed"
image = "egusi.jpg"
rating = 4.4

[[products]]
id = 11
name = "Crayfish (500g)"
price = 3900
"#,
        )
        .map_err(|err| err.to_string())?;

        let catalog = Catalog::from_toml_file(&path).map_err(|err| err.to_string())?;

        assert_eq!(catalog.len(), 2);
        let crayfish = catalog.find(ProductId(11)).ok_or("crayfish should resolve")?;
        assert_eq!(crayfish.price, 3900);
        assert!(crayfish.image.is_empty());
        Ok(())
    }
}
