use foodshop_core::{ApplicationError, PriceFormat, Product, ProductId};
use serde::Serialize;

use crate::commands::{load_config, CommandResult};

#[derive(Debug, Serialize)]
struct ProductCard<'a> {
    #[serde(flatten)]
    product: &'a Product,
    price_display: String,
}

impl<'a> ProductCard<'a> {
    fn new(product: &'a Product, format: &PriceFormat) -> Self {
        Self { product, price_display: format.format(product.price) }
    }
}

pub fn list() -> CommandResult {
    let config = match load_config("catalog") {
        Ok(config) => config,
        Err(result) => return result,
    };
    let catalog = match config.load_catalog() {
        Ok(catalog) => catalog,
        Err(error) => return CommandResult::from_error("catalog", &ApplicationError::Catalog(error)),
    };

    let format = config.price_format();
    let cards: Vec<ProductCard<'_>> =
        catalog.products().iter().map(|product| ProductCard::new(product, &format)).collect();
    CommandResult::success_with("catalog", format!("{} products available", cards.len()), cards)
}

pub fn preview(product_id: u32) -> CommandResult {
    let config = match load_config("preview") {
        Ok(config) => config,
        Err(result) => return result,
    };
    let catalog = match config.load_catalog() {
        Ok(catalog) => catalog,
        Err(error) => return CommandResult::from_error("preview", &ApplicationError::Catalog(error)),
    };

    let product_id = ProductId(product_id);
    match catalog.find(product_id) {
        Some(product) => CommandResult::success_with(
            "preview",
            product.name.clone(),
            ProductCard::new(product, &config.price_format()),
        ),
        None => CommandResult::from_error("preview", &ApplicationError::ProductNotFound(product_id)),
    }
}
