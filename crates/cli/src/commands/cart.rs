use foodshop_core::config::AppConfig;
use foodshop_core::{ApplicationError, CartError, ProductId};

use crate::commands::{with_session, CartView, CommandResult, Session};

pub fn show() -> CommandResult {
    with_session("cart", |session, config| {
        let message = if session.is_empty() {
            "Your cart is empty".to_string()
        } else {
            format!("Total: {}", config.price_format().format(session.total_price()))
        };
        CommandResult::success_with("cart", message, CartView::of(session, &config.price_format()))
    })
}

pub fn add(product_id: u32) -> CommandResult {
    with_session("add", |session, config| {
        let product_id = ProductId(product_id);
        match session.add(product_id) {
            Ok(true) => mutation_result("add", "Item added to cart", session, config),
            Ok(false) => CommandResult::from_error(
                "add",
                &ApplicationError::ProductNotFound(product_id),
            ),
            Err(error) => persistence_failure("add", error),
        }
    })
}

pub fn add_by_name(name: &str) -> CommandResult {
    with_session("add-by-name", |session, config| match session.add_by_name(name) {
        Ok(Some(_)) => mutation_result("add-by-name", "Item added to cart", session, config),
        Ok(None) => CommandResult::from_error(
            "add-by-name",
            &ApplicationError::ProductNameNotFound(name.to_string()),
        ),
        Err(error) => persistence_failure("add-by-name", error),
    })
}

pub fn adjust(product_id: u32, delta: i64) -> CommandResult {
    with_session("qty", |session, config| {
        match session.set_quantity_delta(ProductId(product_id), delta) {
            Ok(true) => mutation_result("qty", "Quantity updated", session, config),
            Ok(false) => mutation_result(
                "qty",
                format!("No cart line for product {product_id}; nothing changed"),
                session,
                config,
            ),
            Err(error) => persistence_failure("qty", error),
        }
    })
}

pub fn remove(product_id: u32) -> CommandResult {
    with_session("remove", |session, config| match session.remove(ProductId(product_id)) {
        Ok(true) => mutation_result("remove", "Item removed from cart", session, config),
        Ok(false) => mutation_result(
            "remove",
            format!("No cart line for product {product_id}; nothing changed"),
            session,
            config,
        ),
        Err(error) => persistence_failure("remove", error),
    })
}

pub fn clear() -> CommandResult {
    with_session("clear", |session, config| match session.clear() {
        Ok(true) => mutation_result("clear", "Cart cleared", session, config),
        Ok(false) => mutation_result("clear", "Cart is already empty", session, config),
        Err(error) => persistence_failure("clear", error),
    })
}

fn mutation_result(
    command: &str,
    message: impl Into<String>,
    session: &Session,
    config: &AppConfig,
) -> CommandResult {
    CommandResult::success_with(command, message, CartView::of(session, &config.price_format()))
}

fn persistence_failure(command: &str, error: CartError) -> CommandResult {
    CommandResult::from_error(command, &ApplicationError::Cart(error))
}
