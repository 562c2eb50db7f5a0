use foodshop_core::{ApplicationError, CheckoutSummary, ContactMessage};
use serde::Serialize;
use tracing::info;

use crate::commands::{load_config, with_session, CommandResult};

#[derive(Debug, Serialize)]
struct CheckoutHandoff {
    summary: CheckoutSummary,
    text: String,
    link: String,
}

#[derive(Debug, Serialize)]
struct ContactHandoff {
    contact: ContactMessage,
    text: String,
    link: String,
}

/// Formats the order and the messaging deep link that carries it. The cart
/// itself is left as is.
pub fn checkout() -> CommandResult {
    with_session("checkout", |session, config| {
        let summary = match session.checkout_summary() {
            Ok(summary) => summary,
            Err(error) => {
                return CommandResult::from_error("checkout", &ApplicationError::Checkout(error))
            }
        };

        let text = summary.message(&config.price_format());
        let link = match config.messaging_link().with_text(&text) {
            Ok(link) => link,
            Err(error) => {
                return CommandResult::from_error("checkout", &ApplicationError::Handoff(error))
            }
        };

        info!(
            event_name = "checkout.handoff",
            total_price = summary.total_price,
            total_quantity = summary.total_quantity,
            "order handed off to messaging channel"
        );
        CommandResult::success_with(
            "checkout",
            "Order sent to WhatsApp",
            CheckoutHandoff { summary, text, link: link.to_string() },
        )
    })
}

pub fn contact(name: &str, email: &str, message: &str) -> CommandResult {
    let config = match load_config("contact") {
        Ok(config) => config,
        Err(result) => return result,
    };

    let contact = match ContactMessage::new(name, email, message) {
        Ok(contact) => contact,
        Err(error) => return CommandResult::from_error("contact", &ApplicationError::Contact(error)),
    };

    let text = contact.text();
    match config.messaging_link().with_text(&text) {
        Ok(link) => {
            info!(event_name = "contact.handoff", "contact message handed off to messaging channel");
            CommandResult::success_with(
                "contact",
                "Message sent",
                ContactHandoff { contact, text, link: link.to_string() },
            )
        }
        Err(error) => CommandResult::from_error("contact", &ApplicationError::Handoff(error)),
    }
}
