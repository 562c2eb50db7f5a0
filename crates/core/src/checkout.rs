use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::cart::CartLine;
use crate::errors::{CheckoutError, ContactError, HandoffError};
use crate::pricing::{self, PriceFormat};

pub const DEFAULT_MESSAGING_BASE_URL: &str = "https://wa.me";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryLine {
    pub name: String,
    pub quantity: u32,
}

/// A read-only order description built from the cart at checkout time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSummary {
    pub lines: Vec<SummaryLine>,
    pub total_quantity: u64,
    pub total_price: u64,
}

impl CheckoutSummary {
    /// Refuses a cart whose total is zero.
    pub fn from_lines(lines: &[CartLine]) -> Result<Self, CheckoutError> {
        let total_price = pricing::total_price(lines);
        if total_price == 0 {
            return Err(CheckoutError::EmptyCart);
        }

        Ok(Self {
            lines: lines
                .iter()
                .map(|line| SummaryLine { name: line.name.clone(), quantity: line.quantity })
                .collect(),
            total_quantity: pricing::total_quantity(lines),
            total_price,
        })
    }

    pub fn message(&self, format: &PriceFormat) -> String {
        let items = self
            .lines
            .iter()
            .map(|line| format!("{} x{}", line.name, line.quantity))
            .collect::<Vec<_>>()
            .join(", ");
        format!("Order: {items}\nTotal: {}", format.format(self.total_price))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactMessage {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self, ContactError> {
        let contact = Self {
            name: name.into().trim().to_string(),
            email: email.into().trim().to_string(),
            message: message.into().trim().to_string(),
        };

        let missing = [
            ("name", contact.name.is_empty()),
            ("email", contact.email.is_empty()),
            ("message", contact.message.is_empty()),
        ]
        .into_iter()
        .filter_map(|(field, empty)| empty.then_some(field))
        .collect::<Vec<_>>();

        if !missing.is_empty() {
            return Err(ContactError::MissingFields(missing));
        }
        Ok(contact)
    }

    pub fn text(&self) -> String {
        format!("Name: {}\nEmail: {}\nMessage: {}", self.name, self.email, self.message)
    }
}

/// Deep link into the external messaging channel that receives orders and
/// enquiries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessagingLink {
    base_url: String,
    recipient: String,
}

impl MessagingLink {
    pub fn new(base_url: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), recipient: recipient.into() }
    }

    pub fn profile_url(&self) -> Result<Url, HandoffError> {
        let raw = format!("{}/{}", self.base_url.trim_end_matches('/'), self.recipient);
        Url::parse(&raw).map_err(|error| HandoffError::InvalidLink(format!("{raw}: {error}")))
    }

    pub fn with_text(&self, text: &str) -> Result<Url, HandoffError> {
        let mut url = self.profile_url()?;
        url.query_pairs_mut().append_pair("text", text);
        Ok(url)
    }
}
