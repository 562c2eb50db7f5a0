use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::domain::product::ProductId;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum CartError {
    #[error("could not encode cart snapshot: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("cart persistence failed: {0}")]
    Persistence(#[from] StorageError),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("checkout requires a non-empty cart")]
    EmptyCart,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ContactError {
    #[error("missing required contact fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HandoffError {
    #[error("messaging link could not be built: {0}")]
    InvalidLink(String),
}

/// Everything a presentation layer may need to report to a shopper.
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Cart(#[from] CartError),
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
    #[error(transparent)]
    Contact(#[from] ContactError),
    #[error(transparent)]
    Handoff(#[from] HandoffError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Configuration(#[from] ConfigError),
    #[error("product {0} is not in the catalog")]
    ProductNotFound(ProductId),
    #[error("no product named `{0}` is in the catalog")]
    ProductNameNotFound(String),
}

impl ApplicationError {
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Cart(CartError::Persistence(_)) => "storage",
            Self::Cart(CartError::Encode(_)) => "encoding",
            Self::Checkout(CheckoutError::EmptyCart) => "empty_cart",
            Self::Contact(ContactError::MissingFields(_)) => "missing_fields",
            Self::Handoff(_) => "handoff",
            Self::Catalog(_) => "catalog",
            Self::Configuration(_) => "config_validation",
            Self::ProductNotFound(_) | Self::ProductNameNotFound(_) => "not_found",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_) | Self::Catalog(_) => 2,
            Self::Cart(_) | Self::Handoff(_) => 3,
            Self::Checkout(_) | Self::Contact(_) => 4,
            Self::ProductNotFound(_) | Self::ProductNameNotFound(_) => 5,
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Checkout(CheckoutError::EmptyCart) => "Cart is empty",
            Self::Contact(ContactError::MissingFields(_)) => "Please fill all fields",
            Self::ProductNotFound(_) | Self::ProductNameNotFound(_) => {
                "That product is no longer available."
            }
            Self::Cart(_) => "Your cart could not be saved. Changes may be lost on reload.",
            Self::Handoff(_) | Self::Catalog(_) | Self::Configuration(_) => {
                "An unexpected internal error occurred."
            }
        }
    }
}
