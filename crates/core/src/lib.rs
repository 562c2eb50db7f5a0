pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod domain;
pub mod errors;
pub mod pricing;
pub mod storage;

pub use cart::{normalize, CartManager, NormalizeReport};
pub use catalog::{Catalog, CatalogError};
pub use checkout::{CheckoutSummary, ContactMessage, MessagingLink, SummaryLine};
pub use domain::cart::CartLine;
pub use domain::product::{Product, ProductId};
pub use errors::{ApplicationError, CartError, CheckoutError, ContactError, HandoffError};
pub use pricing::PriceFormat;
pub use storage::{CartStorage, FileStorage, MemoryStorage, StorageError, DEFAULT_CART_KEY};
