pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;

use foodshop_core::config::{AppConfig, LoadOptions, StorageBackend};
use foodshop_core::{
    ApplicationError, CartLine, CartManager, CartStorage, FileStorage, MemoryStorage, PriceFormat,
};
use foodshop_db::SqliteStorage;
use serde::Serialize;
use serde_json::Value;

pub type Session = CartManager<Box<dyn CartStorage>>;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success_with(command: &str, message: impl Into<String>, data: impl Serialize) -> Self {
        let data = serde_json::to_value(data).ok().filter(|value| !value.is_null());
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn from_error(command: &str, error: &ApplicationError) -> Self {
        Self::failure(
            command,
            error.error_class(),
            format!("{} ({error})", error.user_message()),
            error.exit_code(),
        )
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// What a storefront needs to redraw the cart after any operation.
#[derive(Debug, Serialize)]
pub struct CartView<'a> {
    pub lines: &'a [CartLine],
    pub total_quantity: u64,
    pub total_price: u64,
    pub total_display: String,
    pub synced: bool,
}

impl<'a> CartView<'a> {
    pub fn of(session: &'a Session, format: &PriceFormat) -> Self {
        Self {
            lines: session.lines(),
            total_quantity: session.total_quantity(),
            total_price: session.total_price(),
            total_display: format.format(session.total_price()),
            synced: session.is_synced(),
        }
    }
}

pub(crate) fn load_config(command: &str) -> Result<AppConfig, CommandResult> {
    AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandResult::from_error(command, &ApplicationError::Configuration(error))
    })
}

/// Builds the cart for this invocation from the configured catalog and
/// storage backend.
pub(crate) fn open_session(command: &str, config: &AppConfig) -> Result<Session, CommandResult> {
    let catalog = config
        .load_catalog()
        .map_err(|error| CommandResult::from_error(command, &ApplicationError::Catalog(error)))?;

    let storage: Box<dyn CartStorage> = match config.storage.backend {
        StorageBackend::Memory => Box::new(MemoryStorage::new()),
        StorageBackend::File => Box::new(FileStorage::new(config.storage.path.clone())),
        StorageBackend::Sqlite => {
            let storage = SqliteStorage::open(
                &config.storage.database_url,
                config.storage.max_connections,
                config.storage.timeout_secs,
            )
            .map_err(|error| {
                CommandResult::failure(
                    command,
                    "storage",
                    format!("could not open cart storage: {error}"),
                    3,
                )
            })?;
            Box::new(storage)
        }
    };

    Ok(CartManager::load_with_key(catalog, storage, config.storage.cart_key.clone()))
}

pub(crate) fn with_session(
    command: &str,
    action: impl FnOnce(&mut Session, &AppConfig) -> CommandResult,
) -> CommandResult {
    let config = match load_config(command) {
        Ok(config) => config,
        Err(result) => return result,
    };
    let mut session = match open_session(command, &config) {
        Ok(session) => session,
        Err(result) => return result,
    };
    action(&mut session, &config)
}
