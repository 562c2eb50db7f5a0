use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, CatalogError};
use crate::checkout::{MessagingLink, DEFAULT_MESSAGING_BASE_URL};
use crate::pricing::{PriceFormat, DEFAULT_CURRENCY_SYMBOL};
use crate::storage::DEFAULT_CART_KEY;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub catalog: CatalogConfig,
    pub messaging: MessagingConfig,
    pub currency: CurrencyConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub path: PathBuf,
    pub database_url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
    pub cart_key: String,
}

#[derive(Clone, Debug, Default)]
pub struct CatalogConfig {
    pub path: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct MessagingConfig {
    pub base_url: String,
    pub recipient: String,
}

#[derive(Clone, Debug)]
pub struct CurrencyConfig {
    pub symbol: String,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Memory,
    File,
    Sqlite,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub storage_backend: Option<StorageBackend>,
    pub storage_path: Option<PathBuf>,
    pub database_url: Option<String>,
    pub cart_key: Option<String>,
    pub catalog_path: Option<PathBuf>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                backend: StorageBackend::File,
                path: PathBuf::from(".foodshop"),
                database_url: "sqlite://foodshop.db".to_string(),
                max_connections: 1,
                timeout_secs: 30,
                cart_key: DEFAULT_CART_KEY.to_string(),
            },
            catalog: CatalogConfig::default(),
            messaging: MessagingConfig {
                base_url: DEFAULT_MESSAGING_BASE_URL.to_string(),
                recipient: "2349131557676".to_string(),
            },
            currency: CurrencyConfig { symbol: DEFAULT_CURRENCY_SYMBOL.to_string() },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(ConfigError::Validation(format!(
                "unsupported storage backend `{other}` (expected memory|file|sqlite)"
            ))),
        }
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("foodshop.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    /// The configured catalog file, or the built-in product range.
    pub fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        match &self.catalog.path {
            Some(path) => Catalog::from_toml_file(path),
            None => Ok(Catalog::builtin()),
        }
    }

    pub fn messaging_link(&self) -> MessagingLink {
        MessagingLink::new(self.messaging.base_url.clone(), self.messaging.recipient.clone())
    }

    pub fn price_format(&self) -> PriceFormat {
        PriceFormat::new(self.currency.symbol.clone())
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(storage) = patch.storage {
            if let Some(backend) = storage.backend {
                self.storage.backend = backend;
            }
            if let Some(path) = storage.path {
                self.storage.path = path;
            }
            if let Some(database_url) = storage.database_url {
                self.storage.database_url = database_url;
            }
            if let Some(max_connections) = storage.max_connections {
                self.storage.max_connections = max_connections;
            }
            if let Some(timeout_secs) = storage.timeout_secs {
                self.storage.timeout_secs = timeout_secs;
            }
            if let Some(cart_key) = storage.cart_key {
                self.storage.cart_key = cart_key;
            }
        }

        if let Some(catalog) = patch.catalog {
            if let Some(path) = catalog.path {
                self.catalog.path = Some(path);
            }
        }

        if let Some(messaging) = patch.messaging {
            if let Some(base_url) = messaging.base_url {
                self.messaging.base_url = base_url;
            }
            if let Some(recipient) = messaging.recipient {
                self.messaging.recipient = recipient;
            }
        }

        if let Some(currency) = patch.currency {
            if let Some(symbol) = currency.symbol {
                self.currency.symbol = symbol;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("FOODSHOP_STORAGE_BACKEND") {
            self.storage.backend = value.parse()?;
        }
        if let Some(value) = read_env("FOODSHOP_STORAGE_PATH") {
            self.storage.path = PathBuf::from(value);
        }
        if let Some(value) = read_env("FOODSHOP_STORAGE_DATABASE_URL") {
            self.storage.database_url = value;
        }
        if let Some(value) = read_env("FOODSHOP_STORAGE_MAX_CONNECTIONS") {
            self.storage.max_connections =
                parse_env_number("FOODSHOP_STORAGE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("FOODSHOP_STORAGE_TIMEOUT_SECS") {
            self.storage.timeout_secs =
                parse_env_number("FOODSHOP_STORAGE_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("FOODSHOP_STORAGE_CART_KEY") {
            self.storage.cart_key = value;
        }

        if let Some(value) = read_env("FOODSHOP_CATALOG_PATH") {
            self.catalog.path = Some(PathBuf::from(value));
        }

        if let Some(value) = read_env("FOODSHOP_MESSAGING_BASE_URL") {
            self.messaging.base_url = value;
        }
        if let Some(value) = read_env("FOODSHOP_MESSAGING_RECIPIENT") {
            self.messaging.recipient = value;
        }

        if let Some(value) = read_env("FOODSHOP_CURRENCY_SYMBOL") {
            self.currency.symbol = value;
        }

        let log_level =
            read_env("FOODSHOP_LOGGING_LEVEL").or_else(|| read_env("FOODSHOP_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("FOODSHOP_LOGGING_FORMAT").or_else(|| read_env("FOODSHOP_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(backend) = overrides.storage_backend {
            self.storage.backend = backend;
        }
        if let Some(path) = overrides.storage_path {
            self.storage.path = path;
        }
        if let Some(database_url) = overrides.database_url {
            self.storage.database_url = database_url;
        }
        if let Some(cart_key) = overrides.cart_key {
            self.storage.cart_key = cart_key;
        }
        if let Some(catalog_path) = overrides.catalog_path {
            self.catalog.path = Some(catalog_path);
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_storage(&self.storage)?;
        validate_messaging(&self.messaging)?;
        validate_currency(&self.currency)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("foodshop.toml"), PathBuf::from("config/foodshop.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_storage(storage: &StorageConfig) -> Result<(), ConfigError> {
    let key = storage.cart_key.trim();
    let key_ok = !key.is_empty()
        && key.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    if !key_ok {
        return Err(ConfigError::Validation(
            "storage.cart_key must be non-empty and use only letters, digits, `-` or `_`"
                .to_string(),
        ));
    }

    match storage.backend {
        StorageBackend::Memory => {}
        StorageBackend::File => {
            if storage.path.as_os_str().is_empty() {
                return Err(ConfigError::Validation(
                    "storage.path is required for the file backend".to_string(),
                ));
            }
        }
        StorageBackend::Sqlite => {
            let url = storage.database_url.trim();
            let sqlite_url =
                url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
            if !sqlite_url {
                return Err(ConfigError::Validation(
                    "storage.database_url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                        .to_string(),
                ));
            }

            if storage.max_connections == 0 {
                return Err(ConfigError::Validation(
                    "storage.max_connections must be greater than zero".to_string(),
                ));
            }

            if storage.timeout_secs == 0 || storage.timeout_secs > 300 {
                return Err(ConfigError::Validation(
                    "storage.timeout_secs must be in range 1..=300".to_string(),
                ));
            }
        }
    }

    Ok(())
}

fn validate_messaging(messaging: &MessagingConfig) -> Result<(), ConfigError> {
    let base_url = messaging.base_url.trim();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::Validation(
            "messaging.base_url must start with http:// or https://".to_string(),
        ));
    }

    let recipient = messaging.recipient.trim();
    if recipient.is_empty() || !recipient.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(ConfigError::Validation(
            "messaging.recipient must be an international phone number of digits only (no `+`)"
                .to_string(),
        ));
    }

    Ok(())
}

fn validate_currency(currency: &CurrencyConfig) -> Result<(), ConfigError> {
    if currency.symbol.trim().is_empty() {
        return Err(ConfigError::Validation("currency.symbol must not be empty".to_string()));
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_env_number<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    storage: Option<StoragePatch>,
    catalog: Option<CatalogPatch>,
    messaging: Option<MessagingPatch>,
    currency: Option<CurrencyPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct StoragePatch {
    backend: Option<StorageBackend>,
    path: Option<PathBuf>,
    database_url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
    cart_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct MessagingPatch {
    base_url: Option<String>,
    recipient: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CurrencyPatch {
    symbol: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
