use std::env;
use std::fs;
use std::path::Path;

use foodshop_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let catalog_path = config
        .catalog
        .path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<builtin>".to_string());

    let entries = [
        (
            "storage.backend",
            format!("{:?}", config.storage.backend),
            source("storage.backend", &["FOODSHOP_STORAGE_BACKEND"]),
        ),
        (
            "storage.path",
            config.storage.path.display().to_string(),
            source("storage.path", &["FOODSHOP_STORAGE_PATH"]),
        ),
        (
            "storage.database_url",
            config.storage.database_url.clone(),
            source("storage.database_url", &["FOODSHOP_STORAGE_DATABASE_URL"]),
        ),
        (
            "storage.max_connections",
            config.storage.max_connections.to_string(),
            source("storage.max_connections", &["FOODSHOP_STORAGE_MAX_CONNECTIONS"]),
        ),
        (
            "storage.timeout_secs",
            config.storage.timeout_secs.to_string(),
            source("storage.timeout_secs", &["FOODSHOP_STORAGE_TIMEOUT_SECS"]),
        ),
        (
            "storage.cart_key",
            config.storage.cart_key.clone(),
            source("storage.cart_key", &["FOODSHOP_STORAGE_CART_KEY"]),
        ),
        ("catalog.path", catalog_path, source("catalog.path", &["FOODSHOP_CATALOG_PATH"])),
        (
            "messaging.base_url",
            config.messaging.base_url.clone(),
            source("messaging.base_url", &["FOODSHOP_MESSAGING_BASE_URL"]),
        ),
        (
            "messaging.recipient",
            mask_recipient(&config.messaging.recipient),
            source("messaging.recipient", &["FOODSHOP_MESSAGING_RECIPIENT"]),
        ),
        (
            "currency.symbol",
            config.currency.symbol.clone(),
            source("currency.symbol", &["FOODSHOP_CURRENCY_SYMBOL"]),
        ),
        (
            "logging.level",
            config.logging.level.clone(),
            source("logging.level", &["FOODSHOP_LOGGING_LEVEL", "FOODSHOP_LOG_LEVEL"]),
        ),
        (
            "logging.format",
            format!("{:?}", config.logging.format),
            source("logging.format", &["FOODSHOP_LOGGING_FORMAT", "FOODSHOP_LOG_FORMAT"]),
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    lines.extend(entries.iter().map(|(key, value, source)| render_line(key, value, source)));
    lines.join("\n")
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: &str) -> String {
    format!("- {key} = {value} (source: {source})")
}

/// Keeps the country prefix and the last two digits of a phone number.
fn mask_recipient(recipient: &str) -> String {
    let digits: Vec<char> = recipient.chars().collect();
    if digits.len() <= 5 {
        return "***".to_string();
    }
    let head: String = digits[..3].iter().collect();
    let tail: String = digits[digits.len() - 2..].iter().collect();
    format!("{head}***{tail}")
}

#[cfg(test)]
mod tests {
    use super::{contains_path, mask_recipient};

    #[test]
    fn recipient_is_masked() {
        assert_eq!(mask_recipient("2349131557676"), "234***76");
        assert_eq!(mask_recipient("12345"), "***");
    }

    #[test]
    fn nested_key_lookup() {
        let doc: toml::Value = "[storage]\nbackend = \"file\"\n".parse().expect("toml");

        assert!(contains_path(&doc, "storage.backend"));
        assert!(!contains_path(&doc, "storage.path"));
        assert!(!contains_path(&doc, "logging.level"));
    }
}
