use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::ExposeSecret;
use toml::Value;

use yardage_core::config::{AppConfig, LoadOptions};

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let doc = config_file_doc.as_ref();
    let file = config_file_path.as_deref();

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    let fields: Vec<(&str, String, Option<&str>)> = vec![
        ("database.url", config.database.url.clone(), Some("YARDAGE_DATABASE_URL")),
        (
            "database.max_connections",
            config.database.max_connections.to_string(),
            Some("YARDAGE_DATABASE_MAX_CONNECTIONS"),
        ),
        (
            "database.timeout_secs",
            config.database.timeout_secs.to_string(),
            Some("YARDAGE_DATABASE_TIMEOUT_SECS"),
        ),
        (
            "catalog.backend",
            format!("{:?}", config.catalog.backend).to_lowercase(),
            Some("YARDAGE_CATALOG_BACKEND"),
        ),
        (
            "catalog.file_path",
            config.catalog.file_path.display().to_string(),
            Some("YARDAGE_CATALOG_FILE_PATH"),
        ),
        ("catalog.id_prefix", config.catalog.id_prefix.clone(), Some("YARDAGE_CATALOG_ID_PREFIX")),
        (
            "admin.secret",
            redact_secret(config.admin.secret.expose_secret()),
            Some("YARDAGE_ADMIN_SECRET"),
        ),
        (
            "checkout.price_per_yard",
            config.checkout.price_per_yard.to_string(),
            Some("YARDAGE_CHECKOUT_PRICE_PER_YARD"),
        ),
        ("checkout.currency", config.checkout.currency.clone(), Some("YARDAGE_CHECKOUT_CURRENCY")),
        (
            "checkout.messaging.domain",
            config.checkout.messaging.domain.clone(),
            Some("YARDAGE_MESSAGING_DOMAIN"),
        ),
        (
            "checkout.messaging.recipient",
            config.checkout.messaging.recipient.clone(),
            Some("YARDAGE_MESSAGING_RECIPIENT"),
        ),
        (
            "checkout.payment.enabled",
            config.checkout.payment.enabled.to_string(),
            Some("YARDAGE_PAYMENT_ENABLED"),
        ),
        (
            "checkout.payment.public_key",
            config.checkout.payment.public_key.clone(),
            Some("YARDAGE_PAYMENT_PUBLIC_KEY"),
        ),
        (
            "checkout.payment.secret_key",
            redact_secret(config.checkout.payment.secret_key.expose_secret()),
            Some("YARDAGE_PAYMENT_SECRET_KEY"),
        ),
        (
            "checkout.payment.base_url",
            config.checkout.payment.base_url.clone(),
            Some("YARDAGE_PAYMENT_BASE_URL"),
        ),
        ("storage.enabled", config.storage.enabled.to_string(), Some("YARDAGE_STORAGE_ENABLED")),
        ("storage.base_url", config.storage.base_url.clone(), Some("YARDAGE_STORAGE_BASE_URL")),
        ("storage.bucket", config.storage.bucket.clone(), Some("YARDAGE_STORAGE_BUCKET")),
        (
            "server.bind_address",
            config.server.bind_address.clone(),
            Some("YARDAGE_SERVER_BIND_ADDRESS"),
        ),
        ("server.port", config.server.port.to_string(), Some("YARDAGE_SERVER_PORT")),
        ("logging.level", config.logging.level.clone(), Some("YARDAGE_LOGGING_LEVEL")),
        (
            "logging.format",
            format!("{:?}", config.logging.format).to_lowercase(),
            Some("YARDAGE_LOGGING_FORMAT"),
        ),
    ];

    for (key, value, env_var) in fields {
        lines.push(render_line(key, &value, field_source(key, env_var, doc, file)));
    }

    lines.join("\n")
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("  {key} = {value}  [{source}]")
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("yardage.toml"), PathBuf::from("config/yardage.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key: &str,
    env_var: Option<&str>,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(var) = env_var {
        if env::var(var).map(|value| !value.trim().is_empty()).unwrap_or(false) {
            return format!("env:{var}");
        }
    }

    if let (Some(doc), Some(path)) = (config_file_doc, config_file_path) {
        if file_contains_key(doc, key) {
            return format!("file:{}", path.display());
        }
    }

    "default".to_string()
}

fn file_contains_key(doc: &Value, dotted_key: &str) -> bool {
    let mut current = doc;
    for part in dotted_key.split('.') {
        match current.get(part) {
            Some(next) => current = next,
            None => return false,
        }
    }
    true
}

fn redact_secret(value: &str) -> String {
    if value.is_empty() {
        "(unset)".to_string()
    } else {
        "********".to_string()
    }
}
