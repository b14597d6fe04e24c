use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::checkout::message::MessagingConfig;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub catalog: CatalogConfig,
    pub admin: AdminConfig,
    pub checkout: CheckoutConfig,
    pub storage: StorageConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub backend: CatalogBackend,
    /// Document path for the file backend; ignored by the others.
    pub file_path: PathBuf,
    /// Prefix for generated product ids.
    pub id_prefix: String,
}

#[derive(Clone, Debug)]
pub struct AdminConfig {
    pub secret: SecretString,
}

#[derive(Clone, Debug)]
pub struct CheckoutConfig {
    /// Flat rate applied to every yard regardless of product.
    pub price_per_yard: Decimal,
    pub currency: String,
    pub messaging: MessagingConfig,
    pub payment: PaymentProviderConfig,
}

#[derive(Clone, Debug)]
pub struct PaymentProviderConfig {
    pub enabled: bool,
    pub public_key: String,
    pub secret_key: SecretString,
    pub base_url: String,
    pub reference_prefix: String,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub enabled: bool,
    pub base_url: String,
    pub bucket: String,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogBackend {
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
    pub database_url: Option<String>,
    pub log_level: Option<String>,
    pub catalog_backend: Option<CatalogBackend>,
    pub catalog_file_path: Option<PathBuf>,
    pub admin_secret: Option<String>,
    pub messaging_domain: Option<String>,
    pub messaging_recipient: Option<String>,
    pub payment_enabled: Option<bool>,
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
            database: DatabaseConfig {
                url: "sqlite://yardage.db".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            catalog: CatalogConfig {
                backend: CatalogBackend::Memory,
                file_path: PathBuf::from("yardage-catalog.json"),
                id_prefix: "aria-voile".to_string(),
            },
            admin: AdminConfig { secret: String::new().into() },
            checkout: CheckoutConfig {
                price_per_yard: Decimal::new(3500, 0),
                currency: "NGN".to_string(),
                messaging: MessagingConfig {
                    domain: "wa.me".to_string(),
                    recipient: String::new(),
                },
                payment: PaymentProviderConfig {
                    enabled: false,
                    public_key: String::new(),
                    secret_key: String::new().into(),
                    base_url: "https://api.paystack.co".to_string(),
                    reference_prefix: "yardage".to_string(),
                },
            },
            storage: StorageConfig {
                enabled: false,
                base_url: String::new(),
                bucket: "images".to_string(),
            },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 8080,
                graceful_shutdown_secs: 15,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl FromStr for CatalogBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(ConfigError::Validation(format!(
                "unsupported catalog backend `{other}` (expected memory|file|sqlite)"
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
            config.apply_patch(patch)?;
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("yardage.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) -> Result<(), ConfigError> {
        if let Some(database) = patch.database {
            if let Some(url) = database.url {
                self.database.url = url;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(catalog) = patch.catalog {
            if let Some(backend) = catalog.backend {
                self.catalog.backend = backend;
            }
            if let Some(file_path) = catalog.file_path {
                self.catalog.file_path = PathBuf::from(file_path);
            }
            if let Some(id_prefix) = catalog.id_prefix {
                self.catalog.id_prefix = id_prefix;
            }
        }

        if let Some(admin) = patch.admin {
            if let Some(admin_secret_value) = admin.secret {
                self.admin.secret = secret_value(admin_secret_value);
            }
        }

        if let Some(checkout) = patch.checkout {
            if let Some(price) = checkout.price_per_yard {
                self.checkout.price_per_yard = Decimal::from_str(price.trim()).map_err(|_| {
                    ConfigError::Validation(format!(
                        "checkout.price_per_yard `{price}` is not a decimal amount"
                    ))
                })?;
            }
            if let Some(currency) = checkout.currency {
                self.checkout.currency = currency;
            }
            if let Some(messaging) = checkout.messaging {
                if let Some(domain) = messaging.domain {
                    self.checkout.messaging.domain = domain;
                }
                if let Some(recipient) = messaging.recipient {
                    self.checkout.messaging.recipient = recipient;
                }
            }
            if let Some(payment) = checkout.payment {
                if let Some(enabled) = payment.enabled {
                    self.checkout.payment.enabled = enabled;
                }
                if let Some(public_key) = payment.public_key {
                    self.checkout.payment.public_key = public_key;
                }
                if let Some(payment_secret_value) = payment.secret_key {
                    self.checkout.payment.secret_key = secret_value(payment_secret_value);
                }
                if let Some(base_url) = payment.base_url {
                    self.checkout.payment.base_url = base_url;
                }
                if let Some(reference_prefix) = payment.reference_prefix {
                    self.checkout.payment.reference_prefix = reference_prefix;
                }
            }
        }

        if let Some(storage) = patch.storage {
            if let Some(enabled) = storage.enabled {
                self.storage.enabled = enabled;
            }
            if let Some(base_url) = storage.base_url {
                self.storage.base_url = base_url;
            }
            if let Some(bucket) = storage.bucket {
                self.storage.bucket = bucket;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
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

        Ok(())
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("YARDAGE_DATABASE_URL") {
            self.database.url = value;
        }
        if let Some(value) = read_env("YARDAGE_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_u32("YARDAGE_DATABASE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("YARDAGE_DATABASE_TIMEOUT_SECS") {
            self.database.timeout_secs = parse_u64("YARDAGE_DATABASE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("YARDAGE_CATALOG_BACKEND") {
            self.catalog.backend = value.parse()?;
        }
        if let Some(value) = read_env("YARDAGE_CATALOG_FILE_PATH") {
            self.catalog.file_path = PathBuf::from(value);
        }
        if let Some(value) = read_env("YARDAGE_CATALOG_ID_PREFIX") {
            self.catalog.id_prefix = value;
        }

        if let Some(value) = read_env("YARDAGE_ADMIN_SECRET") {
            self.admin.secret = secret_value(value);
        }

        if let Some(value) = read_env("YARDAGE_CHECKOUT_PRICE_PER_YARD") {
            self.checkout.price_per_yard = parse_decimal("YARDAGE_CHECKOUT_PRICE_PER_YARD", &value)?;
        }
        if let Some(value) = read_env("YARDAGE_CHECKOUT_CURRENCY") {
            self.checkout.currency = value;
        }
        if let Some(value) = read_env("YARDAGE_MESSAGING_DOMAIN") {
            self.checkout.messaging.domain = value;
        }
        if let Some(value) = read_env("YARDAGE_MESSAGING_RECIPIENT") {
            self.checkout.messaging.recipient = value;
        }

        if let Some(value) = read_env("YARDAGE_PAYMENT_ENABLED") {
            self.checkout.payment.enabled = parse_bool("YARDAGE_PAYMENT_ENABLED", &value)?;
        }
        if let Some(value) = read_env("YARDAGE_PAYMENT_PUBLIC_KEY") {
            self.checkout.payment.public_key = value;
        }
        if let Some(value) = read_env("YARDAGE_PAYMENT_SECRET_KEY") {
            self.checkout.payment.secret_key = secret_value(value);
        }
        if let Some(value) = read_env("YARDAGE_PAYMENT_BASE_URL") {
            self.checkout.payment.base_url = value;
        }
        if let Some(value) = read_env("YARDAGE_PAYMENT_REFERENCE_PREFIX") {
            self.checkout.payment.reference_prefix = value;
        }

        if let Some(value) = read_env("YARDAGE_STORAGE_ENABLED") {
            self.storage.enabled = parse_bool("YARDAGE_STORAGE_ENABLED", &value)?;
        }
        if let Some(value) = read_env("YARDAGE_STORAGE_BASE_URL") {
            self.storage.base_url = value;
        }
        if let Some(value) = read_env("YARDAGE_STORAGE_BUCKET") {
            self.storage.bucket = value;
        }

        if let Some(value) = read_env("YARDAGE_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("YARDAGE_SERVER_PORT") {
            self.server.port = parse_u16("YARDAGE_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("YARDAGE_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("YARDAGE_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        let log_level = read_env("YARDAGE_LOGGING_LEVEL").or_else(|| read_env("YARDAGE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("YARDAGE_LOGGING_FORMAT").or_else(|| read_env("YARDAGE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(database_url) = overrides.database_url {
            self.database.url = database_url;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(catalog_backend) = overrides.catalog_backend {
            self.catalog.backend = catalog_backend;
        }
        if let Some(catalog_file_path) = overrides.catalog_file_path {
            self.catalog.file_path = catalog_file_path;
        }
        if let Some(admin_secret) = overrides.admin_secret {
            self.admin.secret = secret_value(admin_secret);
        }
        if let Some(messaging_domain) = overrides.messaging_domain {
            self.checkout.messaging.domain = messaging_domain;
        }
        if let Some(messaging_recipient) = overrides.messaging_recipient {
            self.checkout.messaging.recipient = messaging_recipient;
        }
        if let Some(payment_enabled) = overrides.payment_enabled {
            self.checkout.payment.enabled = payment_enabled;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_database(&self.database)?;
        validate_catalog(&self.catalog)?;
        validate_admin(&self.admin)?;
        validate_checkout(&self.checkout)?;
        validate_storage(&self.storage)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("yardage.toml"), PathBuf::from("config/yardage.toml")]
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

fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
    let url = database.url.trim();
    let sqlite_url =
        url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
    if !sqlite_url {
        return Err(ConfigError::Validation(
            "database.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                .to_string(),
        ));
    }

    if database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }

    if database.timeout_secs == 0 || database.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "database.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_catalog(catalog: &CatalogConfig) -> Result<(), ConfigError> {
    if catalog.backend == CatalogBackend::File
        && catalog.file_path.as_os_str().is_empty()
    {
        return Err(ConfigError::Validation(
            "catalog.file_path is required for the file backend".to_string(),
        ));
    }

    let prefix = catalog.id_prefix.trim();
    if prefix.is_empty() {
        return Err(ConfigError::Validation(
            "catalog.id_prefix must not be empty".to_string(),
        ));
    }
    if !prefix.chars().all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-') {
        return Err(ConfigError::Validation(
            "catalog.id_prefix must contain only lowercase letters, digits, and dashes"
                .to_string(),
        ));
    }

    Ok(())
}

fn validate_admin(admin: &AdminConfig) -> Result<(), ConfigError> {
    if admin.secret.expose_secret().is_empty() {
        return Err(ConfigError::Validation(
            "admin.secret is required; set it in yardage.toml or YARDAGE_ADMIN_SECRET".to_string(),
        ));
    }

    Ok(())
}

fn validate_checkout(checkout: &CheckoutConfig) -> Result<(), ConfigError> {
    if checkout.price_per_yard <= Decimal::ZERO {
        return Err(ConfigError::Validation(
            "checkout.price_per_yard must be greater than zero".to_string(),
        ));
    }

    let currency = checkout.currency.trim();
    if currency.len() != 3 || !currency.chars().all(|ch| ch.is_ascii_uppercase()) {
        return Err(ConfigError::Validation(
            "checkout.currency must be a three-letter uppercase code".to_string(),
        ));
    }

    let domain = checkout.messaging.domain.trim();
    if domain.is_empty() || domain.contains("://") || domain.contains('/') {
        return Err(ConfigError::Validation(
            "checkout.messaging.domain must be a bare host like `wa.me`".to_string(),
        ));
    }

    let recipient = checkout.messaging.recipient.trim();
    if recipient.is_empty() || !recipient.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(ConfigError::Validation(
            "checkout.messaging.recipient is required and must be digits only (country code included)"
                .to_string(),
        ));
    }

    if checkout.payment.enabled {
        if checkout.payment.public_key.trim().is_empty() {
            return Err(ConfigError::Validation(
                "checkout.payment.public_key is required when payment is enabled".to_string(),
            ));
        }
        if checkout.payment.secret_key.expose_secret().trim().is_empty() {
            return Err(ConfigError::Validation(
                "checkout.payment.secret_key is required when payment is enabled".to_string(),
            ));
        }
    }

    let base_url = checkout.payment.base_url.trim();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::Validation(
            "checkout.payment.base_url must start with http:// or https://".to_string(),
        ));
    }

    if checkout.payment.reference_prefix.trim().is_empty() {
        return Err(ConfigError::Validation(
            "checkout.payment.reference_prefix must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_storage(storage: &StorageConfig) -> Result<(), ConfigError> {
    if storage.enabled {
        let base_url = storage.base_url.trim();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "storage.base_url must start with http:// or https:// when storage is enabled"
                    .to_string(),
            ));
        }
    }

    if storage.bucket.trim().is_empty() {
        return Err(ConfigError::Validation(
            "storage.bucket must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.port == 0 {
        return Err(ConfigError::Validation(
            "server.port must be greater than zero".to_string(),
        ));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
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

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.parse::<bool>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_decimal(key: &str, value: &str) -> Result<Decimal, ConfigError> {
    Decimal::from_str(value.trim()).map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    database: Option<DatabasePatch>,
    catalog: Option<CatalogPatch>,
    admin: Option<AdminPatch>,
    checkout: Option<CheckoutPatch>,
    storage: Option<StoragePatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    backend: Option<CatalogBackend>,
    file_path: Option<String>,
    id_prefix: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AdminPatch {
    secret: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CheckoutPatch {
    price_per_yard: Option<String>,
    currency: Option<String>,
    messaging: Option<MessagingPatch>,
    payment: Option<PaymentPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct MessagingPatch {
    domain: Option<String>,
    recipient: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PaymentPatch {
    enabled: Option<bool>,
    public_key: Option<String>,
    secret_key: Option<String>,
    base_url: Option<String>,
    reference_prefix: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StoragePatch {
    enabled: Option<bool>,
    base_url: Option<String>,
    bucket: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
