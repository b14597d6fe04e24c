use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

use yardage_core::checkout::payment::PaymentGateway;
use yardage_core::config::{AppConfig, ConfigError, LoadOptions};
use yardage_core::storage::ImageStore;
use yardage_core::AdminGate;
use yardage_db::{open_backend, BackendError, CatalogService, DbPool};

use crate::gateway::HostedPaymentGateway;
use crate::storage::HttpBucketStore;

/// Everything the HTTP surface needs, wired once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: Arc<RwLock<CatalogService>>,
    pub gate: Arc<RwLock<AdminGate>>,
    pub gateway: Option<Arc<dyn PaymentGateway>>,
    pub images: Option<Arc<dyn ImageStore>>,
    pub db_pool: Option<DbPool>,
}

pub struct Application {
    pub state: AppState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

/// Constructs the configured backend and performs the initial combined
/// catalog load. A failing initial load does not abort startup; the
/// error lands in the catalog's error slot and blocks the storefront
/// view until a successful reload.
pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        backend = ?config.catalog.backend,
        "starting application bootstrap"
    );

    let handles = open_backend(&config).await?;

    let mut catalog = CatalogService::new(
        handles.products,
        handles.hero_images,
        config.catalog.id_prefix.clone(),
    );
    if let Err(error) = catalog.load().await {
        warn!(
            event_name = "system.bootstrap.catalog_load_failed",
            error = %error,
            "initial catalog load failed; storefront starts in error state"
        );
    }

    let gateway: Option<Arc<dyn PaymentGateway>> = if config.checkout.payment.enabled {
        Some(Arc::new(HostedPaymentGateway::from_config(&config.checkout.payment)))
    } else {
        None
    };

    let images: Option<Arc<dyn ImageStore>> = if config.storage.enabled {
        Some(Arc::new(HttpBucketStore::from_config(&config.storage)))
    } else {
        None
    };

    let gate = AdminGate::new(config.admin.secret.clone());

    Ok(Application {
        state: AppState {
            config: Arc::new(config),
            catalog: Arc::new(RwLock::new(catalog)),
            gate: Arc::new(RwLock::new(gate)),
            gateway,
            images,
            db_pool: handles.db_pool,
        },
    })
}
