use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::info;

use yardage_core::config::{AppConfig, CatalogBackend};

use crate::repositories::{
    hero_images_path, products_path, HeroImageStore, InMemoryHeroImageStore, InMemoryProductStore,
    JsonFileHeroImageStore, JsonFileProductStore, ProductStore, RepositoryError,
    SqlHeroImageStore, SqlProductStore,
};
use crate::{connect_from_config, migrations, seed_if_empty, DbPool};

/// The constructed backing stores for one configured backend. Call sites
/// receive trait objects and never see which backend is behind them.
pub struct BackendHandles {
    pub products: Arc<dyn ProductStore>,
    pub hero_images: Arc<dyn HeroImageStore>,
    /// Present only for the sqlite backend; used for health probes.
    pub db_pool: Option<DbPool>,
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("database connection failed: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migrate(#[source] sqlx::migrate::MigrateError),
    #[error("catalog seed failed: {0}")]
    Seed(#[source] RepositoryError),
}

/// Builds the backing stores selected by `catalog.backend`. The memory
/// backend plays the original "default data" role and therefore always
/// starts from the starter catalog; the other backends start with
/// whatever they already hold.
pub async fn open_backend(config: &AppConfig) -> Result<BackendHandles, BackendError> {
    match config.catalog.backend {
        CatalogBackend::Memory => {
            let products = Arc::new(InMemoryProductStore::new());
            let hero_images = Arc::new(InMemoryHeroImageStore::new());
            seed_if_empty(products.as_ref(), hero_images.as_ref(), Utc::now())
                .await
                .map_err(BackendError::Seed)?;

            Ok(BackendHandles { products, hero_images, db_pool: None })
        }
        CatalogBackend::File => {
            let base = &config.catalog.file_path;
            Ok(BackendHandles {
                products: Arc::new(JsonFileProductStore::new(products_path(base))),
                hero_images: Arc::new(JsonFileHeroImageStore::new(hero_images_path(base))),
                db_pool: None,
            })
        }
        CatalogBackend::Sqlite => {
            let pool =
                connect_from_config(&config.database).await.map_err(BackendError::Connect)?;
            info!(
                event_name = "catalog.backend.database_connected",
                "database connection established"
            );

            migrations::run_pending(&pool).await.map_err(BackendError::Migrate)?;
            info!(
                event_name = "catalog.backend.migrations_applied",
                "database migrations applied"
            );

            Ok(BackendHandles {
                products: Arc::new(SqlProductStore::new(pool.clone())),
                hero_images: Arc::new(SqlHeroImageStore::new(pool.clone())),
                db_pool: Some(pool),
            })
        }
    }
}
