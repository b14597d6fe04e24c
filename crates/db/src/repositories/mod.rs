use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use yardage_core::domain::hero::{HeroImage, HeroImageDraft, HeroImageId};
use yardage_core::domain::product::{Product, ProductDraft, ProductId};

pub mod file;
pub mod hero;
pub mod memory;
pub mod product;

pub use file::{hero_images_path, products_path, JsonFileHeroImageStore, JsonFileProductStore};
pub use hero::SqlHeroImageStore;
pub use memory::{InMemoryHeroImageStore, InMemoryProductStore};
pub use product::SqlProductStore;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("catalog document error: {0}")]
    Document(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("no product with id `{0}`")]
    MissingProduct(String),
    #[error("no hero image with id `{0}`")]
    MissingHeroImage(i64),
}

/// Backing store for the product collection. `list_all` returns creation
/// order; `update` and `delete` fail on unknown ids so callers never
/// mistake a no-op for a write.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Product>, RepositoryError>;
    async fn insert(&self, product: Product) -> Result<(), RepositoryError>;
    async fn update(
        &self,
        id: &ProductId,
        draft: ProductDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;
    async fn delete(&self, id: &ProductId) -> Result<(), RepositoryError>;
}

/// Backing store for the hero-image collection. Ids are assigned by the
/// store on insert, which is why insert hands the stored record back.
#[async_trait]
pub trait HeroImageStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<HeroImage>, RepositoryError>;
    async fn insert(
        &self,
        draft: HeroImageDraft,
        at: DateTime<Utc>,
    ) -> Result<HeroImage, RepositoryError>;
    async fn update(
        &self,
        id: HeroImageId,
        draft: HeroImageDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;
    async fn delete(&self, id: HeroImageId) -> Result<(), RepositoryError>;
}
