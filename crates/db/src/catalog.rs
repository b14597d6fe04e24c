use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use yardage_core::domain::hero::{HeroImage, HeroImageDraft, HeroImageId};
use yardage_core::domain::product::{Product, ProductDraft, ProductId};

use crate::repositories::{HeroImageStore, ProductStore, RepositoryError};

/// Single source of truth for the product and hero-image collections.
///
/// The backing store is chosen at construction and never branched on
/// afterwards. Both collections are cached for the session; `load`
/// refreshes them together. Every mutation completes its backing
/// round-trip before the cache changes, so the cache never claims a
/// write the store did not take. Failures land in one error slot as a
/// single human-readable message; any successful operation clears it.
pub struct CatalogService {
    products_store: Arc<dyn ProductStore>,
    hero_store: Arc<dyn HeroImageStore>,
    id_prefix: String,
    products: Vec<Product>,
    hero_images: Vec<HeroImage>,
    error: Option<String>,
}

impl CatalogService {
    pub fn new(
        products_store: Arc<dyn ProductStore>,
        hero_store: Arc<dyn HeroImageStore>,
        id_prefix: impl Into<String>,
    ) -> Self {
        Self {
            products_store,
            hero_store,
            id_prefix: id_prefix.into(),
            products: Vec::new(),
            hero_images: Vec::new(),
            error: None,
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn hero_images(&self) -> &[HeroImage] {
        &self.hero_images
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetches both collections concurrently and applies them only if
    /// both succeed. A failure in either aborts the combined load and
    /// leaves the caches exactly as they were.
    pub async fn load(&mut self) -> Result<(), RepositoryError> {
        let (products, hero_images) =
            tokio::join!(self.products_store.list_all(), self.hero_store.list_all());

        match (products, hero_images) {
            (Ok(products), Ok(hero_images)) => {
                info!(
                    event_name = "catalog.load.applied",
                    product_count = products.len(),
                    hero_image_count = hero_images.len(),
                    "catalog collections loaded"
                );
                self.products = products;
                self.hero_images = hero_images;
                self.error = None;
                Ok(())
            }
            (Err(error), _) | (_, Err(error)) => Err(self.record_failure("load", error)),
        }
    }

    /// Creates a product with a generated id and returns the stored
    /// record. The cache is only extended after the store accepts the
    /// insert.
    pub async fn create_product(
        &mut self,
        draft: ProductDraft,
        at: DateTime<Utc>,
    ) -> Result<Product, RepositoryError> {
        let product = Product {
            id: ProductId::generated(&self.id_prefix, at),
            name: draft.name,
            price: draft.price,
            image: draft.image,
            created_at: at,
            updated_at: at,
        };

        match self.products_store.insert(product.clone()).await {
            Ok(()) => {
                self.products.push(product.clone());
                self.error = None;
                Ok(product)
            }
            Err(error) => Err(self.record_failure("create_product", error)),
        }
    }

    pub async fn update_product(
        &mut self,
        id: &ProductId,
        draft: ProductDraft,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        match self.products_store.update(id, draft.clone(), at).await {
            Ok(()) => {
                if let Some(product) = self.products.iter_mut().find(|product| &product.id == id) {
                    product.name = draft.name;
                    product.price = draft.price;
                    product.image = draft.image;
                    product.updated_at = at;
                }
                self.error = None;
                Ok(())
            }
            Err(error) => Err(self.record_failure("update_product", error)),
        }
    }

    pub async fn delete_product(&mut self, id: &ProductId) -> Result<(), RepositoryError> {
        match self.products_store.delete(id).await {
            Ok(()) => {
                self.products.retain(|product| &product.id != id);
                self.error = None;
                Ok(())
            }
            Err(error) => Err(self.record_failure("delete_product", error)),
        }
    }

    pub async fn create_hero_image(
        &mut self,
        draft: HeroImageDraft,
        at: DateTime<Utc>,
    ) -> Result<HeroImage, RepositoryError> {
        match self.hero_store.insert(draft, at).await {
            Ok(image) => {
                self.hero_images.push(image.clone());
                self.error = None;
                Ok(image)
            }
            Err(error) => Err(self.record_failure("create_hero_image", error)),
        }
    }

    pub async fn update_hero_image(
        &mut self,
        id: HeroImageId,
        draft: HeroImageDraft,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        match self.hero_store.update(id, draft.clone(), at).await {
            Ok(()) => {
                if let Some(image) =
                    self.hero_images.iter_mut().find(|image| image.id == Some(id))
                {
                    image.src = draft.src;
                    image.alt = draft.alt;
                    image.updated_at = at;
                }
                self.error = None;
                Ok(())
            }
            Err(error) => Err(self.record_failure("update_hero_image", error)),
        }
    }

    pub async fn delete_hero_image(&mut self, id: HeroImageId) -> Result<(), RepositoryError> {
        match self.hero_store.delete(id).await {
            Ok(()) => {
                self.hero_images.retain(|image| image.id != Some(id));
                self.error = None;
                Ok(())
            }
            Err(error) => Err(self.record_failure("delete_hero_image", error)),
        }
    }

    fn record_failure(&mut self, operation: &str, error: RepositoryError) -> RepositoryError {
        warn!(
            event_name = "catalog.operation.failed",
            operation,
            error = %error,
            "catalog backing store operation failed"
        );
        self.error = Some(error.to_string());
        error
    }
}
