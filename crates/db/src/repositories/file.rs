use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use yardage_core::domain::hero::{HeroImage, HeroImageDraft, HeroImageId};
use yardage_core::domain::product::{Product, ProductDraft, ProductId};

use super::{HeroImageStore, ProductStore, RepositoryError};

/// Sibling document paths derived from the configured base path, so the
/// two collections never clobber each other's writes.
pub fn products_path(base: &Path) -> PathBuf {
    document_path(base, "products")
}

pub fn hero_images_path(base: &Path) -> PathBuf {
    document_path(base, "hero-images")
}

fn document_path(base: &Path, collection: &str) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "yardage-catalog".to_string());
    base.with_file_name(format!("{stem}.{collection}.json"))
}

async fn read_document<T: Default + for<'de> Deserialize<'de>>(
    path: &Path,
) -> Result<T, RepositoryError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|error| {
            RepositoryError::Document(format!(
                "could not parse `{}`: {error}",
                path.display()
            ))
        }),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(error) => Err(RepositoryError::Document(format!(
            "could not read `{}`: {error}",
            path.display()
        ))),
    }
}

async fn write_document<T: Serialize>(path: &Path, document: &T) -> Result<(), RepositoryError> {
    let bytes = serde_json::to_vec_pretty(document).map_err(|error| {
        RepositoryError::Document(format!("could not encode `{}`: {error}", path.display()))
    })?;
    tokio::fs::write(path, bytes).await.map_err(|error| {
        RepositoryError::Document(format!("could not write `{}`: {error}", path.display()))
    })
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ProductDocument {
    products: Vec<Product>,
}

/// Product collection persisted as one JSON document, rewritten whole on
/// every mutation. The lock serializes read-modify-write cycles.
pub struct JsonFileProductStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl JsonFileProductStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path, guard: Mutex::new(()) }
    }
}

#[async_trait::async_trait]
impl ProductStore for JsonFileProductStore {
    async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let _guard = self.guard.lock().await;
        let document: ProductDocument = read_document(&self.path).await?;
        Ok(document.products)
    }

    async fn insert(&self, product: Product) -> Result<(), RepositoryError> {
        let _guard = self.guard.lock().await;
        let mut document: ProductDocument = read_document(&self.path).await?;
        document.products.push(product);
        write_document(&self.path, &document).await
    }

    async fn update(
        &self,
        id: &ProductId,
        draft: ProductDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let _guard = self.guard.lock().await;
        let mut document: ProductDocument = read_document(&self.path).await?;
        let product = document
            .products
            .iter_mut()
            .find(|product| &product.id == id)
            .ok_or_else(|| RepositoryError::MissingProduct(id.0.clone()))?;

        product.name = draft.name;
        product.price = draft.price;
        product.image = draft.image;
        product.updated_at = updated_at;
        write_document(&self.path, &document).await
    }

    async fn delete(&self, id: &ProductId) -> Result<(), RepositoryError> {
        let _guard = self.guard.lock().await;
        let mut document: ProductDocument = read_document(&self.path).await?;
        let before = document.products.len();
        document.products.retain(|product| &product.id != id);
        if document.products.len() == before {
            return Err(RepositoryError::MissingProduct(id.0.clone()));
        }
        write_document(&self.path, &document).await
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct HeroDocument {
    next_id: i64,
    images: Vec<HeroImage>,
}

pub struct JsonFileHeroImageStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl JsonFileHeroImageStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path, guard: Mutex::new(()) }
    }
}

#[async_trait::async_trait]
impl HeroImageStore for JsonFileHeroImageStore {
    async fn list_all(&self) -> Result<Vec<HeroImage>, RepositoryError> {
        let _guard = self.guard.lock().await;
        let document: HeroDocument = read_document(&self.path).await?;
        Ok(document.images)
    }

    async fn insert(
        &self,
        draft: HeroImageDraft,
        at: DateTime<Utc>,
    ) -> Result<HeroImage, RepositoryError> {
        let _guard = self.guard.lock().await;
        let mut document: HeroDocument = read_document(&self.path).await?;
        document.next_id += 1;
        let image = HeroImage {
            id: Some(HeroImageId(document.next_id)),
            src: draft.src,
            alt: draft.alt,
            created_at: at,
            updated_at: at,
        };
        document.images.push(image.clone());
        write_document(&self.path, &document).await?;
        Ok(image)
    }

    async fn update(
        &self,
        id: HeroImageId,
        draft: HeroImageDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let _guard = self.guard.lock().await;
        let mut document: HeroDocument = read_document(&self.path).await?;
        let image = document
            .images
            .iter_mut()
            .find(|image| image.id == Some(id))
            .ok_or(RepositoryError::MissingHeroImage(id.0))?;

        image.src = draft.src;
        image.alt = draft.alt;
        image.updated_at = updated_at;
        write_document(&self.path, &document).await
    }

    async fn delete(&self, id: HeroImageId) -> Result<(), RepositoryError> {
        let _guard = self.guard.lock().await;
        let mut document: HeroDocument = read_document(&self.path).await?;
        let before = document.images.len();
        document.images.retain(|image| image.id != Some(id));
        if document.images.len() == before {
            return Err(RepositoryError::MissingHeroImage(id.0));
        }
        write_document(&self.path, &document).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use yardage_core::domain::hero::HeroImageDraft;
    use yardage_core::domain::product::{Product, ProductDraft, ProductId};

    use crate::repositories::{
        hero_images_path, products_path, HeroImageStore, JsonFileHeroImageStore,
        JsonFileProductStore, ProductStore,
    };

    fn product(id: &str) -> Product {
        Product {
            id: ProductId(id.to_string()),
            name: format!("Fabric {id}"),
            price: Decimal::new(3500, 0),
            image: format!("/uploads/{id}.png"),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn document_paths_are_siblings_of_the_base() {
        let base = std::path::Path::new("/var/lib/yardage/catalog.json");
        assert_eq!(
            products_path(base),
            std::path::Path::new("/var/lib/yardage/catalog.products.json")
        );
        assert_eq!(
            hero_images_path(base),
            std::path::Path::new("/var/lib/yardage/catalog.hero-images.json")
        );
    }

    #[tokio::test]
    async fn empty_document_reads_as_empty_collection() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileProductStore::new(dir.path().join("catalog.products.json"));

        assert!(store.list_all().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn products_survive_reopening_the_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("catalog.products.json");

        {
            let store = JsonFileProductStore::new(path.clone());
            store.insert(product("a")).await.expect("insert a");
            store.insert(product("b")).await.expect("insert b");
            store
                .update(
                    &ProductId("a".to_string()),
                    ProductDraft {
                        name: "Renamed".to_string(),
                        price: Decimal::new(4000, 0),
                        image: "/uploads/a2.png".to_string(),
                    },
                    Utc::now(),
                )
                .await
                .expect("update a");
        }

        let reopened = JsonFileProductStore::new(path);
        let listed = reopened.list_all().await.expect("list");
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "Renamed");
        assert_eq!(listed[1].id.0, "b");
    }

    #[tokio::test]
    async fn hero_ids_stay_unique_across_deletes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileHeroImageStore::new(dir.path().join("catalog.hero-images.json"));

        let first = store
            .insert(
                HeroImageDraft { src: "/uploads/h1.png".to_string(), alt: "one".to_string() },
                Utc::now(),
            )
            .await
            .expect("insert one");
        store.delete(first.id.expect("id")).await.expect("delete one");

        let second = store
            .insert(
                HeroImageDraft { src: "/uploads/h2.png".to_string(), alt: "two".to_string() },
                Utc::now(),
            )
            .await
            .expect("insert two");

        // The counter never reuses a deleted id.
        assert_eq!(second.id.map(|id| id.0), Some(2));
    }
}
