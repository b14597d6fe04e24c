use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use yardage_core::domain::hero::{HeroImage, HeroImageDraft, HeroImageId};
use yardage_core::domain::product::{Product, ProductDraft, ProductId};

use super::{HeroImageStore, ProductStore, RepositoryError};

/// Creation-ordered in-memory product collection; the default backend.
#[derive(Default)]
pub struct InMemoryProductStore {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ProductStore for InMemoryProductStore {
    async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products.read().await;
        Ok(products.clone())
    }

    async fn insert(&self, product: Product) -> Result<(), RepositoryError> {
        let mut products = self.products.write().await;
        products.push(product);
        Ok(())
    }

    async fn update(
        &self,
        id: &ProductId,
        draft: ProductDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let mut products = self.products.write().await;
        let product = products
            .iter_mut()
            .find(|product| &product.id == id)
            .ok_or_else(|| RepositoryError::MissingProduct(id.0.clone()))?;

        product.name = draft.name;
        product.price = draft.price;
        product.image = draft.image;
        product.updated_at = updated_at;
        Ok(())
    }

    async fn delete(&self, id: &ProductId) -> Result<(), RepositoryError> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|product| &product.id != id);
        if products.len() == before {
            return Err(RepositoryError::MissingProduct(id.0.clone()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryHeroImageStore {
    state: RwLock<HeroState>,
}

#[derive(Default)]
struct HeroState {
    next_id: i64,
    images: Vec<HeroImage>,
}

impl InMemoryHeroImageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl HeroImageStore for InMemoryHeroImageStore {
    async fn list_all(&self) -> Result<Vec<HeroImage>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.images.clone())
    }

    async fn insert(
        &self,
        draft: HeroImageDraft,
        at: DateTime<Utc>,
    ) -> Result<HeroImage, RepositoryError> {
        let mut state = self.state.write().await;
        state.next_id += 1;
        let image = HeroImage {
            id: Some(HeroImageId(state.next_id)),
            src: draft.src,
            alt: draft.alt,
            created_at: at,
            updated_at: at,
        };
        state.images.push(image.clone());
        Ok(image)
    }

    async fn update(
        &self,
        id: HeroImageId,
        draft: HeroImageDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        let image = state
            .images
            .iter_mut()
            .find(|image| image.id == Some(id))
            .ok_or(RepositoryError::MissingHeroImage(id.0))?;

        image.src = draft.src;
        image.alt = draft.alt;
        image.updated_at = updated_at;
        Ok(())
    }

    async fn delete(&self, id: HeroImageId) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        let before = state.images.len();
        state.images.retain(|image| image.id != Some(id));
        if state.images.len() == before {
            return Err(RepositoryError::MissingHeroImage(id.0));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use yardage_core::domain::hero::HeroImageDraft;
    use yardage_core::domain::product::{Product, ProductDraft, ProductId};

    use crate::repositories::{
        HeroImageStore, InMemoryHeroImageStore, InMemoryProductStore, ProductStore,
        RepositoryError,
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

    #[tokio::test]
    async fn products_list_in_insertion_order() {
        let store = InMemoryProductStore::new();
        store.insert(product("a")).await.expect("insert a");
        store.insert(product("b")).await.expect("insert b");

        let listed = store.list_all().await.expect("list");
        let ids: Vec<&str> = listed.iter().map(|product| product.id.0.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[tokio::test]
    async fn product_update_round_trips_and_missing_id_errors() {
        let store = InMemoryProductStore::new();
        store.insert(product("a")).await.expect("insert");

        let draft = ProductDraft {
            name: "Renamed".to_string(),
            price: Decimal::new(4000, 0),
            image: "/uploads/renamed.png".to_string(),
        };
        store.update(&ProductId("a".to_string()), draft.clone(), Utc::now())
            .await
            .expect("update");

        let listed = store.list_all().await.expect("list");
        assert_eq!(listed[0].name, "Renamed");
        assert_eq!(listed[0].price, Decimal::new(4000, 0));

        let missing = store.update(&ProductId("ghost".to_string()), draft, Utc::now()).await;
        assert!(matches!(missing, Err(RepositoryError::MissingProduct(_))));
    }

    #[tokio::test]
    async fn hero_images_get_monotonic_ids() {
        let store = InMemoryHeroImageStore::new();
        let first = store
            .insert(
                HeroImageDraft { src: "/uploads/h1.png".to_string(), alt: "one".to_string() },
                Utc::now(),
            )
            .await
            .expect("insert first");
        let second = store
            .insert(
                HeroImageDraft { src: "/uploads/h2.png".to_string(), alt: "two".to_string() },
                Utc::now(),
            )
            .await
            .expect("insert second");

        assert_eq!(first.id.map(|id| id.0), Some(1));
        assert_eq!(second.id.map(|id| id.0), Some(2));

        store.delete(first.id.expect("id")).await.expect("delete");
        let listed = store.list_all().await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].alt, "two");
    }
}
