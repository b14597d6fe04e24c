use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use yardage_core::domain::hero::HeroImageDraft;
use yardage_core::domain::product::{Product, ProductId};

use crate::repositories::{HeroImageStore, ProductStore, RepositoryError};

const DEFAULT_PRODUCTS: &[(&str, &str)] = &[
    ("aria-voile-001", "Aria Voile 001"),
    ("aria-voile-002", "Aria Voile 002"),
    ("aria-voile-003", "Aria Voile 003"),
    ("aria-voile-004", "Aria Voile 004"),
];

const DEFAULT_HERO_IMAGES: &[(&str, &str)] = &[
    ("/uploads/aria-voile-001.png", "Aria Voile fabric in motion"),
    ("/uploads/aria-voile-002.png", "Aria Voile floating in nature"),
    ("/uploads/aria-voile-003.png", "Aria Voile against a coastal backdrop"),
    ("/uploads/aria-voile-004.png", "Aria Voile against a blue sky"),
];

const DEFAULT_PRICE_PER_YARD: Decimal = Decimal::from_parts(3500, 0, 0, false, 0);

/// The deterministic starter catalog: four fabrics at the flat per-yard
/// price, plus matching banner images.
pub fn default_products(at: DateTime<Utc>) -> Vec<Product> {
    DEFAULT_PRODUCTS
        .iter()
        .map(|(id, name)| Product {
            id: ProductId(id.to_string()),
            name: name.to_string(),
            price: DEFAULT_PRICE_PER_YARD,
            image: format!("/uploads/{id}.png"),
            created_at: at,
            updated_at: at,
        })
        .collect()
}

pub fn default_hero_images() -> Vec<HeroImageDraft> {
    DEFAULT_HERO_IMAGES
        .iter()
        .map(|(src, alt)| HeroImageDraft { src: src.to_string(), alt: alt.to_string() })
        .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub products_inserted: usize,
    pub hero_images_inserted: usize,
}

/// Loads the starter catalog into an empty backend. Collections that
/// already hold data are left alone, so the seed is safe to re-run.
pub async fn seed_if_empty(
    products: &dyn ProductStore,
    hero_images: &dyn HeroImageStore,
    at: DateTime<Utc>,
) -> Result<SeedReport, RepositoryError> {
    let mut report = SeedReport::default();

    if products.list_all().await?.is_empty() {
        for product in default_products(at) {
            products.insert(product).await?;
            report.products_inserted += 1;
        }
    }

    if hero_images.list_all().await?.is_empty() {
        for draft in default_hero_images() {
            hero_images.insert(draft, at).await?;
            report.hero_images_inserted += 1;
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::repositories::{InMemoryHeroImageStore, InMemoryProductStore, ProductStore};

    use super::{seed_if_empty, SeedReport};

    #[tokio::test]
    async fn seeds_an_empty_backend_once() {
        let products = InMemoryProductStore::new();
        let hero_images = InMemoryHeroImageStore::new();

        let first = seed_if_empty(&products, &hero_images, Utc::now()).await.expect("seed");
        assert_eq!(first, SeedReport { products_inserted: 4, hero_images_inserted: 4 });

        let second = seed_if_empty(&products, &hero_images, Utc::now()).await.expect("reseed");
        assert_eq!(second, SeedReport::default());

        let listed = products.list_all().await.expect("list");
        assert_eq!(listed.len(), 4);
        assert_eq!(listed[0].name, "Aria Voile 001");
    }
}
