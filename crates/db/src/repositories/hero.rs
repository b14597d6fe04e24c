use chrono::{DateTime, Utc};
use sqlx::Row;

use yardage_core::domain::hero::{HeroImage, HeroImageDraft, HeroImageId};

use super::{HeroImageStore, RepositoryError};
use crate::DbPool;

pub struct SqlHeroImageStore {
    pool: DbPool,
}

impl SqlHeroImageStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl HeroImageStore for SqlHeroImageStore {
    async fn list_all(&self) -> Result<Vec<HeroImage>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, src, alt, created_at, updated_at
             FROM hero_images
             ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(HeroImage {
                    id: Some(HeroImageId(row.try_get("id")?)),
                    src: row.try_get("src")?,
                    alt: row.try_get("alt")?,
                    created_at: row.try_get("created_at")?,
                    updated_at: row.try_get("updated_at")?,
                })
            })
            .collect()
    }

    async fn insert(
        &self,
        draft: HeroImageDraft,
        at: DateTime<Utc>,
    ) -> Result<HeroImage, RepositoryError> {
        let row = sqlx::query(
            "INSERT INTO hero_images (src, alt, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id",
        )
        .bind(&draft.src)
        .bind(&draft.alt)
        .bind(at)
        .bind(at)
        .fetch_one(&self.pool)
        .await?;

        Ok(HeroImage {
            id: Some(HeroImageId(row.try_get("id")?)),
            src: draft.src,
            alt: draft.alt,
            created_at: at,
            updated_at: at,
        })
    }

    async fn update(
        &self,
        id: HeroImageId,
        draft: HeroImageDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE hero_images SET src = ?1, alt = ?2, updated_at = ?3 WHERE id = ?4",
        )
        .bind(draft.src)
        .bind(draft.alt)
        .bind(updated_at)
        .bind(id.0)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::MissingHeroImage(id.0));
        }
        Ok(())
    }

    async fn delete(&self, id: HeroImageId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM hero_images WHERE id = ?1")
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::MissingHeroImage(id.0));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use yardage_core::domain::hero::HeroImageDraft;

    use crate::repositories::{HeroImageStore, RepositoryError, SqlHeroImageStore};
    use crate::{connect_with_settings, migrations};

    async fn store() -> SqlHeroImageStore {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrate");
        SqlHeroImageStore::new(pool)
    }

    #[tokio::test]
    async fn insert_assigns_autoincrement_ids() {
        let store = store().await;

        let first = store
            .insert(
                HeroImageDraft { src: "/uploads/h1.png".to_string(), alt: "one".to_string() },
                Utc::now(),
            )
            .await
            .expect("insert one");
        let second = store
            .insert(
                HeroImageDraft { src: "/uploads/h2.png".to_string(), alt: "two".to_string() },
                Utc::now(),
            )
            .await
            .expect("insert two");

        assert!(first.id.is_some());
        assert!(second.id.expect("id").0 > first.id.expect("id").0);
    }

    #[tokio::test]
    async fn update_and_delete_require_an_existing_row() {
        let store = store().await;
        let inserted = store
            .insert(
                HeroImageDraft { src: "/uploads/h1.png".to_string(), alt: "one".to_string() },
                Utc::now(),
            )
            .await
            .expect("insert");
        let id = inserted.id.expect("id");

        store
            .update(
                id,
                HeroImageDraft { src: "/uploads/h1b.png".to_string(), alt: "new".to_string() },
                Utc::now(),
            )
            .await
            .expect("update existing");

        let listed = store.list_all().await.expect("list");
        assert_eq!(listed[0].alt, "new");

        store.delete(id).await.expect("delete existing");
        let missing = store.delete(id).await;
        assert!(matches!(missing, Err(RepositoryError::MissingHeroImage(_))));
    }
}
