use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use yardage_core::domain::product::{Product, ProductDraft, ProductId};

use super::{ProductStore, RepositoryError};
use crate::DbPool;

pub struct SqlProductStore {
    pool: DbPool,
}

impl SqlProductStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn decode_product(row: SqliteRow) -> Result<Product, RepositoryError> {
    let price_text: String = row.try_get("price")?;
    let price = Decimal::from_str(&price_text).map_err(|_| {
        RepositoryError::Decode(format!("product price `{price_text}` is not a decimal"))
    })?;

    Ok(Product {
        id: ProductId(row.try_get("id")?),
        name: row.try_get("name")?,
        price,
        image: row.try_get("image")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait::async_trait]
impl ProductStore for SqlProductStore {
    async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, price, image, created_at, updated_at
             FROM products
             ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(decode_product).collect()
    }

    async fn insert(&self, product: Product) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO products (id, name, price, image, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(product.id.0)
        .bind(product.name)
        .bind(product.price.to_string())
        .bind(product.image)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(
        &self,
        id: &ProductId,
        draft: ProductDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE products SET name = ?1, price = ?2, image = ?3, updated_at = ?4
             WHERE id = ?5",
        )
        .bind(draft.name)
        .bind(draft.price.to_string())
        .bind(draft.image)
        .bind(updated_at)
        .bind(&id.0)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::MissingProduct(id.0.clone()));
        }
        Ok(())
    }

    async fn delete(&self, id: &ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(&id.0)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::MissingProduct(id.0.clone()));
        }
        Ok(())
    }
}
