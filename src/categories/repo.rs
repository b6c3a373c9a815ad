use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::categories::repo_types::{Category, CategoryFields};

#[async_trait]
pub trait CategoryRepo: Send + Sync {
    /// Children of `parent` when given, every category otherwise. Ordered by name.
    async fn list(&self, parent: Option<Uuid>) -> anyhow::Result<Vec<Category>>;
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Category>>;
    async fn create(&self, fields: CategoryFields) -> anyhow::Result<Category>;
    async fn update(&self, id: Uuid, fields: CategoryFields) -> anyhow::Result<Option<Category>>;
    /// Children of a deleted category become roots. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

pub struct PgCategoryRepo {
    db: PgPool,
}

impl PgCategoryRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepo for PgCategoryRepo {
    async fn list(&self, parent: Option<Uuid>) -> anyhow::Result<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, photo_path, parent_category_id, created_at
            FROM categories
            WHERE $1::uuid IS NULL OR parent_category_id = $1
            ORDER BY name ASC
            "#,
        )
        .bind(parent)
        .fetch_all(&self.db)
        .await
        .context("list categories")?;
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, photo_path, parent_category_id, created_at
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("get category")?;
        Ok(row)
    }

    async fn create(&self, fields: CategoryFields) -> anyhow::Result<Category> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (id, name, photo_path, parent_category_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, photo_path, parent_category_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&fields.name)
        .bind(&fields.photo_path)
        .bind(fields.parent_category_id)
        .fetch_one(&self.db)
        .await
        .context("insert category")?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, fields: CategoryFields) -> anyhow::Result<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
               SET name = $2, photo_path = $3, parent_category_id = $4
             WHERE id = $1
            RETURNING id, name, photo_path, parent_category_id, created_at
            "#,
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.photo_path)
        .bind(fields.parent_category_id)
        .fetch_optional(&self.db)
        .await
        .context("update category")?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        // parent_category_id is ON DELETE SET NULL
        let result = sqlx::query(r#"DELETE FROM categories WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete category")?;
        Ok(result.rows_affected() > 0)
    }
}
