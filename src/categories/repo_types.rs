use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub photo_path: String,
    pub parent_category_id: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Writable part of a category, already validated.
#[derive(Debug, Clone)]
pub struct CategoryFields {
    pub name: String,
    pub photo_path: String,
    pub parent_category_id: Option<Uuid>,
}
