use serde::Deserialize;
use uuid::Uuid;

/// Body for creating or replacing a category.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCreationReq {
    pub name: String,
    pub photo_path: String,
    #[serde(default)]
    pub parent_category_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default)]
    pub parent_category_id: Option<Uuid>,
}
