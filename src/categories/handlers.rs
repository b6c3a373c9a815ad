use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    categories::{
        dto::{CategoryCreationReq, ListQuery},
        repo_types::Category,
        services,
    },
    error::ApiError,
    extract::{ApiJson, ApiPath, ApiQuery},
    responses::{IdResponse, MessageResponse},
    state::AppState,
};

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/Category", get(list_categories).post(create_category))
        .route(
            "/Category/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
}

fn not_found(id: Uuid) -> ApiError {
    warn!(%id, "category not found");
    ApiError::bad_request("Category not found")
}

#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<ListQuery>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let rows = state.categories.list(q.parent_category_id).await?;
    Ok(Json(rows))
}

#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Category>, ApiError> {
    let category = state.categories.get(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(category))
}

#[instrument(skip(state, user, payload), fields(username = %user.username))]
pub async fn create_category(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<CategoryCreationReq>,
) -> Result<Json<IdResponse>, ApiError> {
    let fields = services::validate(state.categories.as_ref(), None, payload).await?;
    let category = state.categories.create(fields).await?;
    info!(category_id = %category.id, name = %category.name, "category created");
    Ok(Json(IdResponse { id: category.id }))
}

#[instrument(skip(state, user, payload), fields(username = %user.username))]
pub async fn update_category(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<CategoryCreationReq>,
) -> Result<Json<Category>, ApiError> {
    if state.categories.get(id).await?.is_none() {
        return Err(not_found(id));
    }
    let fields = services::validate(state.categories.as_ref(), Some(id), payload).await?;
    let category = state
        .categories
        .update(id, fields)
        .await?
        .ok_or_else(|| not_found(id))?;
    info!(category_id = %category.id, "category updated");
    Ok(Json(category))
}

#[instrument(skip(state, user), fields(username = %user.username))]
pub async fn delete_category(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.categories.delete(id).await? {
        return Err(not_found(id));
    }
    info!(category_id = %id, "category deleted");
    Ok(Json(MessageResponse {
        message: "Category deleted".into(),
    }))
}
