use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{EmailQuery, UserInfoReq, UserLoginReq, UsernameQuery, VerifyQuery},
        services,
    },
    error::ApiError,
    extract::{ApiJson, ApiQuery},
    responses::{BooleanResponse, IdResponse, TokenResponse},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/Auth/Authorize", post(authorize))
        .route("/Auth/CheckIsEmailExist", get(check_is_email_exist))
        .route("/Auth/CheckIsUsernameExist", get(check_is_username_exist))
        .route("/Auth/Registrate", post(registrate))
        .route("/Auth/Verify", post(verify))
}

#[instrument(skip(state, payload))]
pub async fn authorize(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<UserLoginReq>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = services::authorize(&state, payload).await?;
    Ok(Json(TokenResponse { token }))
}

#[instrument(skip(state))]
pub async fn check_is_email_exist(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<EmailQuery>,
) -> Result<Json<BooleanResponse>, ApiError> {
    let result = services::email_exists(&state, &q.email).await?;
    Ok(Json(BooleanResponse { result }))
}

#[instrument(skip(state))]
pub async fn check_is_username_exist(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<UsernameQuery>,
) -> Result<Json<BooleanResponse>, ApiError> {
    let result = services::username_exists(&state, &q.username).await?;
    Ok(Json(BooleanResponse { result }))
}

#[instrument(skip(state, payload))]
pub async fn registrate(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<UserInfoReq>,
) -> Result<Json<IdResponse>, ApiError> {
    let id = services::registrate(&state, payload).await?;
    Ok(Json(IdResponse { id }))
}

#[instrument(skip(state, code))]
pub async fn verify(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<VerifyQuery>,
    ApiJson(code): ApiJson<String>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = services::verify(&state, q.pending_reg_id, &code).await?;
    Ok(Json(TokenResponse { token }))
}
