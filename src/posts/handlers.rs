use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    accounts::extractors::AuthUser,
    error::{AppError, ValidationError},
    posts::dto::{CreatePostRequest, PostResponse},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/posts", post(create_post).get(list_my_posts))
}

#[instrument(skip(state, payload))]
async fn create_post(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
    Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    if payload.title.trim().is_empty() {
        return Err(ValidationError::new("title", "must not be empty").into());
    }
    let post = state
        .content
        .create(account_id, payload.title.trim(), &payload.body)
        .await?;
    Ok((StatusCode::CREATED, Json(PostResponse::from(post))))
}

#[instrument(skip(state))]
async fn list_my_posts(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    let posts = state.content.list_by_author(account_id).await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}
