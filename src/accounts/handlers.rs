use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    accounts::{
        dto::{LoginRequest, PublicAccount, RegisterRequest, SessionResponse, UpdateAccountRequest},
        extractors::AuthUser,
        jwt::SessionKeys,
        repo::Account,
        services,
    },
    error::{AppError, AuthError},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/accounts", post(register))
        .route("/accounts/login", post(login))
        .route("/accounts/me", get(me).patch(update_me).delete(delete_me))
}

#[instrument(skip(state, payload))]
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let account = services::register(&state.db, payload).await?;
    let keys = SessionKeys::from_ref(&state);
    let token = services::issue_session(&state.db, &keys, &account).await?;
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            token,
            account: PublicAccount::from(account),
        }),
    ))
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let account = services::authenticate(&state.db, &payload.email, &payload.password).await?;
    let keys = SessionKeys::from_ref(&state);
    let token = services::issue_session(&state.db, &keys, &account).await?;
    Ok(Json(SessionResponse {
        token,
        account: PublicAccount::from(account),
    }))
}

#[instrument(skip(state))]
async fn me(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
) -> Result<Json<PublicAccount>, AppError> {
    let account = Account::find_by_id(&state.db, account_id)
        .await?
        .ok_or(AuthError::NotFound)?;
    Ok(Json(PublicAccount::from(account)))
}

#[instrument(skip(state, payload))]
async fn update_me(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
    Json(payload): Json<UpdateAccountRequest>,
) -> Result<Json<PublicAccount>, AppError> {
    let account = services::update_account(&state.db, account_id, payload).await?;
    Ok(Json(PublicAccount::from(account)))
}

#[instrument(skip(state))]
async fn delete_me(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
) -> Result<StatusCode, AppError> {
    services::remove_account(&state.db, state.content.as_ref(), account_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
