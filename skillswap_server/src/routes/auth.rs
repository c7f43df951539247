use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State as AxumState},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use skillswap_core::auth::LoginResponse;

use crate::{error::AppError, extract::AuthUser, state::State};

/// Missing fields deserialize as empty strings and fail validation with 400.
#[derive(Deserialize)]
pub struct Credentials {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

pub async fn register_handler(
    AxumState(state): AxumState<Arc<State>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    let user = state
        .accounts
        .register(&payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered", "user": user })),
    ))
}

pub async fn login_handler(
    AxumState(state): AxumState<Arc<State>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(payload) = payload?;
    let login = state
        .accounts
        .login(&payload.email, &payload.password)
        .await?;
    Ok(Json(login))
}

pub async fn dashboard_handler(user: AuthUser) -> impl IntoResponse {
    Json(json!({ "message": format!("Welcome back, {}!", user.email) }))
}
