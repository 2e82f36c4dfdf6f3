use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{
    api::{extract::ApiJson, state::AppState},
    auth::TokenPair,
    error::Result,
};

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    /// Email or phone number.
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn obtain_token(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<TokenRequest>,
) -> Result<Json<TokenPair>> {
    let pair = state.service_context.auth_service
        .login(&req.username, &req.password)
        .await?;

    Ok(Json(pair))
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access: String,
}

pub async fn refresh_token(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RefreshRequest>,
) -> Result<Json<RefreshResponse>> {
    let access = state.service_context.auth_service.refresh(&req.refresh)?;
    Ok(Json(RefreshResponse { access }))
}
