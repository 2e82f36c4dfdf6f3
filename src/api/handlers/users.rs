use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    api::{extract::ApiJson, middleware::auth::CurrentUser, state::AppState},
    domain::{RegisterRequest, Role},
    error::Result,
};

pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    state.service_context.registration_service.register(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "detail": "Account created successfully. You can now log in." })),
    ))
}

#[derive(Debug, Serialize)]
pub struct MeDto {
    id: i64,
    email: Option<String>,
    phone_number: Option<String>,
    full_name: String,
    role: Role,
    is_superuser: bool,
}

pub async fn me(Extension(current): Extension<CurrentUser>) -> Json<MeDto> {
    let user = current.user;
    Json(MeDto {
        id: user.id,
        email: user.email,
        phone_number: user.phone_number,
        full_name: user.full_name,
        role: user.role,
        is_superuser: user.is_superuser,
    })
}
