use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    api::{extract::ApiJson, middleware::auth::CurrentUser, state::AppState},
    domain::{user::contact_of, CooperativeChoice, CooperativeDetail, CreateCooperativeRequest},
    error::Result,
};

#[derive(Debug, Serialize)]
pub struct CooperativeDto {
    id: i64,
    name: String,
    members: Vec<MemberDto>,
    admins: Vec<AdminDto>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct MemberDto {
    id: i64,
    email: String,
    is_verified: bool,
}

#[derive(Debug, Serialize)]
pub struct AdminDto {
    id: i64,
    email: String,
}

impl From<CooperativeDetail> for CooperativeDto {
    fn from(detail: CooperativeDetail) -> Self {
        Self {
            id: detail.cooperative.id,
            name: detail.cooperative.name,
            members: detail
                .members
                .into_iter()
                .map(|m| MemberDto {
                    id: m.user_id,
                    email: contact_of(m.email.as_deref(), m.phone_number.as_deref()),
                    is_verified: m.is_verified,
                })
                .collect(),
            admins: detail
                .admins
                .into_iter()
                .map(|a| AdminDto {
                    id: a.user_id,
                    email: contact_of(a.email.as_deref(), a.phone_number.as_deref()),
                })
                .collect(),
            created_at: detail.cooperative.created_at,
            updated_at: detail.cooperative.updated_at,
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Vec<CooperativeDto>>> {
    let cooperatives = state.service_context.cooperative_service
        .list(&current.user)
        .await?;

    Ok(Json(cooperatives.into_iter().map(Into::into).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ApiJson(req): ApiJson<CreateCooperativeRequest>,
) -> Result<(StatusCode, Json<CooperativeDto>)> {
    let cooperative = state.service_context.cooperative_service
        .create(&current.user, &req.name)
        .await?;

    Ok((StatusCode::CREATED, Json(cooperative.into())))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<CooperativeDto>> {
    let cooperative = state.service_context.cooperative_service
        .get(&current.user, id)
        .await?;

    Ok(Json(cooperative.into()))
}

pub async fn signup_choices(State(state): State<AppState>) -> Json<Vec<CooperativeChoice>> {
    Json(state.service_context.cooperative_service.signup_choices().await)
}

#[derive(Debug, Serialize)]
pub struct MembershipStateDto {
    id: i64,
    is_verified: bool,
}

pub async fn verify_member(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((cooperative_id, member_id)): Path<(i64, i64)>,
) -> Result<Json<MembershipStateDto>> {
    let membership = state.service_context.cooperative_service
        .verify_member(&current.user, cooperative_id, member_id)
        .await?;

    Ok(Json(MembershipStateDto {
        id: membership.user_id,
        is_verified: membership.is_verified,
    }))
}
