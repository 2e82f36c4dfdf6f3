use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    api::{extract::ApiJson, handlers::RangeParams, middleware::auth::CurrentUser, state::AppState},
    domain::{Contribution, ContributionStatus, LedgerEntryRequest},
    error::{AppError, Result},
};

// Not flattened: serde_urlencoded cannot parse numbers through `flatten`.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub status: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Contribution>>> {
    let filter = RangeParams {
        from: params.from,
        to: params.to,
        limit: params.limit,
        offset: params.offset,
    }
    .filter()?;
    let status = match params.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => None,
        Some(s) => Some(
            s.to_ascii_uppercase()
                .parse::<ContributionStatus>()
                .map_err(|e| AppError::field("status", e))?,
        ),
    };

    let contributions = state.service_context.contribution_service
        .list(&current.user, &filter, status)
        .await?;

    Ok(Json(contributions))
}

/// Any client-supplied status is ignored; new contributions start PENDING.
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ApiJson(req): ApiJson<LedgerEntryRequest>,
) -> Result<(StatusCode, Json<Contribution>)> {
    let contribution = state.service_context.contribution_service
        .create(&current.user, req)
        .await?;

    Ok((StatusCode::CREATED, Json(contribution)))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<Contribution>> {
    let contribution = state.service_context.contribution_service
        .get(&current.user, id)
        .await?;

    Ok(Json(contribution))
}

pub async fn verify(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<Contribution>> {
    let contribution = state.service_context.contribution_service
        .verify(&current.user, id)
        .await?;

    Ok(Json(contribution))
}
