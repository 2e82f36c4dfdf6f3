use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    api::{extract::ApiJson, handlers::RangeParams, middleware::auth::CurrentUser, state::AppState},
    domain::{IncomeRecord, IncomeSummary, LedgerEntryRequest, StatPoint, StatsGrouping},
    error::{AppError, Result},
};

pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<RangeParams>,
) -> Result<Json<Vec<IncomeRecord>>> {
    let filter = params.filter()?;
    let records = state.service_context.income_service
        .list(&current.user, &filter)
        .await?;

    Ok(Json(records))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ApiJson(req): ApiJson<LedgerEntryRequest>,
) -> Result<(StatusCode, Json<IncomeRecord>)> {
    let record = state.service_context.income_service
        .create(&current.user, req)
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<IncomeRecord>> {
    let record = state.service_context.income_service
        .get(&current.user, id)
        .await?;

    Ok(Json(record))
}

pub async fn summary(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<RangeParams>,
) -> Result<Json<IncomeSummary>> {
    let range = params.range()?;
    let summary = state.service_context.income_service
        .summary(&current.user, &range)
        .await?;

    Ok(Json(summary))
}

#[derive(Debug, Default, Deserialize)]
pub struct StatsParams {
    pub group_by: Option<String>,
    pub year: Option<String>,
}

impl StatsParams {
    fn parse(&self) -> Result<(StatsGrouping, Option<i32>)> {
        let grouping = match self.group_by.as_deref().map(str::trim).filter(|g| !g.is_empty()) {
            None => StatsGrouping::default(),
            Some(g) => g.parse().map_err(|e: String| AppError::field("group_by", e))?,
        };

        let year = match self.year.as_deref().map(str::trim).filter(|y| !y.is_empty()) {
            None => None,
            Some(y) => Some(
                y.parse::<i32>()
                    .map_err(|_| AppError::field("year", "A valid integer is required."))?,
            ),
        };

        Ok((grouping, year))
    }
}

pub async fn stats(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<StatsParams>,
) -> Result<Json<Vec<StatPoint>>> {
    let (grouping, year) = params.parse()?;
    let points = state.service_context.income_service
        .stats(&current.user, grouping, year)
        .await?;

    Ok(Json(points))
}
