use axum::{
    extract::{Extension, Query, State},
    Json,
};

use crate::{
    api::{handlers::RangeParams, middleware::auth::CurrentUser, state::AppState},
    domain::{ContributionSummary, CooperativeIncomeTotal, ReportRows, RiderIncomeTotal},
    error::Result,
};

pub async fn income_by_rider(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<RangeParams>,
) -> Result<Json<ReportRows<RiderIncomeTotal>>> {
    let results = state.service_context.report_service
        .income_by_rider(&current.user, &params.range()?)
        .await?;

    Ok(Json(ReportRows { results }))
}

pub async fn income_by_cooperative(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<RangeParams>,
) -> Result<Json<ReportRows<CooperativeIncomeTotal>>> {
    let results = state.service_context.report_service
        .income_by_cooperative(&current.user, &params.range()?)
        .await?;

    Ok(Json(ReportRows { results }))
}

pub async fn contributions_summary(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<RangeParams>,
) -> Result<Json<ContributionSummary>> {
    let summary = state.service_context.report_service
        .contributions_summary(&current.user, &params.range()?)
        .await?;

    Ok(Json(summary))
}
