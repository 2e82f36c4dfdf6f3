pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::{
    config::Settings,
    service::ServiceContext,
};
use state::AppState;

pub fn create_app(service_context: Arc<ServiceContext>, settings: Arc<Settings>) -> Router {
    let cors = cors_layer(&settings);
    let app_state = AppState::new(service_context);

    Router::new()
        .route("/health", get(handlers::root::health_check))

        // Public API routes
        .merge(public_routes())

        // Token-protected API routes
        .merge(protected_routes(app_state.clone()))

        .with_state(app_state)

        // Middleware
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users/register/", post(handlers::users::register))
        .route("/api/token/", post(handlers::auth::obtain_token))
        .route("/api/token/refresh/", post(handlers::auth::refresh_token))
        .route("/api/cooperatives/signup_choices/", get(handlers::cooperatives::signup_choices))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    // Full paths rather than `nest`: a nested "/" would lose its trailing slash.
    Router::new()
        .route("/api/users/me/", get(handlers::users::me))
        .merge(cooperative_routes())
        .merge(income_routes())
        .merge(contribution_routes())
        .route("/api/income-by-rider/", get(handlers::reports::income_by_rider))
        .route("/api/income-by-cooperative/", get(handlers::reports::income_by_cooperative))
        .route("/api/contributions-summary/", get(handlers::reports::contributions_summary))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_auth,
        ))
}

fn cooperative_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/cooperatives/",
            get(handlers::cooperatives::list).post(handlers::cooperatives::create),
        )
        .route("/api/cooperatives/:id/", get(handlers::cooperatives::get))
        .route(
            "/api/cooperatives/:id/members/:member_id/verify/",
            post(handlers::cooperatives::verify_member),
        )
}

fn income_routes() -> Router<AppState> {
    Router::new()
        .route("/api/income/", get(handlers::income::list).post(handlers::income::create))
        .route("/api/income/summary/", get(handlers::income::summary))
        .route("/api/income/stats/", get(handlers::income::stats))
        .route("/api/income/:id/", get(handlers::income::get))
}

fn contribution_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/contributions/",
            get(handlers::contributions::list).post(handlers::contributions::create),
        )
        .route("/api/contributions/:id/", get(handlers::contributions::get))
        .route("/api/contributions/:id/verify/", post(handlers::contributions::verify))
}

fn cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<HeaderValue> = settings
        .cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
