use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::{
    api::state::AppState,
    domain::User,
    error::AppError,
};

const NOT_PROVIDED: &str = "Authentication credentials were not provided.";

#[derive(Clone)]
pub struct CurrentUser {
    pub user: User,
}

/// Resolves `Authorization: Bearer <access token>` to an active account and
/// stores it as a [`CurrentUser`] extension.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request)
        .ok_or_else(|| AppError::Unauthorized(NOT_PROVIDED.to_string()))?
        .to_string();

    let user = state.service_context.auth_service.authenticate(&token).await?;

    request.extensions_mut().insert(CurrentUser { user });

    Ok(next.run(request).await)
}

fn bearer_token(request: &Request) -> Option<&str> {
    let value = request.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
