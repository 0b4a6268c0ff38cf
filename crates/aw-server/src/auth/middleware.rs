//! Axum middleware enforcing bearer authentication

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::jwt::{extract_bearer_token, JwtConfig};
use crate::error::AppError;

/// Reject the request with 401 unless it carries a valid bearer token
///
/// On success the decoded [`super::Claims`] are stored in the request
/// extensions for downstream handlers.
pub async fn require_auth(
    State(jwt): State<Arc<JwtConfig>>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let claims = match extract_bearer_token(header).and_then(|token| jwt.validate_token(token)) {
        Ok(claims) => claims,
        Err(e) => return AppError::Unauthorized(e.to_string()).into_response(),
    };

    tracing::debug!(subject = %claims.sub, path = %request.uri().path(), "Authenticated request");
    request.extensions_mut().insert(claims);
    next.run(request).await
}
