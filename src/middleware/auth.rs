use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use log::debug;

use crate::{error::ApiError, utils::verify_token};

/// HS256 secret shared with whoever mints API tokens.
#[derive(Clone)]
pub struct TokenSecret(Arc<str>);

impl TokenSecret {
    pub fn new(secret: &str) -> Self {
        Self(Arc::from(secret))
    }
}

/// Rejects any request without a valid `Authorization: Bearer <jwt>` header.
pub async fn require_token(
    State(secret): State<TokenSecret>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

    let claims = verify_token(&secret.0, token)
        .map_err(|e| ApiError::Unauthorized(format!("Invalid token: {e}")))?;
    debug!("Authorized request from {}", claims.sub);

    Ok(next.run(request).await)
}
