use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::{self, AuthUser};
use crate::error::ApiError;

/// Credential verifier: bearer token in, principal or 401 out.
///
/// Every failure mode - missing header, malformed header, empty token,
/// unverifiable token, unconfigured secret - collapses into the same
/// uniform 401. Fail closed, no partial trust.
pub async fn require_auth(headers: HeaderMap, mut request: Request, next: Next) -> Response {
    match verify_bearer(&headers) {
        Some(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        None => ApiError::Unauthorized.into_response(),
    }
}

/// Resolve a principal from request headers. Returns None on any failure;
/// the reason is logged but never surfaced to the caller.
pub fn verify_bearer(headers: &HeaderMap) -> Option<AuthUser> {
    let token = match extract_bearer(headers) {
        Ok(t) => t,
        Err(msg) => {
            tracing::debug!("auth rejected: {}", msg);
            return None;
        }
    };

    match auth::verify_token(&token) {
        Ok(claims) => Some(AuthUser::from(claims)),
        Err(e) => {
            tracing::debug!("auth rejected: {}", e);
            None
        }
    }
}

/// Extract the bearer token from the Authorization header
fn extract_bearer(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .ok_or_else(|| "missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("empty bearer token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
