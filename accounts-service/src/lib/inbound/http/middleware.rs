use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;
use session_auth::Role;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Identity attached to a request once its token has verified.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub username: String,
    pub role: Role,
}

/// Middleware that verifies the bearer token and attaches the caller identity.
///
/// Every rejection carries the same 401 body, whether the token was missing,
/// malformed, wrongly signed, or expired; the precise reason only goes to the
/// log. Callers must not be able to probe which case they hit.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?;

    let claims = state
        .token_codec
        .verify(token, state.clock.now())
        .map_err(|e| {
            tracing::warn!("Token verification failed: {}", e);
            unauthorized_response()
        })?;

    req.extensions_mut().insert(AuthenticatedUser {
        username: claims.sub,
        role: claims.role,
    });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            tracing::warn!("Missing Authorization header");
            unauthorized_response()
        })?;

    let auth_str = auth_header.to_str().map_err(|_| {
        tracing::warn!("Authorization header is not valid UTF-8");
        unauthorized_response()
    })?;

    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        tracing::warn!("Authorization header is not a bearer token");
        return Err(unauthorized_response());
    };

    Ok(token)
}

fn unauthorized_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "Invalid or expired token"
        })),
    )
        .into_response()
}

/// Extractor for the verified identity of the caller.
///
/// Handlers take this to receive the identity explicitly instead of digging
/// through request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthenticatedUser);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
    }
}

/// Extractor that admits only callers holding the admin role.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthenticatedUser);

#[axum::async_trait]
impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

        if user.role != Role::Admin {
            return Err(ApiError::Forbidden("Admin role required".to_string()));
        }

        Ok(RequireAdmin(user))
    }
}
