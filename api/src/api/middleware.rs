use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use http::header::{self, HeaderValue};

use super::auth::{AuthData, AuthError};
use crate::global::Global;

/// Resolves the Authorization header into [`AuthData`] request
/// extensions. A missing or invalid token does not fail the request here;
/// handlers that need a session decide that themselves.
pub async fn auth_middleware(
    State(global): State<Arc<Global>>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(value) = req.headers().get(header::AUTHORIZATION).cloned() {
        match resolve(&global, &value).await {
            Ok(data) => {
                req.extensions_mut().insert(data);
            }
            Err(err) => tracing::debug!("discarding authorization header: {err}"),
        }
    }

    next.run(req).await
}

async fn resolve(global: &Arc<Global>, value: &HeaderValue) -> Result<AuthData, AuthError> {
    let token = value
        .to_str()
        .map_err(|_| AuthError::HeaderToStr)?
        .strip_prefix("Bearer ")
        .ok_or(AuthError::NotBearerToken)?;

    AuthData::from_token(global, token).await
}
