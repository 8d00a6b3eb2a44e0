use std::sync::Arc;

use crate::api::jwt::AuthJwtPayload;
use crate::database::{Session, User};
use crate::global::Global;

#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    #[error("token must be ascii only")]
    HeaderToStr,
    #[error("token must be a bearer token")]
    NotBearerToken,
    #[error("invalid token")]
    InvalidToken,
    #[error("session expired")]
    SessionExpired,
    #[error("failed to fetch session")]
    FetchSession,
    #[error("failed to fetch user")]
    FetchUser,
    #[error("user not found")]
    UserNotFound,
}

/// The resolved identity for a request that presented a valid session
/// token.
#[derive(Clone)]
pub struct AuthData {
    pub session: Session,
    pub user: User,
}

impl AuthData {
    pub async fn from_session(global: &Arc<Global>, session: Session) -> Result<Self, AuthError> {
        let user = User::find_by_id(global.database(), session.user_id)
            .await
            .map_err(|_| AuthError::FetchUser)?
            .ok_or(AuthError::UserNotFound)?;

        Ok(Self { session, user })
    }

    pub async fn from_token(global: &Arc<Global>, token: &str) -> Result<Self, AuthError> {
        let jwt = AuthJwtPayload::verify(&global.config().jwt, token).ok_or(AuthError::InvalidToken)?;

        let session = Session::find_and_touch(global.database(), jwt.session_id)
            .await
            .map_err(|_| AuthError::FetchSession)?
            .ok_or(AuthError::InvalidToken)?;

        if !session.is_valid() {
            return Err(AuthError::SessionExpired);
        }

        Self::from_session(global, session).await
    }
}
