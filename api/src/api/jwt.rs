use bson::oid::ObjectId;
use chrono::{DateTime, TimeZone, Utc};
use hmac::{Hmac, Mac};
use jwt::{Claims, Header, RegisteredClaims, SignWithKey, Token, VerifyWithKey};
use sha2::Sha256;

use crate::config::JwtConfig;
use crate::database::Session;

/// The claims carried by a session token.
pub struct AuthJwtPayload {
    pub user_id: ObjectId,
    pub session_id: ObjectId,
    pub expiration: Option<DateTime<Utc>>,
    pub issued_at: DateTime<Utc>,
}

impl AuthJwtPayload {
    pub fn serialize(&self, config: &JwtConfig) -> Option<String> {
        let key = Hmac::<Sha256>::new_from_slice(config.secret.as_bytes()).ok()?;

        let claims = Claims {
            registered: RegisteredClaims {
                issuer: Some(config.issuer.clone()),
                subject: Some(self.user_id.to_hex()),
                audience: None,
                expiration: self.expiration.map(|x| x.timestamp() as u64),
                not_before: None,
                issued_at: Some(self.issued_at.timestamp() as u64),
                json_web_token_id: Some(self.session_id.to_hex()),
            },
            private: Default::default(),
        };

        claims.sign_with_key(&key).ok()
    }

    pub fn verify(config: &JwtConfig, token: &str) -> Option<Self> {
        let key = Hmac::<Sha256>::new_from_slice(config.secret.as_bytes()).ok()?;
        let token: Token<Header, Claims, _> = token.verify_with_key(&key).ok()?;

        let claims = token.claims();

        if claims.registered.issuer.as_ref() != Some(&config.issuer) {
            return None;
        }

        let iat = Utc
            .timestamp_opt(claims.registered.issued_at? as i64, 0)
            .single()?;
        if iat > Utc::now() {
            return None;
        }

        let exp = claims
            .registered
            .expiration
            .and_then(|x| Utc.timestamp_opt(x as i64, 0).single());
        if let Some(exp) = exp {
            if exp < Utc::now() {
                return None;
            }
        }

        Some(Self {
            user_id: claims
                .registered
                .subject
                .as_ref()
                .and_then(|x| ObjectId::parse_str(x).ok())?,
            session_id: claims
                .registered
                .json_web_token_id
                .as_ref()
                .and_then(|x| ObjectId::parse_str(x).ok())?,
            expiration: exp,
            issued_at: iat,
        })
    }
}

impl From<&Session> for AuthJwtPayload {
    fn from(session: &Session) -> Self {
        AuthJwtPayload {
            user_id: session.user_id,
            session_id: session.id,
            expiration: Some(session.expires_at),
            issued_at: session.id.timestamp().to_chrono(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::database::PlanType;

    use super::*;

    fn session() -> Session {
        let now = Utc::now();
        Session {
            id: ObjectId::new(),
            user_id: ObjectId::new(),
            email: "a@b.com".to_string(),
            plan_type: PlanType::Professional,
            expires_at: now + chrono::Duration::days(7),
            last_used_at: now,
        }
    }

    #[test]
    fn round_trip() {
        let config = JwtConfig::default();
        let session = session();

        let token = AuthJwtPayload::from(&session).serialize(&config).unwrap();
        let payload = AuthJwtPayload::verify(&config, &token).unwrap();

        assert_eq!(payload.user_id, session.user_id);
        assert_eq!(payload.session_id, session.id);
        assert_eq!(
            payload.expiration.unwrap().timestamp(),
            session.expires_at.timestamp()
        );
    }

    #[test]
    fn rejects_garbage() {
        let config = JwtConfig::default();

        assert!(AuthJwtPayload::verify(&config, "not-a-token").is_none());
        assert!(AuthJwtPayload::verify(&config, "").is_none());
    }

    #[test]
    fn rejects_foreign_issuer() {
        let session = session();
        let foreign = JwtConfig {
            issuer: "someone-else".to_string(),
            ..JwtConfig::default()
        };

        let token = AuthJwtPayload::from(&session).serialize(&foreign).unwrap();

        assert!(AuthJwtPayload::verify(&JwtConfig::default(), &token).is_none());
    }

    #[test]
    fn rejects_wrong_secret() {
        let session = session();
        let other = JwtConfig {
            secret: "a-different-secret".to_string(),
            ..JwtConfig::default()
        };

        let token = AuthJwtPayload::from(&session).serialize(&JwtConfig::default()).unwrap();

        assert!(AuthJwtPayload::verify(&other, &token).is_none());
    }

    #[test]
    fn rejects_expired() {
        let config = JwtConfig::default();
        let mut session = session();
        session.expires_at = Utc::now() - chrono::Duration::hours(1);

        let token = AuthJwtPayload::from(&session).serialize(&config).unwrap();

        assert!(AuthJwtPayload::verify(&config, &token).is_none());
    }
}
