use actix_web::cookie::{time, Cookie, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AuthError};

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // User ID
    pub exp: i64,     // Expiration time
    pub iat: i64,     // Issued at
}

/// Signs and verifies the session token carried in the `session` cookie.
pub struct SessionManager {
    secret_key: String,
    expiry: Duration,
}

impl SessionManager {
    pub fn new(secret_key: String, expiry_hours: i64) -> Self {
        Self {
            secret_key,
            expiry: Duration::hours(expiry_hours),
        }
    }

    pub fn issue_token(&self, user_id: i32) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + self.expiry).timestamp(),
            iat: now.timestamp(),
        };

        sign(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret_key.as_bytes()),
        )
    }

    /// Returns the user id the token was issued for.
    pub fn decode_token(&self, token: &str) -> Result<i32, AppError> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_key.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| AppError::AuthError(AuthError::InvalidSession))?
        .claims;

        claims
            .sub
            .parse()
            .map_err(|_| AppError::AuthError(AuthError::InvalidSession))
    }

    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE, token)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::seconds(self.expiry.num_seconds()))
            .finish()
    }

    pub fn removal_cookie() -> Cookie<'static> {
        let mut cookie = Cookie::build(SESSION_COOKIE, "")
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .finish();
        cookie.make_removal();
        cookie
    }
}

/// Signing failures are server errors; only decoding yields `InvalidSession`.
fn sign(header: &Header, claims: &Claims, key: &EncodingKey) -> Result<String, AppError> {
    encode(header, claims, key)
        .map_err(|e| AppError::InternalError(format!("Failed to sign session token: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let sessions = SessionManager::new("test_secret".into(), 1);
        let token = sessions.issue_token(42).unwrap();
        assert_eq!(sessions.decode_token(&token).unwrap(), 42);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = SessionManager::new("one".into(), 1).issue_token(7).unwrap();
        let result = SessionManager::new("two".into(), 1).decode_token(&token);
        assert!(matches!(result, Err(AppError::AuthError(AuthError::InvalidSession))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let sessions = SessionManager::new("test_secret".into(), -2);
        let token = sessions.issue_token(7).unwrap();
        assert!(sessions.decode_token(&token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let sessions = SessionManager::new("test_secret".into(), 1);
        assert!(sessions.decode_token("not.a.token").is_err());
    }

    #[test]
    fn test_signing_failure_is_internal_error() {
        use actix_web::ResponseError;

        let claims = Claims {
            sub: "7".into(),
            exp: Utc::now().timestamp() + 60,
            iat: Utc::now().timestamp(),
        };
        // An HMAC key cannot produce an RS256 signature.
        let result = sign(
            &Header::new(Algorithm::RS256),
            &claims,
            &EncodingKey::from_secret(b"test_secret"),
        );

        let err = result.unwrap_err();
        assert!(matches!(err, AppError::InternalError(_)));
        assert_eq!(err.status_code(), actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_cookies() {
        let sessions = SessionManager::new("test_secret".into(), 24);
        let cookie = sessions.session_cookie("abc".into());
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.max_age(), Some(time::Duration::hours(24)));

        let removal = SessionManager::removal_cookie();
        assert_eq!(removal.value(), "");
        assert_eq!(removal.max_age(), Some(time::Duration::ZERO));
    }
}
