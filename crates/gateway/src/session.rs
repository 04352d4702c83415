//! Session resolution
//!
//! The gateway never issues credentials; sign-in, sign-up and sign-out live
//! in the auth service. Here we only answer one question per request: does
//! it carry a valid access token, and for which user?

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use uuid::Uuid;

use quiver_shared::Session;

/// Claims of an auth-service access token. Only the fields the gateway reads.
#[derive(Debug, Deserialize)]
struct AccessClaims {
    /// Subject (user ID as string, will be parsed to UUID)
    sub: String,
    /// Email, if the auth service included one
    email: Option<String>,
    /// Expiration
    #[allow(dead_code)]
    exp: i64,
}

/// Errors that can occur during session resolution
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Token has expired")]
    Expired,
    #[error("Invalid token")]
    Invalid,
    #[error("Auth service unavailable: {0}")]
    Unavailable(String),
}

/// Resolves the session attached to a request, if any.
///
/// `Ok(None)` means the request is anonymous. An `Err` is recoverable: the
/// router downgrades the request to anonymous handling for this request only.
#[async_trait]
pub trait SessionResolver: Send + Sync {
    async fn resolve(&self, headers: &HeaderMap) -> Result<Option<Session>, SessionError>;
}

/// Validates auth-service access tokens locally (HS256).
///
/// The token is taken from the `Authorization: Bearer` header or, for
/// browser traffic, the session cookie.
pub struct JwtSessionResolver {
    decoding_key: DecodingKey,
    cookie_name: String,
}

impl JwtSessionResolver {
    pub fn new(secret: &str, cookie_name: impl Into<String>) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            cookie_name: cookie_name.into(),
        }
    }

    fn validate(&self, token: &str) -> Result<Session, SessionError> {
        // Explicit algorithm prevents algorithm confusion attacks
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 60; // 60 second clock skew tolerance

        let claims = decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
                _ => SessionError::Invalid,
            })?
            .claims;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| SessionError::Invalid)?;

        Ok(Session {
            user_id,
            email: claims.email,
        })
    }
}

#[async_trait]
impl SessionResolver for JwtSessionResolver {
    async fn resolve(&self, headers: &HeaderMap) -> Result<Option<Session>, SessionError> {
        let token = bearer_token(headers).or_else(|| cookie_token(headers, &self.cookie_name));
        let Some(token) = token else {
            return Ok(None);
        };

        // A malformed or expired token is an anonymous request, not a failure
        match self.validate(&token) {
            Ok(session) => Ok(Some(session)),
            Err(SessionError::Expired | SessionError::Invalid) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

fn cookie_token(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(name)?.strip_prefix('='))
        .map(|token| token.to_string())
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;
    use time::{Duration, OffsetDateTime};

    const SECRET: &str = "test-session-secret-at-least-32-chars!";
    const COOKIE: &str = "qv-access-token";

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        email: Option<String>,
        iat: i64,
        exp: i64,
    }

    fn make_token(secret: &str, user_id: Uuid, ttl: Duration) -> String {
        let now = OffsetDateTime::now_utc();
        let claims = TestClaims {
            sub: user_id.to_string(),
            email: Some("coach@bowman.example".to_string()),
            iat: now.unix_timestamp(),
            exp: (now + ttl).unix_timestamp(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn resolver() -> JwtSessionResolver {
        JwtSessionResolver::new(SECRET, COOKIE)
    }

    #[tokio::test]
    async fn test_bearer_token_resolves() {
        let user_id = Uuid::new_v4();
        let token = make_token(SECRET, user_id, Duration::hours(1));

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );

        let session = resolver().resolve(&headers).await.unwrap();
        assert_eq!(session.map(|s| s.user_id), Some(user_id));
    }

    #[tokio::test]
    async fn test_cookie_token_resolves() {
        let user_id = Uuid::new_v4();
        let token = make_token(SECRET, user_id, Duration::hours(1));

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {COOKIE}={token}; lang=en")).unwrap(),
        );

        let session = resolver().resolve(&headers).await.unwrap();
        assert_eq!(session.map(|s| s.user_id), Some(user_id));
    }

    #[tokio::test]
    async fn test_no_token_is_anonymous() {
        let headers = HeaderMap::new();
        let session = resolver().resolve(&headers).await.unwrap();
        assert!(session.is_none());
    }

    #[tokio::test]
    async fn test_expired_token_is_anonymous() {
        // Past the 60s validation leeway
        let token = make_token(SECRET, Uuid::new_v4(), Duration::minutes(-5));

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );

        let session = resolver().resolve(&headers).await.unwrap();
        assert!(session.is_none());
    }

    #[tokio::test]
    async fn test_wrong_signature_is_anonymous() {
        let token = make_token(
            "another-secret-that-is-also-32-chars!!",
            Uuid::new_v4(),
            Duration::hours(1),
        );

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );

        let session = resolver().resolve(&headers).await.unwrap();
        assert!(session.is_none());
    }

    #[tokio::test]
    async fn test_garbage_cookie_is_anonymous() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("qv-access-token=not-a-jwt"),
        );

        let session = resolver().resolve(&headers).await.unwrap();
        assert!(session.is_none());
    }
}
