//! # Auth Guard
//!
//! HS256 access tokens and the three route guards built on them:
//!
//! - [`verify_token`]: valid bearer token, claims stored in request extensions
//! - [`verify_admin`]: the claimed user has the `admin` role
//! - [`verify_owner`]: the path's subject equals the claimed email
//!
//! The router composes them per route (see [`crate::routes::Access`]).

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiPath;
use crate::state::AppState;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    #[serde(default)]
    pub iat: i64,
    pub exp: i64,
    /// Whatever else the client put in the token request
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /jwt`
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRequest {
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Signing and verification keys for one shared secret
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_seconds: i64,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl_seconds: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    /// Sign the request payload with `iat` now and `exp` one TTL later
    pub fn issue(&self, request: TokenRequest) -> ApiResult<String> {
        let mut extra = request.extra;
        // Timing claims are always set by the server
        extra.remove("iat");
        extra.remove("exp");

        let now = Utc::now().timestamp();
        let claims = Claims {
            email: request.email,
            iat: now,
            exp: now + self.ttl_seconds,
            extra,
        };
        self.sign(&claims)
    }

    pub fn sign(&self, claims: &Claims) -> ApiResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| ApiError::Internal(format!("token signing failed: {}", e)))
    }

    /// Decode and check signature and expiry
    pub fn verify(&self, token: &str) -> ApiResult<Claims> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Token rejected: {}", e);
                ApiError::Unauthorized
            })
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Guard: require a valid bearer token
pub async fn verify_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let Some(token) = bearer_token(request.headers()) else {
        warn!("Missing bearer token for {}", request.uri().path());
        return Err(ApiError::Unauthorized);
    };

    let claims = state.tokens.verify(token)?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Guard: require the caller's stored role to be admin. Runs after [`verify_token`].
pub async fn verify_admin(
    State(state): State<AppState>,
    claims: Claims,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let is_admin = state
        .store
        .find_user_by_email(&claims.email)
        .await?
        .is_some_and(|user| user.is_admin());

    if !is_admin {
        warn!("Admin access denied for {}", claims.email);
        return Err(ApiError::Forbidden);
    }
    Ok(next.run(request).await)
}

/// Guard: the last path parameter must equal the claimed email. Runs after
/// [`verify_token`].
pub async fn verify_owner(
    claims: Claims,
    ApiPath(params): ApiPath<Vec<(String, String)>>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let subject = params.last().map(|(_, value)| value.as_str());
    if subject != Some(claims.email.as_str()) {
        warn!("Owner access denied for {}: path {:?}", claims.email, subject);
        return Err(ApiError::Forbidden);
    }
    Ok(next.run(request).await)
}

impl<S: Send + Sync> FromRequestParts<S> for Claims {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .ok_or(ApiError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn keys() -> TokenKeys {
        TokenKeys::new("kitchen-secret", 3600)
    }

    fn request(email: &str) -> TokenRequest {
        let mut extra = Map::new();
        extra.insert("name".into(), Value::String("Ana".into()));
        extra.insert("exp".into(), Value::from(1));
        TokenRequest {
            email: email.into(),
            extra,
        }
    }

    #[test]
    fn test_issue_then_verify() {
        let keys = keys();
        let token = keys.issue(request("ana@bistro.io")).unwrap();
        let claims = keys.verify(&token).unwrap();

        assert_eq!(claims.email, "ana@bistro.io");
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(claims.extra.get("name"), Some(&Value::String("Ana".into())));
        assert!(!claims.extra.contains_key("exp"));
    }

    #[test]
    fn test_expired_token_rejected() {
        let keys = keys();
        let past = Utc::now().timestamp() - 7200;
        let token = keys
            .sign(&Claims {
                email: "ana@bistro.io".into(),
                iat: past - 3600,
                exp: past,
                extra: Map::new(),
            })
            .unwrap();

        assert!(matches!(keys.verify(&token), Err(ApiError::Unauthorized)));
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let token = TokenKeys::new("other-secret", 3600)
            .issue(request("ana@bistro.io"))
            .unwrap();
        assert!(matches!(keys().verify(&token), Err(ApiError::Unauthorized)));
        assert!(matches!(keys().verify("not.a.jwt"), Err(ApiError::Unauthorized)));
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);
    }
}
