//! Bearer-token admin authentication.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Token claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: String,
    pub is_admin: bool,
    pub iat: u64,
    pub exp: u64,
}

impl Claims {
    /// Claims for `username`, valid for `ttl_minutes` from now.
    pub fn new(username: impl Into<String>, is_admin: bool, ttl_minutes: u64) -> Self {
        let now = jsonwebtoken::get_current_timestamp();
        Self {
            sub: username.into(),
            is_admin,
            iat: now,
            exp: now + ttl_minutes * 60,
        }
    }
}

pub fn encode_claims(claims: &Claims, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Sign a token for `username`.
pub fn create_token(
    secret: &str,
    username: &str,
    is_admin: bool,
    ttl_minutes: u64,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode_claims(&Claims::new(username, is_admin, ttl_minutes), secret)
}

/// Verify signature and expiry and return the claims.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
}

/// An authenticated administrator. Extracting it rejects the request with
/// 401 unless it carries a valid admin token.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .and_then(|header| header.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;

        let claims = verify_token(token.trim(), &state.secret).map_err(|err| {
            tracing::debug!(error = %err, "token rejected");
            ApiError::unauthorized("Invalid token")
        })?;

        if !claims.is_admin {
            return Err(ApiError::unauthorized("Must be an admin"));
        }

        Ok(AdminUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn token_round_trips_claims() {
        let token = create_token(SECRET, "admin", true, 60).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();

        assert_eq!(claims.sub, "admin");
        assert!(claims.is_admin);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = create_token(SECRET, "admin", true, 60).unwrap();
        assert!(verify_token(&token, "other-secret").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = jsonwebtoken::get_current_timestamp();
        let claims = Claims {
            sub: "admin".into(),
            is_admin: true,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode_claims(&claims, SECRET).unwrap();
        assert!(verify_token(&token, SECRET).is_err());
    }

    #[test]
    fn claims_use_camel_case() {
        let value = serde_json::to_value(Claims::new("u1", false, 1)).unwrap();
        assert_eq!(value["isAdmin"], false);
        assert_eq!(value["sub"], "u1");
    }
}
