//! Session extraction from bearer tokens
//!
//! Tokens are issued elsewhere; this service only verifies them. A request
//! with a valid access token gets an [`AuthUser`] in its extensions, any other
//! request is handled as anonymous.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{error::ApiError, state::AppState};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID, native or legacy
    pub sub: String,
    /// Username at the time the token was issued
    #[serde(default)]
    pub username: Option<String>,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
    /// Token type (access or refresh)
    pub token_type: TokenType,
}

/// Token type enum
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub enum TokenType {
    /// Access token
    Access,
    /// Refresh token
    Refresh,
}

/// Authenticated user of the current request
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    /// Opaque user id carried by the session
    pub id: String,
    pub username: Option<String>,
}

/// JWT configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Public key for verifying tokens, PEM text or a path to a PEM file
    pub public_key: String,
}

impl JwtConfig {
    /// The PEM text, read from disk when `public_key` is a path
    pub fn public_key_pem(&self) -> Result<String> {
        if self.public_key.starts_with("-----BEGIN") {
            return Ok(self.public_key.clone());
        }

        let pem = std::fs::read_to_string(&self.public_key)
            .or_else(|_| {
                // Try resolving relative to the crate root
                let mut path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
                path.push(&self.public_key);
                std::fs::read_to_string(path)
            })
            .map_err(|e| anyhow::anyhow!("Failed to read public key file: {}", e))?;

        Ok(pem.trim().to_string())
    }
}

/// Verifies RS256 access tokens
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: Arc<DecodingKey>,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(config: &JwtConfig) -> Result<Self> {
        let pem = config.public_key_pem()?;
        let decoding_key = DecodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| anyhow::anyhow!("Failed to create decoding key: {}", e))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = true;

        Ok(Self {
            decoding_key: Arc::new(decoding_key),
            validation,
        })
    }

    /// Validate an access token and return its user
    pub fn verify(&self, token: &str) -> Result<AuthUser> {
        let token_data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;

        if token_data.claims.token_type != TokenType::Access {
            anyhow::bail!("refresh token used as access token");
        }

        Ok(AuthUser {
            id: token_data.claims.sub,
            username: token_data.claims.username,
        })
    }
}

/// Attach the session user, if any, to the request
pub async fn session_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(TypedHeader(Authorization(bearer))) = bearer {
        match state.jwt.verify(bearer.token()) {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e) => warn!("Ignoring invalid bearer token: {}", e),
        }
    }

    next.run(req).await
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(ApiError::Unauthorized)
    }
}

#[cfg(test)]
pub(crate) mod test_tokens {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    const PRIVATE_KEY: &str = include_str!("../fixtures/jwt_test_private.pem");
    pub const PUBLIC_KEY: &str = include_str!("../fixtures/jwt_test_public.pem");

    pub fn verifier() -> JwtVerifier {
        JwtVerifier::new(&JwtConfig {
            public_key: PUBLIC_KEY.to_string(),
        })
        .unwrap()
    }

    pub fn token(sub: &str, token_type: TokenType, ttl_secs: i64) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        let claims = Claims {
            sub: sub.to_string(),
            username: Some("tester".to_string()),
            iat: now,
            exp: now.saturating_add_signed(ttl_secs),
            token_type,
        };
        let key = EncodingKey::from_rsa_pem(PRIVATE_KEY.as_bytes()).unwrap();
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key).unwrap()
    }

    pub fn access_token(sub: &str) -> String {
        token(sub, TokenType::Access, 900)
    }
}
