use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::identity::IdentityRef;
use crate::AppState;

/// Claims issued by the identity provider. `sub` carries the identity UUID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Verifies identity tokens. Tokens are never issued here.
#[derive(Clone)]
pub struct IdentityVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl IdentityVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<IdentityRef> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "identity token rejected");
            Error::Unauthorized("invalid_token".to_string())
        })?;
        let id = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| Error::Unauthorized("invalid_subject".to_string()))?;
        Ok(IdentityRef(id))
    }
}

fn bearer_token(parts: &Parts) -> Result<&str> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::Unauthorized("missing_authorization".to_string()))?;
    let value = header
        .to_str()
        .map_err(|_| Error::Unauthorized("bad_authorization".to_string()))?;
    value
        .strip_prefix("Bearer ")
        .ok_or_else(|| Error::Unauthorized("unsupported_scheme".to_string()))
}

/// Handlers that take an `IdentityRef` require a valid bearer token;
/// `Option<IdentityRef>` lets anonymous callers through.
#[axum::async_trait]
impl FromRequestParts<AppState> for IdentityRef {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        state.identity_verifier.verify(token)
    }
}
