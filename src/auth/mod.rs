pub mod password;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::SecurityConfig;

/// Token claims. Only the subject is encoded: no `iat` or `exp`, so a user's
/// token is stable across logins for a given secret.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token signing failed: {0}")]
    Signing(jsonwebtoken::errors::Error),

    #[error("Invalid token")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Issues and verifies stateless HS256 bearer tokens
#[derive(Clone)]
pub struct TokenService {
    keys: Arc<Keys>,
    validation: Validation,
}

impl TokenService {
    pub fn new(config: &SecurityConfig) -> Self {
        let secret = config.token_secret.as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret),
                decoding: DecodingKey::from_secret(secret),
            }),
            validation,
        }
    }

    pub fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), &Claims { sub: user_id }, &self.keys.encoding)
            .map_err(TokenError::Signing)
    }

    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        decode::<Claims>(token.trim(), &self.keys.decoding, &self.validation)
            .map(|data| data.claims.sub)
            .map_err(TokenError::Invalid)
    }
}

/// Pulls the token out of an `authorization` header value. Clients send it
/// either raw or as `Bearer <token>`; the scheme is case-insensitive.
pub fn token_from_header(value: &str) -> Option<&str> {
    const SCHEME: &str = "bearer ";
    let token = match value.get(..SCHEME.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(SCHEME) => &value[SCHEME.len()..],
        _ => value,
    }
    .trim();
    (!token.is_empty()).then_some(token)
}
