//! Authentication
//!
//! Bearer JWTs carry the caller's user id and role names. Verification
//! produces a [`domain_claims::Actor`]; all capability checks happen against
//! that actor. Tokens are issued elsewhere and only verified here.

use jsonwebtoken::{decode, errors::ErrorKind as JwtErrorKind, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use core_kernel::UserId;
use domain_claims::{Actor, Role};

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// User's roles
    pub roles: Vec<String>,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Invalid subject")]
    InvalidSubject,
}

/// Validates a token's signature and expiry
pub fn validate_token(token: &str, secret: &str) -> Result<TokenClaims, AuthError> {
    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        JwtErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

/// Verifies a token and builds the caller from it
///
/// Unknown role names are ignored.
pub fn authenticate(token: &str, secret: &str) -> Result<Actor, AuthError> {
    let claims = validate_token(token, secret)?;
    let id: UserId = claims.sub.parse().map_err(|_| AuthError::InvalidSubject)?;
    Ok(Actor::from_role_names(id, claims.roles.iter().map(String::as_str)))
}
