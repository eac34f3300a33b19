//! Bearer tokens for API tests
//!
//! The service only verifies tokens; these are minted the way an identity
//! provider would, signed with a shared test secret.

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};

use core_kernel::UserId;
use domain_claims::Role;
use interface_api::auth::TokenClaims;

/// Signs a token for `user_id` holding `roles`, valid for `ttl_secs`
///
/// A negative `ttl_secs` yields a token that is already expired.
pub fn issue_token(user_id: UserId, roles: &[Role], secret: &str, ttl_secs: i64) -> String {
    let now = Utc::now();
    sign_claims(
        &TokenClaims {
            sub: user_id.to_string(),
            roles: roles.iter().map(|r| r.as_str().to_string()).collect(),
            exp: (now + Duration::seconds(ttl_secs)).timestamp(),
            iat: now.timestamp(),
        },
        secret,
    )
}

/// Signs arbitrary claims, e.g. a malformed subject
pub fn sign_claims(claims: &TokenClaims, secret: &str) -> String {
    encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_bytes()))
        .expect("HS256 signing with a byte secret cannot fail")
}
