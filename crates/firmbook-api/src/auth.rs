//! HTTP Basic-auth extractor and standalone verifier.
//!
//! Credentials are checked against the configured users; a successful check
//! yields the [`CallerContext`] the managers authorize against.

use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{HeaderMap, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use firmbook_core::access::{CallerContext, Role};
use serde::Deserialize;

use crate::error::ApiError;

/// One account allowed to use the API.
#[derive(Debug, Clone, Deserialize)]
pub struct UserConfig {
  pub email:         String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
  #[serde(default)]
  pub roles:         Vec<Role>,
}

/// Credentials accepted as valid for this server instance.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
  pub users: Vec<UserConfig>,
}

/// The authenticated caller of a request.
pub struct Caller(pub CallerContext);

/// Verify credentials directly from headers.
pub fn verify_auth(
  headers: &HeaderMap,
  config: &AuthConfig,
) -> Result<CallerContext, ApiError> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| ApiError::Unauthorized)?;

  let (email, password) = creds.split_once(':').ok_or(ApiError::Unauthorized)?;

  let user = config
    .users
    .iter()
    .find(|u| u.email == email)
    .ok_or(ApiError::Unauthorized)?;

  let parsed_hash = PasswordHash::new(&user.password_hash).map_err(|e| {
    tracing::warn!(email = %user.email, error = %e, "unparseable password hash");
    ApiError::Unauthorized
  })?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| {
      tracing::debug!(%email, "rejected credentials");
      ApiError::Unauthorized
    })?;

  Ok(CallerContext::new(
    user.email.clone(),
    user.roles.iter().copied(),
  ))
}

impl<St> FromRequestParts<St> for Caller
where
  Arc<AuthConfig>: FromRef<St>,
  St: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &St,
  ) -> Result<Self, Self::Rejection> {
    let auth = Arc::<AuthConfig>::from_ref(state);
    verify_auth(&parts.headers, &auth).map(Caller)
  }
}
