//! Error types for `firmbook-core`.

use thiserror::Error;

use crate::store::StoreError;

/// The kind of resource a [`Error::NotFound`] refers to.
///
/// Only used for logging and the error message; a resource owned by another
/// company reports exactly like one that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Resource {
  #[strum(serialize = "company")]
  Company,
  #[strum(serialize = "contact")]
  Contact,
  #[strum(serialize = "primary contact")]
  PrimaryContact,
  #[strum(serialize = "project")]
  Project,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0} not found")]
  NotFound(Resource),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("invalid input: {0}")]
  InvalidInput(String),

  #[error("no valid caller identity")]
  Unauthorized,

  #[error("caller lacks the required role")]
  Forbidden,

  #[error("store error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Translate a backend failure. Uniqueness-constraint rejections become
  /// [`Error::Conflict`] with `on_conflict` as the message; anything else is
  /// [`Error::Internal`].
  pub fn from_store<E: StoreError>(err: E, on_conflict: &str) -> Self {
    if err.is_conflict() {
      Error::Conflict(on_conflict.to_owned())
    } else {
      Error::Internal(Box::new(err))
    }
  }

  pub(crate) fn invalid(msg: impl Into<String>) -> Self {
    Error::InvalidInput(msg.into())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
