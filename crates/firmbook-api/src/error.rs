//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use firmbook_core::Resource;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0} not found")]
  NotFound(Resource),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("unauthorized")]
  Unauthorized,

  #[error("forbidden")]
  Forbidden,

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<firmbook_core::Error> for ApiError {
  fn from(err: firmbook_core::Error) -> Self {
    use firmbook_core::Error;
    match err {
      Error::NotFound(resource) => ApiError::NotFound(resource),
      Error::Conflict(m) => ApiError::Conflict(m),
      Error::InvalidInput(m) => ApiError::BadRequest(m),
      Error::Unauthorized => ApiError::Unauthorized,
      Error::Forbidden => ApiError::Forbidden,
      Error::Internal(e) => ApiError::Internal(e),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::BadRequest(rejection.body_text())
  }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self {
    ApiError::BadRequest(rejection.body_text())
  }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self {
    ApiError::BadRequest(rejection.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      // The body never says which lookup missed.
      ApiError::NotFound(resource) => {
        tracing::debug!(%resource, "not found");
        (StatusCode::NOT_FOUND, "not found".to_owned())
      }
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unauthorized => {
        (StatusCode::UNAUTHORIZED, "authentication required".to_owned())
      }
      ApiError::Forbidden => (StatusCode::FORBIDDEN, "forbidden".to_owned()),
      ApiError::Internal(e) => {
        tracing::error!(error = %e, "request failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          "internal server error".to_owned(),
        )
      }
    };

    let mut res = (status, Json(json!({ "error": message }))).into_response();
    if matches!(self, ApiError::Unauthorized) {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"firmbook\""),
      );
    }
    res
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn core_errors_map_to_statuses() {
    use firmbook_core::Error;
    let cases = [
      (Error::NotFound(Resource::Contact), StatusCode::NOT_FOUND),
      (Error::Conflict("taken".into()), StatusCode::CONFLICT),
      (Error::InvalidInput("bad".into()), StatusCode::BAD_REQUEST),
      (Error::Unauthorized, StatusCode::UNAUTHORIZED),
      (Error::Forbidden, StatusCode::FORBIDDEN),
      (Error::Internal("disk on fire".into()), StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (err, status) in cases {
      assert_eq!(ApiError::from(err).into_response().status(), status);
    }
  }

  async fn body_of(err: ApiError) -> serde_json::Value {
    let res = err.into_response();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  #[tokio::test]
  async fn not_found_body_is_the_same_for_every_resource() {
    let company = body_of(ApiError::NotFound(Resource::Company)).await;
    for resource in [Resource::Contact, Resource::PrimaryContact, Resource::Project] {
      assert_eq!(body_of(ApiError::NotFound(resource)).await, company);
    }
    assert_eq!(company["error"], "not found");
  }

  #[test]
  fn unauthorized_carries_basic_challenge() {
    let res = ApiError::Unauthorized.into_response();
    assert_eq!(
      res.headers().get(header::WWW_AUTHENTICATE).unwrap(),
      "Basic realm=\"firmbook\""
    );
  }
}
