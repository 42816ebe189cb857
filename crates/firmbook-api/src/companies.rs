//! Handlers for `/companies` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/companies` | ADMIN only. Body: `{"name":"Acme"}` |
//! | `GET`  | `/companies/{company_id}` | 404 if not found |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use firmbook_core::{
  company::{Company, NewCompany},
  store::CompanyStore,
};
use uuid::Uuid;

use crate::{
  AppState,
  auth::Caller,
  error::ApiError,
  extract::{ApiJson, ApiPath},
};

/// `POST /companies`
pub async fn create<S: CompanyStore + 'static>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  ApiJson(input): ApiJson<NewCompany>,
) -> Result<impl IntoResponse, ApiError> {
  let company = state.companies.register(&caller, input).await?;
  Ok((StatusCode::CREATED, Json(company)))
}

/// `GET /companies/{company_id}`
pub async fn get_one<S: CompanyStore + 'static>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  ApiPath(company_id): ApiPath<Uuid>,
) -> Result<Json<Company>, ApiError> {
  Ok(Json(state.companies.get(&caller, company_id).await?))
}
