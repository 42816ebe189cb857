//! Handlers for `/companies/{company_id}/contacts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/contacts` | `?page=&size=&sort=field[,asc\|desc]` |
//! | `POST`   | `/contacts` | 201 + stored contact |
//! | `GET`    | `/contacts/search` | `?search_term=` plus paging |
//! | `GET`    | `/contacts/primary` | 404 if the company has none |
//! | `GET`    | `/contacts/{contact_id}` | |
//! | `PUT`    | `/contacts/{contact_id}` | Full replacement |
//! | `DELETE` | `/contacts/{contact_id}` | 204 |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use firmbook_core::{
  contact::{Contact, ContactDraft},
  page::{Page, PageRequest},
  store::CompanyStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  AppState,
  auth::Caller,
  error::ApiError,
  extract::{ApiJson, ApiPath, ApiQuery},
};

/// `?search_term=` on the search endpoints. Absent means blank.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
  #[serde(default)]
  pub search_term: String,
}

// ─── Collection ───────────────────────────────────────────────────────────────

/// `GET /companies/{company_id}/contacts`
pub async fn list<S: CompanyStore + 'static>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  ApiPath(company_id): ApiPath<Uuid>,
  ApiQuery(page): ApiQuery<PageRequest>,
) -> Result<Json<Page<Contact>>, ApiError> {
  Ok(Json(state.contacts.list(&caller, company_id, &page).await?))
}

/// `GET /companies/{company_id}/contacts/search?search_term=`
pub async fn search<S: CompanyStore + 'static>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  ApiPath(company_id): ApiPath<Uuid>,
  ApiQuery(params): ApiQuery<SearchParams>,
  ApiQuery(page): ApiQuery<PageRequest>,
) -> Result<Json<Page<Contact>>, ApiError> {
  let found = state
    .contacts
    .search(&caller, company_id, &params.search_term, &page)
    .await?;
  Ok(Json(found))
}

/// `POST /companies/{company_id}/contacts`
pub async fn create<S: CompanyStore + 'static>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  ApiPath(company_id): ApiPath<Uuid>,
  ApiJson(draft): ApiJson<ContactDraft>,
) -> Result<impl IntoResponse, ApiError> {
  let contact = state.contacts.create(&caller, company_id, draft).await?;
  Ok((StatusCode::CREATED, Json(contact)))
}

/// `GET /companies/{company_id}/contacts/primary`
pub async fn primary<S: CompanyStore + 'static>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  ApiPath(company_id): ApiPath<Uuid>,
) -> Result<Json<Contact>, ApiError> {
  Ok(Json(state.contacts.get_primary(&caller, company_id).await?))
}

// ─── Single contact ──────────────────────────────────────────────────────────

/// `GET /companies/{company_id}/contacts/{contact_id}`
pub async fn get_one<S: CompanyStore + 'static>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  ApiPath((company_id, contact_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<Contact>, ApiError> {
  Ok(Json(state.contacts.get(&caller, company_id, contact_id).await?))
}

/// `PUT /companies/{company_id}/contacts/{contact_id}`
pub async fn update<S: CompanyStore + 'static>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  ApiPath((company_id, contact_id)): ApiPath<(Uuid, Uuid)>,
  ApiJson(draft): ApiJson<ContactDraft>,
) -> Result<Json<Contact>, ApiError> {
  let contact = state
    .contacts
    .update(&caller, company_id, contact_id, draft)
    .await?;
  Ok(Json(contact))
}

/// `DELETE /companies/{company_id}/contacts/{contact_id}`
pub async fn delete<S: CompanyStore + 'static>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  ApiPath((company_id, contact_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
  state.contacts.delete(&caller, company_id, contact_id).await?;
  Ok(StatusCode::NO_CONTENT)
}
