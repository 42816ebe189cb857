//! Handlers for project endpoints.
//!
//! Reads need ADMIN or USER; writes need ADMIN. The manager enforces both.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/projects` | Projects created by the caller, every company |
//! | `GET`    | `/companies/{company_id}/projects` | Paged |
//! | `POST`   | `/companies/{company_id}/projects` | 201; 409 on a taken name |
//! | `GET`    | `/companies/{company_id}/projects/search` | `?search_term=` |
//! | `GET`    | `/companies/{company_id}/projects/name/{name}` | Exact, trimmed |
//! | `GET`    | `/companies/{company_id}/projects/{project_id}` | |
//! | `PUT`    | `/companies/{company_id}/projects/{project_id}` | Full replacement |
//! | `DELETE` | `/companies/{company_id}/projects/{project_id}` | 204 |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use firmbook_core::{
  page::{Page, PageRequest},
  project::{Project, ProjectDraft},
  store::CompanyStore,
};
use uuid::Uuid;

use crate::{
  AppState,
  auth::Caller,
  contacts::SearchParams,
  error::ApiError,
  extract::{ApiJson, ApiPath, ApiQuery},
};

// ─── Listing ──────────────────────────────────────────────────────────────────

/// `GET /projects`
pub async fn mine<S: CompanyStore + 'static>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  ApiQuery(page): ApiQuery<PageRequest>,
) -> Result<Json<Page<Project>>, ApiError> {
  Ok(Json(state.projects.list_by_user(&caller, &page).await?))
}

/// `GET /companies/{company_id}/projects`
pub async fn list<S: CompanyStore + 'static>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  ApiPath(company_id): ApiPath<Uuid>,
  ApiQuery(page): ApiQuery<PageRequest>,
) -> Result<Json<Page<Project>>, ApiError> {
  let projects = state
    .projects
    .list_by_company(&caller, company_id, &page)
    .await?;
  Ok(Json(projects))
}

/// `GET /companies/{company_id}/projects/search?search_term=`
pub async fn search<S: CompanyStore + 'static>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  ApiPath(company_id): ApiPath<Uuid>,
  ApiQuery(params): ApiQuery<SearchParams>,
  ApiQuery(page): ApiQuery<PageRequest>,
) -> Result<Json<Page<Project>>, ApiError> {
  let found = state
    .projects
    .search(&caller, company_id, &params.search_term, &page)
    .await?;
  Ok(Json(found))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /companies/{company_id}/projects`
pub async fn create<S: CompanyStore + 'static>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  ApiPath(company_id): ApiPath<Uuid>,
  ApiJson(draft): ApiJson<ProjectDraft>,
) -> Result<impl IntoResponse, ApiError> {
  let project = state.projects.create(&caller, company_id, draft).await?;
  Ok((StatusCode::CREATED, Json(project)))
}

// ─── Single project ──────────────────────────────────────────────────────────

/// `GET /companies/{company_id}/projects/name/{name}`
pub async fn by_name<S: CompanyStore + 'static>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  ApiPath((company_id, name)): ApiPath<(Uuid, String)>,
) -> Result<Json<Project>, ApiError> {
  Ok(Json(state.projects.get_by_name(&caller, company_id, &name).await?))
}

/// `GET /companies/{company_id}/projects/{project_id}`
pub async fn get_one<S: CompanyStore + 'static>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  ApiPath((company_id, project_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<Project>, ApiError> {
  Ok(Json(state.projects.get(&caller, company_id, project_id).await?))
}

/// `PUT /companies/{company_id}/projects/{project_id}`
pub async fn update<S: CompanyStore + 'static>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  ApiPath((company_id, project_id)): ApiPath<(Uuid, Uuid)>,
  ApiJson(draft): ApiJson<ProjectDraft>,
) -> Result<Json<Project>, ApiError> {
  let project = state
    .projects
    .update(&caller, company_id, project_id, draft)
    .await?;
  Ok(Json(project))
}

/// `DELETE /companies/{company_id}/projects/{project_id}`
pub async fn delete<S: CompanyStore + 'static>(
  State(state): State<AppState<S>>,
  Caller(caller): Caller,
  ApiPath((company_id, project_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
  state.projects.delete(&caller, company_id, project_id).await?;
  Ok(StatusCode::NO_CONTENT)
}
