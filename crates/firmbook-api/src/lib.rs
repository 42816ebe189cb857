//! JSON REST API for Firmbook.
//!
//! Exposes an axum [`Router`] backed by any
//! [`firmbook_core::store::CompanyStore`]. Every route requires HTTP Basic
//! credentials; the authenticated [`CallerContext`] is handed to the
//! managers, which do the role checks.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = firmbook_api::router(AppState::new(store, auth));
//! axum::serve(listener, app).await?;
//! ```
//!
//! [`CallerContext`]: firmbook_core::access::CallerContext

pub mod auth;
pub mod companies;
pub mod contacts;
pub mod error;
pub mod extract;
pub mod projects;

use std::sync::Arc;

use axum::{
  Router,
  extract::FromRef,
  routing::{get, post},
};
use firmbook_core::{
  manager::{CompanyManager, ContactManager, ProjectManager},
  store::CompanyStore,
};
use tower_http::trace::TraceLayer;

pub use auth::{AuthConfig, UserConfig};
pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub companies: CompanyManager<S>,
  pub contacts:  ContactManager<S>,
  pub projects:  ProjectManager<S>,
  pub auth:      Arc<AuthConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      companies: self.companies.clone(),
      contacts:  self.contacts.clone(),
      projects:  self.projects.clone(),
      auth:      Arc::clone(&self.auth),
    }
  }
}

impl<S: CompanyStore> AppState<S> {
  pub fn new(store: Arc<S>, auth: AuthConfig) -> Self {
    Self {
      companies: CompanyManager::new(Arc::clone(&store)),
      contacts:  ContactManager::new(Arc::clone(&store)),
      projects:  ProjectManager::new(store),
      auth:      Arc::new(auth),
    }
  }
}

impl<S> FromRef<AppState<S>> for Arc<AuthConfig> {
  fn from_ref(state: &AppState<S>) -> Self { Arc::clone(&state.auth) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The resource routes, unprefixed.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: CompanyStore + 'static,
{
  Router::new()
    // Companies
    .route("/companies", post(companies::create::<S>))
    .route("/companies/{company_id}", get(companies::get_one::<S>))
    // Contacts
    .route(
      "/companies/{company_id}/contacts",
      get(contacts::list::<S>).post(contacts::create::<S>),
    )
    .route("/companies/{company_id}/contacts/search", get(contacts::search::<S>))
    .route("/companies/{company_id}/contacts/primary", get(contacts::primary::<S>))
    .route(
      "/companies/{company_id}/contacts/{contact_id}",
      get(contacts::get_one::<S>)
        .put(contacts::update::<S>)
        .delete(contacts::delete::<S>),
    )
    // Projects
    .route("/projects", get(projects::mine::<S>))
    .route(
      "/companies/{company_id}/projects",
      get(projects::list::<S>).post(projects::create::<S>),
    )
    .route("/companies/{company_id}/projects/search", get(projects::search::<S>))
    .route("/companies/{company_id}/projects/name/{name}", get(projects::by_name::<S>))
    .route(
      "/companies/{company_id}/projects/{project_id}",
      get(projects::get_one::<S>)
        .put(projects::update::<S>)
        .delete(projects::delete::<S>),
    )
    .with_state(state)
}

/// The full application: [`api_router`] under `/api`, with request tracing.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: CompanyStore + 'static,
{
  Router::new()
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use firmbook_core::access::Role;
  use firmbook_store_sqlite::SqliteStore;
  use rand_core::OsRng;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;

  const ADMIN: (&str, &str) = ("admin@example.com", "admin-pw");
  const USER: (&str, &str) = ("user@example.com", "user-pw");

  fn hash(password: &str) -> String {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string()
  }

  async fn make_app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let auth  = AuthConfig {
      users: vec![
        UserConfig {
          email:         ADMIN.0.to_string(),
          password_hash: hash(ADMIN.1),
          roles:         vec![Role::Admin, Role::User],
        },
        UserConfig {
          email:         USER.0.to_string(),
          password_hash: hash(USER.1),
          roles:         vec![Role::User],
        },
      ],
    };
    router(AppState::new(Arc::new(store), auth))
  }

  async fn send(
    app:    &Router,
    method: &str,
    uri:    &str,
    creds:  Option<(&str, &str)>,
    body:   Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((user, pass)) = creds {
      let encoded = B64.encode(format!("{user}:{pass}"));
      builder = builder.header(header::AUTHORIZATION, format!("Basic {encoded}"));
    }
    let req = match body {
      Some(v) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(v.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };

    let resp   = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes  = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value  = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn new_company(app: &Router, name: &str) -> String {
    let (status, body) =
      send(app, "POST", "/api/companies", Some(ADMIN), Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["company_id"].as_str().unwrap().to_string()
  }

  // ── Auth ─────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn unauthenticated_requests_return_401() {
    let app = make_app().await;
    let req = Request::builder()
      .uri(format!("/api/companies/{}/contacts", Uuid::new_v4()))
      .body(Body::empty())
      .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
  }

  #[tokio::test]
  async fn wrong_password_returns_401() {
    let app = make_app().await;
    let (status, _) =
      send(&app, "GET", "/api/projects", Some((ADMIN.0, "nope")), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  // ── Companies ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn only_admins_register_companies() {
    let app = make_app().await;
    let (status, _) =
      send(&app, "POST", "/api/companies", Some(USER), Some(json!({ "name": "Acme" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let id = new_company(&app, "Acme").await;
    let (status, body) =
      send(&app, "GET", &format!("/api/companies/{id}"), Some(USER), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Acme");
  }

  #[tokio::test]
  async fn unknown_company_returns_404() {
    let app = make_app().await;
    let (status, body) = send(
      &app,
      "GET",
      &format!("/api/companies/{}/contacts", Uuid::new_v4()),
      Some(USER),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not found");
  }

  // ── Contacts ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn second_primary_contact_replaces_the_first() {
    let app  = make_app().await;
    let id   = new_company(&app, "Acme").await;
    let base = format!("/api/companies/{id}/contacts");

    let (status, first) = send(
      &app,
      "POST",
      &base,
      Some(USER),
      Some(json!({ "name": "Ada", "email": "ada@acme.test", "is_primary": true })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, second) = send(
      &app,
      "POST",
      &base,
      Some(USER),
      Some(json!({ "name": "Grace", "email": "grace@acme.test", "is_primary": true })),
    )
    .await;

    let (status, primary) = send(&app, "GET", &format!("{base}/primary"), Some(USER), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(primary["contact_id"], second["contact_id"]);

    let first_id = first["contact_id"].as_str().unwrap();
    let (_, first) = send(&app, "GET", &format!("{base}/{first_id}"), Some(USER), None).await;
    assert_eq!(first["is_primary"], false);

    let (_, page) = send(&app, "GET", &base, Some(USER), None).await;
    assert_eq!(page["total_elements"], 2);
  }

  #[tokio::test]
  async fn contact_lifecycle_and_search() {
    let app  = make_app().await;
    let id   = new_company(&app, "Acme").await;
    let base = format!("/api/companies/{id}/contacts");

    let (_, created) = send(
      &app,
      "POST",
      &base,
      Some(USER),
      Some(json!({ "name": "John Smith", "email": "john@acme.test" })),
    )
    .await;
    let contact_id = created["contact_id"].as_str().unwrap().to_string();

    let (status, page) =
      send(&app, "GET", &format!("{base}/search?search_term=JOHN"), Some(USER), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total_elements"], 1);

    let (status, updated) = send(
      &app,
      "PUT",
      &format!("{base}/{contact_id}"),
      Some(USER),
      Some(json!({ "name": "John Smith", "email": "john@acme.test", "phone": "555-0100" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["phone"], "555-0100");

    let (status, _) = send(&app, "DELETE", &format!("{base}/{contact_id}"), Some(USER), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("{base}/{contact_id}"), Some(USER), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn contact_of_another_company_is_404() {
    let app   = make_app().await;
    let acme  = new_company(&app, "Acme").await;
    let other = new_company(&app, "Globex").await;

    let (_, created) = send(
      &app,
      "POST",
      &format!("/api/companies/{acme}/contacts"),
      Some(USER),
      Some(json!({ "name": "Ada", "email": "ada@acme.test" })),
    )
    .await;
    let contact_id = created["contact_id"].as_str().unwrap();

    let (status, foreign) = send(
      &app,
      "GET",
      &format!("/api/companies/{other}/contacts/{contact_id}"),
      Some(USER),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, no_company) = send(
      &app,
      "GET",
      &format!("/api/companies/{}/contacts/{contact_id}", Uuid::new_v4()),
      Some(USER),
      None,
    )
    .await;
    assert_eq!(foreign, no_company);
  }

  // ── Projects ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn project_writes_need_admin_and_names_are_unique() {
    let app  = make_app().await;
    let id   = new_company(&app, "Acme").await;
    let base = format!("/api/companies/{id}/projects");

    let (status, _) =
      send(&app, "POST", &base, Some(USER), Some(json!({ "name": "Alpha" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) =
      send(&app, "POST", &base, Some(ADMIN), Some(json!({ "name": "Alpha" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "PLANNING");
    assert_eq!(created["owner_email"], ADMIN.0);

    let (status, body) =
      send(&app, "POST", &base, Some(ADMIN), Some(json!({ "name": " Alpha " }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());

    let (status, found) =
      send(&app, "GET", &format!("{base}/name/Alpha"), Some(USER), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["project_id"], created["project_id"]);
  }

  #[tokio::test]
  async fn own_projects_span_companies() {
    let app = make_app().await;
    let one = new_company(&app, "One").await;
    let two = new_company(&app, "Two").await;

    for (company, name) in [(&one, "A"), (&two, "B")] {
      let (status, _) = send(
        &app,
        "POST",
        &format!("/api/companies/{company}/projects"),
        Some(ADMIN),
        Some(json!({ "name": name, "status": "ACTIVE", "start_date": "2025-03-01" })),
      )
      .await;
      assert_eq!(status, StatusCode::CREATED);
    }

    let (status, page) =
      send(&app, "GET", "/api/projects?sort=name,desc", Some(ADMIN), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total_elements"], 2);
    assert_eq!(page["items"][0]["name"], "B");
    assert_eq!(page["items"][0]["company_name"], "Two");
    assert_eq!(page["items"][1]["company_name"], "One");

    let (_, page) = send(&app, "GET", "/api/projects", Some(USER), None).await;
    assert_eq!(page["total_elements"], 0);
  }

  #[tokio::test]
  async fn project_update_and_delete() {
    let app  = make_app().await;
    let id   = new_company(&app, "Acme").await;
    let base = format!("/api/companies/{id}/projects");

    let (_, created) =
      send(&app, "POST", &base, Some(ADMIN), Some(json!({ "name": "Alpha" }))).await;
    let project_id = created["project_id"].as_str().unwrap().to_string();

    let (status, updated) = send(
      &app,
      "PUT",
      &format!("{base}/{project_id}"),
      Some(ADMIN),
      Some(json!({ "name": "Alpha", "status": "COMPLETED" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "COMPLETED");

    let (status, _) =
      send(&app, "DELETE", &format!("{base}/{project_id}"), Some(USER), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) =
      send(&app, "DELETE", &format!("{base}/{project_id}"), Some(ADMIN), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) =
      send(&app, "GET", &format!("{base}/{project_id}"), Some(USER), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Malformed input ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn malformed_requests_return_400_with_json_error() {
    let app = make_app().await;
    let id  = new_company(&app, "Acme").await;

    let (status, body) = send(
      &app,
      "POST",
      &format!("/api/companies/{id}/contacts"),
      Some(USER),
      Some(json!({ "email": "missing-name@acme.test" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) =
      send(&app, "GET", "/api/companies/not-a-uuid/contacts", Some(USER), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
      &app,
      "GET",
      &format!("/api/companies/{id}/contacts?size=0"),
      Some(USER),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
      &app,
      "POST",
      &format!("/api/companies/{id}/contacts"),
      Some(USER),
      Some(json!({ "name": "Ada", "email": "not-an-email" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }
}
