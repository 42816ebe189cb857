//! The `CompanyStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `firmbook-store-sqlite`). Every finder is company-scoped at the query
//! level: a row owned by another company is simply not returned.
//!
//! Each write method is one atomic unit of work. Backends must also carry
//! the storage-level guards (one primary contact per company, unique project
//! name per company) and report their violations through
//! [`StoreError::is_conflict`].

use std::future::Future;

use uuid::Uuid;

use crate::{
  company::Company,
  contact::{Contact, ContactDraft, ContactSortField},
  page::{Listing, Order, Window},
  project::{Project, ProjectDraft, ProjectSortField},
};

/// Error type of a store backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// True when a write was rejected by a uniqueness constraint.
  fn is_conflict(&self) -> bool;
}

// ─── Query types ─────────────────────────────────────────────────────────────

/// Parameters for [`CompanyStore::list_contacts`].
#[derive(Debug, Clone)]
pub struct ContactQuery {
  pub company_id: Uuid,
  /// Case-folded substring matched against name or email. `None` lists all.
  pub term:       Option<String>,
  pub order:      Order<ContactSortField>,
  pub window:     Window,
}

/// Which projects a [`ProjectQuery`] ranges over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectScope {
  Company(Uuid),
  /// Every project, across all companies, created by this identity.
  Owner(String),
}

/// Parameters for [`CompanyStore::list_projects`].
#[derive(Debug, Clone)]
pub struct ProjectQuery {
  pub scope:  ProjectScope,
  /// Case-folded substring matched against name or description.
  pub term:   Option<String>,
  pub order:  Order<ProjectSortField>,
  pub window: Window,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Firmbook persistence backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait CompanyStore: Send + Sync {
  type Error: StoreError;

  // ── Companies ─────────────────────────────────────────────────────────

  /// Create and persist a new company.
  fn add_company(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Company, Self::Error>> + Send + '_;

  /// Retrieve a company by id. Returns `None` if not found.
  fn get_company(
    &self,
    company_id: Uuid,
  ) -> impl Future<Output = Result<Option<Company>, Self::Error>> + Send + '_;

  // ── Contacts ──────────────────────────────────────────────────────────

  /// One window of a company's contacts plus the total in scope.
  fn list_contacts<'a>(
    &'a self,
    query: &'a ContactQuery,
  ) -> impl Future<Output = Result<Listing<Contact>, Self::Error>> + Send + 'a;

  fn get_contact(
    &self,
    company_id: Uuid,
    contact_id: Uuid,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  fn get_primary_contact(
    &self,
    company_id: Uuid,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// Insert a contact. When `demote_primary` is set, every existing primary
  /// contact of the company is cleared in the same transaction first.
  fn insert_contact(
    &self,
    company_id: Uuid,
    draft: ContactDraft,
    demote_primary: bool,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  /// Replace a contact's data. When `demote_primary` is set, every other
  /// primary contact of the company is cleared in the same transaction
  /// first. Returns `None` if the contact is not in the company.
  fn update_contact(
    &self,
    company_id: Uuid,
    contact_id: Uuid,
    draft: ContactDraft,
    demote_primary: bool,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// Returns `false` if the contact is not in the company.
  fn delete_contact(
    &self,
    company_id: Uuid,
    contact_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Projects ──────────────────────────────────────────────────────────

  fn list_projects<'a>(
    &'a self,
    query: &'a ProjectQuery,
  ) -> impl Future<Output = Result<Listing<Project>, Self::Error>> + Send + 'a;

  fn get_project(
    &self,
    company_id: Uuid,
    project_id: Uuid,
  ) -> impl Future<Output = Result<Option<Project>, Self::Error>> + Send + '_;

  /// Exact-match lookup of a (normalised) name within a company.
  fn get_project_by_name(
    &self,
    company_id: Uuid,
    name: String,
  ) -> impl Future<Output = Result<Option<Project>, Self::Error>> + Send + '_;

  /// Whether another project of the company already uses `name`, ignoring
  /// the project `excluding` if given.
  fn project_name_taken(
    &self,
    company_id: Uuid,
    name: String,
    excluding: Option<Uuid>,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn insert_project(
    &self,
    company_id: Uuid,
    owner_email: String,
    draft: ProjectDraft,
  ) -> impl Future<Output = Result<Project, Self::Error>> + Send + '_;

  /// Replace a project's data; the owner is left untouched. Returns `None`
  /// if the project is not in the company.
  fn update_project(
    &self,
    company_id: Uuid,
    project_id: Uuid,
    draft: ProjectDraft,
  ) -> impl Future<Output = Result<Option<Project>, Self::Error>> + Send + '_;

  /// Returns `false` if the project is not in the company.
  fn delete_project(
    &self,
    company_id: Uuid,
    project_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
