use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Error, Resource, Result,
  access::{CallerContext, Operation, authorize},
  page::{Page, PageRequest},
  project::{Project, ProjectDraft, ProjectSortField, normalize_name},
  store::{CompanyStore, ProjectQuery, ProjectScope},
  text,
};

use super::{internal, require_company};

/// Project CRUD, search and owner-scoped listing.
///
/// Name uniqueness is checked before every write that sets a name, and the
/// store's unique `(company, name)` guard catches the writes that race past
/// the check. Both surface as [`Error::Conflict`].
pub struct ProjectManager<S> {
  store: Arc<S>,
}

impl<S> Clone for ProjectManager<S> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
    }
  }
}

fn name_conflict(name: &str) -> String {
  format!("a project named {name:?} already exists in this company")
}

impl<S: CompanyStore> ProjectManager<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub async fn list_by_company(
    &self,
    caller: &CallerContext,
    company_id: Uuid,
    page: &PageRequest,
  ) -> Result<Page<Project>> {
    authorize(caller, Operation::ReadProject)?;
    self
      .query(Some(company_id), ProjectScope::Company(company_id), None, page)
      .await
  }

  /// Projects created by the caller, across every company. Never
  /// `NotFound`; an identity with no projects gets an empty page.
  pub async fn list_by_user(
    &self,
    caller: &CallerContext,
    page: &PageRequest,
  ) -> Result<Page<Project>> {
    authorize(caller, Operation::ListOwnProjects)?;
    self
      .query(None, ProjectScope::Owner(caller.identity.clone()), None, page)
      .await
  }

  /// Case-insensitive substring search over name and description.
  pub async fn search(
    &self,
    caller: &CallerContext,
    company_id: Uuid,
    term: &str,
    page: &PageRequest,
  ) -> Result<Page<Project>> {
    authorize(caller, Operation::ReadProject)?;
    self
      .query(
        Some(company_id),
        ProjectScope::Company(company_id),
        text::search_term(term),
        page,
      )
      .await
  }

  async fn query(
    &self,
    company_id: Option<Uuid>,
    scope: ProjectScope,
    term: Option<String>,
    page: &PageRequest,
  ) -> Result<Page<Project>> {
    let (order, window) = page.resolve::<ProjectSortField>()?;
    if let Some(company_id) = company_id {
      require_company(self.store.as_ref(), company_id).await?;
    }

    let query = ProjectQuery {
      scope,
      term,
      order,
      window,
    };
    let listing = self.store.list_projects(&query).await.map_err(internal)?;
    Ok(Page::assemble(listing, window))
  }

  pub async fn get(
    &self,
    caller: &CallerContext,
    company_id: Uuid,
    project_id: Uuid,
  ) -> Result<Project> {
    authorize(caller, Operation::ReadProject)?;
    self.find(company_id, project_id).await
  }

  /// Exact match on the trimmed name.
  pub async fn get_by_name(
    &self,
    caller: &CallerContext,
    company_id: Uuid,
    name: &str,
  ) -> Result<Project> {
    authorize(caller, Operation::ReadProject)?;
    let name = normalize_name(name)?;

    self
      .store
      .get_project_by_name(company_id, name)
      .await
      .map_err(internal)?
      .ok_or(Error::NotFound(Resource::Project))
  }

  /// Create a project owned by the caller.
  pub async fn create(
    &self,
    caller: &CallerContext,
    company_id: Uuid,
    draft: ProjectDraft,
  ) -> Result<Project> {
    authorize(caller, Operation::WriteProject)?;
    let draft = draft.normalize()?;
    require_company(self.store.as_ref(), company_id).await?;

    let name = draft.name.clone();
    self.ensure_name_free(company_id, &name, None).await?;

    let project = self
      .store
      .insert_project(company_id, caller.identity.clone(), draft)
      .await
      .map_err(|e| Error::from_store(e, &name_conflict(&name)))?;

    tracing::info!(
      %company_id,
      project_id = %project.project_id,
      owner = %project.owner_email,
      "project created"
    );
    Ok(project)
  }

  /// Full replacement of a project's data. The owner never changes.
  pub async fn update(
    &self,
    caller: &CallerContext,
    company_id: Uuid,
    project_id: Uuid,
    draft: ProjectDraft,
  ) -> Result<Project> {
    authorize(caller, Operation::WriteProject)?;
    let draft = draft.normalize()?;
    let current = self.find(company_id, project_id).await?;

    let name = draft.name.clone();
    if name != current.name {
      self
        .ensure_name_free(company_id, &name, Some(project_id))
        .await?;
    }

    let project = self
      .store
      .update_project(company_id, project_id, draft)
      .await
      .map_err(|e| Error::from_store(e, &name_conflict(&name)))?
      .ok_or(Error::NotFound(Resource::Project))?;

    tracing::info!(%company_id, %project_id, by = %caller.identity, "project updated");
    Ok(project)
  }

  pub async fn delete(
    &self,
    caller: &CallerContext,
    company_id: Uuid,
    project_id: Uuid,
  ) -> Result<()> {
    authorize(caller, Operation::WriteProject)?;

    let deleted = self
      .store
      .delete_project(company_id, project_id)
      .await
      .map_err(internal)?;
    if !deleted {
      return Err(Error::NotFound(Resource::Project));
    }

    tracing::info!(%company_id, %project_id, by = %caller.identity, "project deleted");
    Ok(())
  }

  async fn find(&self, company_id: Uuid, project_id: Uuid) -> Result<Project> {
    self
      .store
      .get_project(company_id, project_id)
      .await
      .map_err(internal)?
      .ok_or(Error::NotFound(Resource::Project))
  }

  async fn ensure_name_free(
    &self,
    company_id: Uuid,
    name: &str,
    excluding: Option<Uuid>,
  ) -> Result<()> {
    let taken = self
      .store
      .project_name_taken(company_id, name.to_owned(), excluding)
      .await
      .map_err(internal)?;
    if taken {
      return Err(Error::Conflict(name_conflict(name)));
    }
    Ok(())
  }
}
