use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Error, Resource, Result,
  access::{CallerContext, Operation, authorize},
  contact::{Contact, ContactDraft, ContactSortField},
  page::{Page, PageRequest},
  store::{CompanyStore, ContactQuery},
  text,
};

use super::{internal, require_company};

const PRIMARY_CONFLICT: &str = "company already has a primary contact";

/// Contact CRUD and search within a company.
///
/// Promoting a contact to primary is demote-then-promote: the store clears
/// the company's current primary and writes the new one in one transaction,
/// so readers never observe two primaries.
pub struct ContactManager<S> {
  store: Arc<S>,
}

impl<S> Clone for ContactManager<S> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
    }
  }
}

impl<S: CompanyStore> ContactManager<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub async fn list(
    &self,
    caller: &CallerContext,
    company_id: Uuid,
    page: &PageRequest,
  ) -> Result<Page<Contact>> {
    self.query(caller, company_id, None, page).await
  }

  /// Case-insensitive substring search over name and email. A blank term
  /// lists every contact of the company.
  pub async fn search(
    &self,
    caller: &CallerContext,
    company_id: Uuid,
    term: &str,
    page: &PageRequest,
  ) -> Result<Page<Contact>> {
    self
      .query(caller, company_id, text::search_term(term), page)
      .await
  }

  async fn query(
    &self,
    caller: &CallerContext,
    company_id: Uuid,
    term: Option<String>,
    page: &PageRequest,
  ) -> Result<Page<Contact>> {
    authorize(caller, Operation::ReadContact)?;
    let (order, window) = page.resolve::<ContactSortField>()?;
    require_company(self.store.as_ref(), company_id).await?;

    let query = ContactQuery {
      company_id,
      term,
      order,
      window,
    };
    let listing = self.store.list_contacts(&query).await.map_err(internal)?;
    Ok(Page::assemble(listing, window))
  }

  /// A contact of another company reports exactly like a missing one.
  pub async fn get(
    &self,
    caller: &CallerContext,
    company_id: Uuid,
    contact_id: Uuid,
  ) -> Result<Contact> {
    authorize(caller, Operation::ReadContact)?;
    self.find(company_id, contact_id).await
  }

  pub async fn get_primary(
    &self,
    caller: &CallerContext,
    company_id: Uuid,
  ) -> Result<Contact> {
    authorize(caller, Operation::ReadContact)?;
    require_company(self.store.as_ref(), company_id).await?;

    self
      .store
      .get_primary_contact(company_id)
      .await
      .map_err(internal)?
      .ok_or(Error::NotFound(Resource::PrimaryContact))
  }

  pub async fn create(
    &self,
    caller: &CallerContext,
    company_id: Uuid,
    draft: ContactDraft,
  ) -> Result<Contact> {
    authorize(caller, Operation::WriteContact)?;
    let draft = draft.normalize()?;
    require_company(self.store.as_ref(), company_id).await?;

    let demote = draft.is_primary;
    let contact = self
      .store
      .insert_contact(company_id, draft, demote)
      .await
      .map_err(|e| Error::from_store(e, PRIMARY_CONFLICT))?;

    tracing::info!(
      %company_id,
      contact_id = %contact.contact_id,
      primary = contact.is_primary,
      by = %caller.identity,
      "contact created"
    );
    Ok(contact)
  }

  /// Full replacement of a contact's data. Setting `is_primary` demotes
  /// whichever other contact of the company is primary at write time.
  pub async fn update(
    &self,
    caller: &CallerContext,
    company_id: Uuid,
    contact_id: Uuid,
    draft: ContactDraft,
  ) -> Result<Contact> {
    authorize(caller, Operation::WriteContact)?;
    let draft = draft.normalize()?;
    let current = self.find(company_id, contact_id).await?;

    // `current` may already be stale: demote whenever the draft claims
    // primary. The store never demotes the contact being written.
    let demote = draft.is_primary;
    let contact = self
      .store
      .update_contact(company_id, contact_id, draft, demote)
      .await
      .map_err(|e| Error::from_store(e, PRIMARY_CONFLICT))?
      .ok_or(Error::NotFound(Resource::Contact))?;

    if contact.is_primary && !current.is_primary {
      tracing::info!(%company_id, %contact_id, "primary contact reassigned");
    }
    tracing::info!(%company_id, %contact_id, by = %caller.identity, "contact updated");
    Ok(contact)
  }

  /// Removing the primary contact leaves the company without one.
  pub async fn delete(
    &self,
    caller: &CallerContext,
    company_id: Uuid,
    contact_id: Uuid,
  ) -> Result<()> {
    authorize(caller, Operation::WriteContact)?;

    let deleted = self
      .store
      .delete_contact(company_id, contact_id)
      .await
      .map_err(internal)?;
    if !deleted {
      return Err(Error::NotFound(Resource::Contact));
    }

    tracing::info!(%company_id, %contact_id, by = %caller.identity, "contact deleted");
    Ok(())
  }

  async fn find(&self, company_id: Uuid, contact_id: Uuid) -> Result<Contact> {
    self
      .store
      .get_contact(company_id, contact_id)
      .await
      .map_err(internal)?
      .ok_or(Error::NotFound(Resource::Contact))
  }
}
