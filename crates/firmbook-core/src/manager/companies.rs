use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Error, Result,
  access::{CallerContext, Operation, authorize},
  company::{Company, NewCompany},
  store::CompanyStore,
};

use super::require_company;

/// Registers and resolves the tenant scopes.
pub struct CompanyManager<S> {
  store: Arc<S>,
}

impl<S> Clone for CompanyManager<S> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
    }
  }
}

impl<S: CompanyStore> CompanyManager<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Create a company. Administrators only.
  pub async fn register(
    &self,
    caller: &CallerContext,
    input: NewCompany,
  ) -> Result<Company> {
    authorize(caller, Operation::RegisterCompany)?;
    let input = input.normalize()?;

    let company = self
      .store
      .add_company(input.name)
      .await
      .map_err(|e| Error::from_store(e, "company already exists"))?;

    tracing::info!(company_id = %company.company_id, by = %caller.identity, "company registered");
    Ok(company)
  }

  pub async fn get(&self, caller: &CallerContext, company_id: Uuid) -> Result<Company> {
    authorize(caller, Operation::ReadCompany)?;
    require_company(self.store.as_ref(), company_id).await
  }
}
