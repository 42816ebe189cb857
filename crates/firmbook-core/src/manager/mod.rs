//! Resource managers.
//!
//! Every manager call takes the [`CallerContext`](crate::access::CallerContext)
//! explicitly and follows the same order: access check, input validation,
//! company scope, then the store. Managers hold no mutable state of their
//! own; all state lives in the [`CompanyStore`].

mod companies;
mod contacts;
mod projects;

pub use companies::CompanyManager;
pub use contacts::ContactManager;
pub use projects::ProjectManager;

use uuid::Uuid;

use crate::{
  Error, Resource, Result,
  company::Company,
  store::{CompanyStore, StoreError},
};

/// Resolve the company scope or fail with `NotFound`.
async fn require_company<S: CompanyStore>(
  store: &S,
  company_id: Uuid,
) -> Result<Company> {
  store
    .get_company(company_id)
    .await
    .map_err(internal)?
    .ok_or(Error::NotFound(Resource::Company))
}

fn internal<E: StoreError>(err: E) -> Error { Error::Internal(Box::new(err)) }
