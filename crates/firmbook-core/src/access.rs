//! Access policy: who may do what.
//!
//! The caller context is supplied per request by the authentication layer and
//! passed explicitly into every manager call. [`authorize`] runs before any
//! store access so an unauthorised caller cannot learn whether a
//! company or resource exists.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A coarse role tag attached to a caller.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Role {
  Admin,
  User,
}

/// Authenticated identity plus role set for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
  /// Verified identity, normally an email address.
  pub identity: String,
  pub roles:    BTreeSet<Role>,
}

impl CallerContext {
  pub fn new(
    identity: impl Into<String>,
    roles: impl IntoIterator<Item = Role>,
  ) -> Self {
    Self {
      identity: identity.into(),
      roles:    roles.into_iter().collect(),
    }
  }

  pub fn has_role(&self, role: Role) -> bool { self.roles.contains(&role) }

  pub fn has_any_role(&self, roles: &[Role]) -> bool {
    roles.iter().any(|r| self.has_role(*r))
  }
}

/// Operations gated by the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
  ReadCompany,
  RegisterCompany,
  ReadContact,
  WriteContact,
  ReadProject,
  ListOwnProjects,
  WriteProject,
}

impl Operation {
  /// Roles of which the caller must hold at least one. Empty means any
  /// authenticated caller.
  pub fn required_roles(self) -> &'static [Role] {
    match self {
      Self::ReadCompany | Self::ReadContact | Self::WriteContact => &[],
      Self::ReadProject | Self::ListOwnProjects => &[Role::Admin, Role::User],
      Self::RegisterCompany | Self::WriteProject => &[Role::Admin],
    }
  }
}

/// Decide whether `caller` may perform `op`.
///
/// A blank identity is [`Error::Unauthorized`]; a valid identity without any
/// of the required roles is [`Error::Forbidden`].
pub fn authorize(caller: &CallerContext, op: Operation) -> Result<()> {
  if caller.identity.trim().is_empty() {
    return Err(Error::Unauthorized);
  }

  let required = op.required_roles();
  if required.is_empty() || caller.has_any_role(required) {
    return Ok(());
  }

  tracing::debug!(identity = %caller.identity, ?op, "access denied");
  Err(Error::Forbidden)
}
