//! Company contacts.
//!
//! Per company, at most one contact carries `is_primary = true`. The
//! [`crate::manager::ContactManager`] keeps that true with a
//! demote-then-promote write executed as a single unit of work.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Result, text};

pub const MAX_NAME_LEN: usize = 200;

/// A stored contact, always owned by exactly one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
  pub contact_id: Uuid,
  pub company_id: Uuid,
  pub name:       String,
  pub email:      String,
  pub phone:      Option<String>,
  /// Job title or role at the company.
  pub position:   Option<String>,
  pub notes:      Option<String>,
  pub is_primary: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Submitted contact data for create and (full-replacement) update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContactDraft {
  pub name:       String,
  pub email:      String,
  #[serde(default)]
  pub phone:      Option<String>,
  #[serde(default)]
  pub position:   Option<String>,
  #[serde(default)]
  pub notes:      Option<String>,
  #[serde(default)]
  pub is_primary: bool,
}

impl ContactDraft {
  pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      email: email.into(),
      ..Self::default()
    }
  }

  pub fn primary(mut self, is_primary: bool) -> Self {
    self.is_primary = is_primary;
    self
  }

  /// Validate and return the trimmed form that gets stored.
  pub fn normalize(self) -> Result<Self> {
    Ok(Self {
      name:       text::required("name", &self.name, MAX_NAME_LEN)?,
      email:      text::email("email", &self.email)?,
      phone:      text::optional(self.phone),
      position:   text::optional(self.position),
      notes:      text::optional(self.notes),
      is_primary: self.is_primary,
    })
  }
}

/// Fields a contact listing can be sorted by.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum ContactSortField {
  Name,
  Email,
  #[default]
  CreatedAt,
  UpdatedAt,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Error;

  #[test]
  fn normalize_trims_and_drops_blank_optionals() {
    let draft = ContactDraft {
      name:       "  Ada Lovelace ".into(),
      email:      " ada@example.com".into(),
      phone:      Some("   ".into()),
      position:   Some(" CTO ".into()),
      notes:      None,
      is_primary: true,
    }
    .normalize()
    .unwrap();

    assert_eq!(draft.name, "Ada Lovelace");
    assert_eq!(draft.email, "ada@example.com");
    assert_eq!(draft.phone, None);
    assert_eq!(draft.position.as_deref(), Some("CTO"));
    assert!(draft.is_primary);
  }

  #[test]
  fn normalize_rejects_blank_name_and_bad_email() {
    assert!(matches!(
      ContactDraft::new(" ", "a@x.com").normalize(),
      Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
      ContactDraft::new("Ada", "not-an-email").normalize(),
      Err(Error::InvalidInput(_))
    ));
  }

  #[test]
  fn draft_deserialises_with_defaults() {
    let draft: ContactDraft =
      serde_json::from_str(r#"{"name":"Ada","email":"ada@example.com"}"#).unwrap();
    assert!(!draft.is_primary);
    assert_eq!(draft.phone, None);
  }

  #[test]
  fn sort_fields_use_snake_case() {
    assert_eq!("created_at".parse::<ContactSortField>().unwrap(), ContactSortField::CreatedAt);
    assert_eq!(ContactSortField::UpdatedAt.as_ref(), "updated_at");
  }
}
