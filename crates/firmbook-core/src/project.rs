//! Projects.
//!
//! Project names are unique per company. The comparison is case-sensitive
//! on the trimmed name: "Alpha" and "alpha" may coexist, " Alpha " and
//! "Alpha" may not.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, text};

pub const MAX_NAME_LEN: usize = 200;

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  strum::AsRefStr,
  strum::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
  #[default]
  Planning,
  Active,
  OnHold,
  Completed,
  Cancelled,
}

/// A stored project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
  pub project_id:   Uuid,
  pub company_id:   Uuid,
  pub name:         String,
  pub description:  Option<String>,
  pub status:       ProjectStatus,
  pub start_date:   Option<NaiveDate>,
  pub end_date:     Option<NaiveDate>,
  /// Identity of the caller that created the project. Set once, never
  /// changed.
  pub owner_email:  String,
  /// Name of the owning company, read alongside the row.
  pub company_name: String,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

/// Submitted project data for create and (full-replacement) update.
///
/// There is no owner field: the owner is always stamped from the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProjectDraft {
  pub name:        String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub status:      ProjectStatus,
  #[serde(default)]
  pub start_date:  Option<NaiveDate>,
  #[serde(default)]
  pub end_date:    Option<NaiveDate>,
}

impl ProjectDraft {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      ..Self::default()
    }
  }

  pub fn described(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  /// Validate and return the trimmed form that gets stored.
  pub fn normalize(self) -> Result<Self> {
    let name = normalize_name(&self.name)?;

    if let (Some(start), Some(end)) = (self.start_date, self.end_date)
      && end < start
    {
      return Err(Error::invalid("end_date must not be before start_date"));
    }

    Ok(Self {
      name,
      description: text::optional(self.description),
      status: self.status,
      start_date: self.start_date,
      end_date: self.end_date,
    })
  }
}

/// The form a project name is stored, compared and looked up in.
pub fn normalize_name(name: &str) -> Result<String> {
  text::required("name", name, MAX_NAME_LEN)
}

/// Fields a project listing can be sorted by.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum ProjectSortField {
  Name,
  Status,
  StartDate,
  EndDate,
  #[default]
  CreatedAt,
  UpdatedAt,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalize_trims_name_and_description() {
    let draft = ProjectDraft::new("  Website Redesign ")
      .described("   ")
      .normalize()
      .unwrap();
    assert_eq!(draft.name, "Website Redesign");
    assert_eq!(draft.description, None);
    assert_eq!(draft.status, ProjectStatus::Planning);
  }

  #[test]
  fn blank_name_is_invalid() {
    assert!(matches!(
      ProjectDraft::new("\t ").normalize(),
      Err(Error::InvalidInput(_))
    ));
  }

  #[test]
  fn end_before_start_is_invalid() {
    let mut draft = ProjectDraft::new("Alpha");
    draft.start_date = NaiveDate::from_ymd_opt(2025, 6, 1);
    draft.end_date = NaiveDate::from_ymd_opt(2025, 5, 31);
    assert!(matches!(draft.normalize(), Err(Error::InvalidInput(_))));
  }

  #[test]
  fn status_uses_screaming_snake_case() {
    let draft: ProjectDraft =
      serde_json::from_str(r#"{"name":"Alpha","status":"ON_HOLD"}"#).unwrap();
    assert_eq!(draft.status, ProjectStatus::OnHold);
    assert_eq!(ProjectStatus::OnHold.as_ref(), "ON_HOLD");
    assert_eq!("CANCELLED".parse::<ProjectStatus>().unwrap(), ProjectStatus::Cancelled);
  }
}
