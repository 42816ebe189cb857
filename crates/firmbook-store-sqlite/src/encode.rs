//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings (microsecond
//! precision) so they sort lexically. Dates are `YYYY-MM-DD`. UUIDs are
//! stored as hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound as _, Utc};
use firmbook_core::{
  company::Company,
  contact::{Contact, ContactSortField},
  page::Direction,
  project::{Project, ProjectSortField, ProjectStatus},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

/// The current time at the precision timestamps are stored with, so values
/// handed back from a write compare equal to what a later read returns.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("timestamp {s:?}: {e}")))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::Decode(format!("date {s:?}: {e}")))
}

pub fn decode_status(s: &str) -> Result<ProjectStatus> {
  s.parse()
    .map_err(|_| Error::Decode(format!("unknown project status: {s:?}")))
}

// ─── Search & ordering ───────────────────────────────────────────────────────

/// `LIKE` pattern for a case-folded substring, with `%`, `_` and `\` in the
/// term matched literally (used with `ESCAPE '\'`).
pub fn like_pattern(term: &str) -> String {
  let mut pattern = String::with_capacity(term.len() + 2);
  pattern.push('%');
  for c in term.chars() {
    if matches!(c, '%' | '_' | '\\') {
      pattern.push('\\');
    }
    pattern.push(c);
  }
  pattern.push('%');
  pattern
}

pub fn direction_sql(d: Direction) -> &'static str {
  match d {
    Direction::Asc => "ASC",
    Direction::Desc => "DESC",
  }
}

pub fn contact_sort_column(f: ContactSortField) -> &'static str {
  match f {
    ContactSortField::Name => "name_folded",
    ContactSortField::Email => "email_folded",
    ContactSortField::CreatedAt => "created_at",
    ContactSortField::UpdatedAt => "updated_at",
  }
}

pub fn project_sort_column(f: ProjectSortField) -> &'static str {
  match f {
    ProjectSortField::Name => "name_folded",
    ProjectSortField::Status => "status",
    ProjectSortField::StartDate => "start_date",
    ProjectSortField::EndDate => "end_date",
    ProjectSortField::CreatedAt => "created_at",
    ProjectSortField::UpdatedAt => "updated_at",
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const COMPANY_COLUMNS: &str = "company_id, name, created_at";

/// Raw strings read directly from a `companies` row.
pub struct RawCompany {
  pub company_id: String,
  pub name:       String,
  pub created_at: String,
}

impl RawCompany {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      company_id: row.get(0)?,
      name:       row.get(1)?,
      created_at: row.get(2)?,
    })
  }

  pub fn into_company(self) -> Result<Company> {
    Ok(Company {
      company_id: decode_uuid(&self.company_id)?,
      name:       self.name,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub const CONTACT_COLUMNS: &str = "contact_id, company_id, name, email, phone, \
   position, notes, is_primary, created_at, updated_at";

/// Raw values read directly from a `contacts` row.
pub struct RawContact {
  pub contact_id: String,
  pub company_id: String,
  pub name:       String,
  pub email:      String,
  pub phone:      Option<String>,
  pub position:   Option<String>,
  pub notes:      Option<String>,
  pub is_primary: bool,
  pub created_at: String,
  pub updated_at: String,
}

impl RawContact {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      contact_id: row.get(0)?,
      company_id: row.get(1)?,
      name:       row.get(2)?,
      email:      row.get(3)?,
      phone:      row.get(4)?,
      position:   row.get(5)?,
      notes:      row.get(6)?,
      is_primary: row.get(7)?,
      created_at: row.get(8)?,
      updated_at: row.get(9)?,
    })
  }

  pub fn into_contact(self) -> Result<Contact> {
    Ok(Contact {
      contact_id: decode_uuid(&self.contact_id)?,
      company_id: decode_uuid(&self.company_id)?,
      name:       self.name,
      email:      self.email,
      phone:      self.phone,
      position:   self.position,
      notes:      self.notes,
      is_primary: self.is_primary,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Selected `FROM projects`; the last column joins in the company's name.
pub const PROJECT_COLUMNS: &str = "project_id, company_id, name, description, \
   status, start_date, end_date, owner_email, created_at, updated_at, \
   (SELECT c.name FROM companies c WHERE c.company_id = projects.company_id)";

/// Raw strings read directly from a `projects` row.
pub struct RawProject {
  pub project_id:   String,
  pub company_id:   String,
  pub name:         String,
  pub description:  Option<String>,
  pub status:       String,
  pub start_date:   Option<String>,
  pub end_date:     Option<String>,
  pub owner_email:  String,
  pub created_at:   String,
  pub updated_at:   String,
  pub company_name: String,
}

impl RawProject {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      project_id:   row.get(0)?,
      company_id:   row.get(1)?,
      name:         row.get(2)?,
      description:  row.get(3)?,
      status:       row.get(4)?,
      start_date:   row.get(5)?,
      end_date:     row.get(6)?,
      owner_email:  row.get(7)?,
      created_at:   row.get(8)?,
      updated_at:   row.get(9)?,
      company_name: row.get(10)?,
    })
  }

  pub fn into_project(self) -> Result<Project> {
    Ok(Project {
      project_id:   decode_uuid(&self.project_id)?,
      company_id:   decode_uuid(&self.company_id)?,
      name:         self.name,
      description:  self.description,
      status:       decode_status(&self.status)?,
      start_date:   self.start_date.as_deref().map(decode_date).transpose()?,
      end_date:     self.end_date.as_deref().map(decode_date).transpose()?,
      owner_email:  self.owner_email,
      company_name: self.company_name,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn like_pattern_escapes_wildcards() {
    assert_eq!(like_pattern("john"), "%john%");
    assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
  }

  #[test]
  fn timestamps_are_fixed_width() {
    let a = decode_dt("2025-01-01T00:00:00Z").unwrap();
    let b = decode_dt("2025-01-01T00:00:00.5Z").unwrap();
    assert_eq!(encode_dt(a).len(), encode_dt(b).len());
    assert!(encode_dt(a) < encode_dt(b));
  }
}
