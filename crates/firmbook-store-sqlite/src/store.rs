//! [`SqliteStore`], the SQLite implementation of [`CompanyStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use firmbook_core::{
  company::Company,
  contact::{Contact, ContactDraft},
  page::Listing,
  project::{Project, ProjectDraft},
  store::{CompanyStore, ContactQuery, ProjectQuery, ProjectScope},
  text::fold,
};

use crate::{
  Result,
  encode::{
    COMPANY_COLUMNS, CONTACT_COLUMNS, PROJECT_COLUMNS, RawCompany, RawContact,
    RawProject, contact_sort_column, direction_sql, encode_date, encode_dt,
    encode_uuid, like_pattern, now, project_sort_column,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Firmbook store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. All calls
/// are serialised on the connection's thread, and each write runs inside one
/// transaction.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Statement helpers ───────────────────────────────────────────────────────

/// Clear the primary flag on every primary contact of a company other than
/// `keep`.
fn demote_primary(
  tx: &rusqlite::Transaction<'_>,
  company_id: &str,
  keep: Option<&str>,
  at: &str,
) -> rusqlite::Result<usize> {
  tx.execute(
    "UPDATE contacts SET is_primary = 0, updated_at = ?3
     WHERE company_id = ?1 AND is_primary = 1 AND contact_id IS NOT ?2",
    rusqlite::params![company_id, keep, at],
  )
}

fn select_contact(
  conn: &rusqlite::Connection,
  company_id: &str,
  contact_id: &str,
) -> rusqlite::Result<Option<RawContact>> {
  conn
    .query_row(
      &format!(
        "SELECT {CONTACT_COLUMNS} FROM contacts WHERE contact_id = ?1 AND company_id = ?2"
      ),
      rusqlite::params![contact_id, company_id],
      RawContact::from_row,
    )
    .optional()
}

fn select_project(
  conn: &rusqlite::Connection,
  company_id: &str,
  project_id: &str,
) -> rusqlite::Result<Option<RawProject>> {
  conn
    .query_row(
      &format!(
        "SELECT {PROJECT_COLUMNS} FROM projects WHERE project_id = ?1 AND company_id = ?2"
      ),
      rusqlite::params![project_id, company_id],
      RawProject::from_row,
    )
    .optional()
}

fn window_bounds(size: u32, offset: u64) -> (i64, i64) {
  (i64::from(size), i64::try_from(offset).unwrap_or(i64::MAX))
}

// ─── CompanyStore impl ───────────────────────────────────────────────────────

impl CompanyStore for SqliteStore {
  type Error = crate::Error;

  // ── Companies ─────────────────────────────────────────────────────────────

  async fn add_company(&self, name: String) -> Result<Company> {
    let company = Company {
      company_id: Uuid::new_v4(),
      name,
      created_at: now(),
    };

    let id_str   = encode_uuid(company.company_id);
    let name_str = company.name.clone();
    let at_str   = encode_dt(company.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO companies (company_id, name, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, name_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(company)
  }

  async fn get_company(&self, company_id: Uuid) -> Result<Option<Company>> {
    let id_str = encode_uuid(company_id);

    let raw: Option<RawCompany> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE company_id = ?1"),
              rusqlite::params![id_str],
              RawCompany::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCompany::into_company).transpose()
  }

  // ── Contacts ──────────────────────────────────────────────────────────────

  async fn list_contacts(&self, query: &ContactQuery) -> Result<Listing<Contact>> {
    let company_str = encode_uuid(query.company_id);
    let pattern     = query.term.as_deref().map(like_pattern);
    let order       = format!(
      "{} {}, contact_id ASC",
      contact_sort_column(query.order.field),
      direction_sql(query.order.direction),
    );
    let (limit, offset) = window_bounds(query.window.size, query.window.offset());

    let (total, raws): (i64, Vec<RawContact>) = self
      .conn
      .call(move |conn| {
        let filter = "company_id = ?1 AND (?2 IS NULL \
                      OR name_folded LIKE ?2 ESCAPE '\\' \
                      OR email_folded LIKE ?2 ESCAPE '\\')";

        let total: i64 = conn.query_row(
          &format!("SELECT COUNT(*) FROM contacts WHERE {filter}"),
          rusqlite::params![company_str, pattern],
          |r| r.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
          "SELECT {CONTACT_COLUMNS} FROM contacts WHERE {filter}
           ORDER BY {order} LIMIT ?3 OFFSET ?4"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![company_str, pattern, limit, offset],
            RawContact::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((total, rows))
      })
      .await?;

    Ok(Listing {
      items: raws
        .into_iter()
        .map(RawContact::into_contact)
        .collect::<Result<_>>()?,
      total: total.max(0) as u64,
    })
  }

  async fn get_contact(
    &self,
    company_id: Uuid,
    contact_id: Uuid,
  ) -> Result<Option<Contact>> {
    let company_str = encode_uuid(company_id);
    let contact_str = encode_uuid(contact_id);

    let raw = self
      .conn
      .call(move |conn| Ok(select_contact(conn, &company_str, &contact_str)?))
      .await?;

    raw.map(RawContact::into_contact).transpose()
  }

  async fn get_primary_contact(&self, company_id: Uuid) -> Result<Option<Contact>> {
    let company_str = encode_uuid(company_id);

    let raw: Option<RawContact> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {CONTACT_COLUMNS} FROM contacts WHERE company_id = ?1 AND is_primary = 1"
              ),
              rusqlite::params![company_str],
              RawContact::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawContact::into_contact).transpose()
  }

  async fn insert_contact(
    &self,
    company_id: Uuid,
    draft: ContactDraft,
    demote_primary_first: bool,
  ) -> Result<Contact> {
    let now = now();
    let contact = Contact {
      contact_id: Uuid::new_v4(),
      company_id,
      name:       draft.name,
      email:      draft.email,
      phone:      draft.phone,
      position:   draft.position,
      notes:      draft.notes,
      is_primary: draft.is_primary,
      created_at: now,
      updated_at: now,
    };

    let contact_str  = encode_uuid(contact.contact_id);
    let company_str  = encode_uuid(company_id);
    let name         = contact.name.clone();
    let email        = contact.email.clone();
    let phone        = contact.phone.clone();
    let position     = contact.position.clone();
    let notes        = contact.notes.clone();
    let is_primary   = contact.is_primary;
    let name_folded  = fold(&contact.name);
    let email_folded = fold(&contact.email);
    let at_str       = encode_dt(now);

    let demoted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let demoted = if demote_primary_first {
          demote_primary(&tx, &company_str, None, &at_str)?
        } else {
          0
        };
        tx.execute(
          "INSERT INTO contacts (
             contact_id, company_id, name, email, phone, position, notes,
             is_primary, name_folded, email_folded, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
          rusqlite::params![
            contact_str,
            company_str,
            name,
            email,
            phone,
            position,
            notes,
            is_primary,
            name_folded,
            email_folded,
            at_str,
          ],
        )?;
        tx.commit()?;
        Ok(demoted)
      })
      .await?;

    if demoted > 0 {
      tracing::debug!(%company_id, demoted, "cleared previous primary contact");
    }
    Ok(contact)
  }

  async fn update_contact(
    &self,
    company_id: Uuid,
    contact_id: Uuid,
    draft: ContactDraft,
    demote_primary_first: bool,
  ) -> Result<Option<Contact>> {
    let company_str  = encode_uuid(company_id);
    let contact_str  = encode_uuid(contact_id);
    let name_folded  = fold(&draft.name);
    let email_folded = fold(&draft.email);
    let at_str       = encode_dt(now());

    let raw: Option<RawContact> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if demote_primary_first {
          demote_primary(&tx, &company_str, Some(contact_str.as_str()), &at_str)?;
        }
        let changed = tx.execute(
          "UPDATE contacts SET
             name = ?3, email = ?4, phone = ?5, position = ?6, notes = ?7,
             is_primary = ?8, name_folded = ?9, email_folded = ?10, updated_at = ?11
           WHERE contact_id = ?1 AND company_id = ?2",
          rusqlite::params![
            contact_str,
            company_str,
            draft.name,
            draft.email,
            draft.phone,
            draft.position,
            draft.notes,
            draft.is_primary,
            name_folded,
            email_folded,
            at_str,
          ],
        )?;
        if changed == 0 {
          // Nothing matched; dropping `tx` rolls back any demotion.
          return Ok(None);
        }
        let row = select_contact(&tx, &company_str, &contact_str)?;
        tx.commit()?;
        Ok(row)
      })
      .await?;

    raw.map(RawContact::into_contact).transpose()
  }

  async fn delete_contact(&self, company_id: Uuid, contact_id: Uuid) -> Result<bool> {
    let company_str = encode_uuid(company_id);
    let contact_str = encode_uuid(contact_id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM contacts WHERE contact_id = ?1 AND company_id = ?2",
          rusqlite::params![contact_str, company_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  // ── Projects ──────────────────────────────────────────────────────────────

  async fn list_projects(&self, query: &ProjectQuery) -> Result<Listing<Project>> {
    let (scope_column, scope_value) = match &query.scope {
      ProjectScope::Company(id) => ("company_id", encode_uuid(*id)),
      ProjectScope::Owner(email) => ("owner_email", email.clone()),
    };
    let pattern = query.term.as_deref().map(like_pattern);
    let order   = format!(
      "{} {}, project_id ASC",
      project_sort_column(query.order.field),
      direction_sql(query.order.direction),
    );
    let (limit, offset) = window_bounds(query.window.size, query.window.offset());

    let (total, raws): (i64, Vec<RawProject>) = self
      .conn
      .call(move |conn| {
        let filter = format!(
          "{scope_column} = ?1 AND (?2 IS NULL \
           OR name_folded LIKE ?2 ESCAPE '\\' \
           OR description_folded LIKE ?2 ESCAPE '\\')"
        );

        let total: i64 = conn.query_row(
          &format!("SELECT COUNT(*) FROM projects WHERE {filter}"),
          rusqlite::params![scope_value, pattern],
          |r| r.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
          "SELECT {PROJECT_COLUMNS} FROM projects WHERE {filter}
           ORDER BY {order} LIMIT ?3 OFFSET ?4"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![scope_value, pattern, limit, offset],
            RawProject::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((total, rows))
      })
      .await?;

    Ok(Listing {
      items: raws
        .into_iter()
        .map(RawProject::into_project)
        .collect::<Result<_>>()?,
      total: total.max(0) as u64,
    })
  }

  async fn get_project(
    &self,
    company_id: Uuid,
    project_id: Uuid,
  ) -> Result<Option<Project>> {
    let company_str = encode_uuid(company_id);
    let project_str = encode_uuid(project_id);

    let raw = self
      .conn
      .call(move |conn| Ok(select_project(conn, &company_str, &project_str)?))
      .await?;

    raw.map(RawProject::into_project).transpose()
  }

  async fn get_project_by_name(
    &self,
    company_id: Uuid,
    name: String,
  ) -> Result<Option<Project>> {
    let company_str = encode_uuid(company_id);

    let raw: Option<RawProject> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {PROJECT_COLUMNS} FROM projects WHERE company_id = ?1 AND name = ?2"
              ),
              rusqlite::params![company_str, name],
              RawProject::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProject::into_project).transpose()
  }

  async fn project_name_taken(
    &self,
    company_id: Uuid,
    name: String,
    excluding: Option<Uuid>,
  ) -> Result<bool> {
    let company_str  = encode_uuid(company_id);
    let excluded_str = excluding.map(encode_uuid);

    let taken = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT EXISTS (
             SELECT 1 FROM projects
             WHERE company_id = ?1 AND name = ?2 AND project_id IS NOT ?3
           )",
          rusqlite::params![company_str, name, excluded_str],
          |r| r.get::<_, bool>(0),
        )?)
      })
      .await?;

    Ok(taken)
  }

  async fn insert_project(
    &self,
    company_id: Uuid,
    owner_email: String,
    draft: ProjectDraft,
  ) -> Result<Project> {
    let project_str        = encode_uuid(Uuid::new_v4());
    let company_str        = encode_uuid(company_id);
    let status             = draft.status.as_ref().to_owned();
    let start_date         = draft.start_date.map(encode_date);
    let end_date           = draft.end_date.map(encode_date);
    let name_folded        = fold(&draft.name);
    let description_folded = draft.description.as_deref().map(fold).unwrap_or_default();
    let at_str             = encode_dt(now());

    let raw: RawProject = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO projects (
             project_id, company_id, name, description, status, start_date,
             end_date, owner_email, name_folded, description_folded,
             created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
          rusqlite::params![
            project_str,
            company_str,
            draft.name,
            draft.description,
            status,
            start_date,
            end_date,
            owner_email,
            name_folded,
            description_folded,
            at_str,
          ],
        )?;
        // Read back so the company name comes with the new row.
        let row = select_project(&tx, &company_str, &project_str)?
          .ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        tx.commit()?;
        Ok(row)
      })
      .await?;

    raw.into_project()
  }

  async fn update_project(
    &self,
    company_id: Uuid,
    project_id: Uuid,
    draft: ProjectDraft,
  ) -> Result<Option<Project>> {
    let company_str        = encode_uuid(company_id);
    let project_str        = encode_uuid(project_id);
    let status             = draft.status.as_ref().to_owned();
    let start_date         = draft.start_date.map(encode_date);
    let end_date           = draft.end_date.map(encode_date);
    let name_folded        = fold(&draft.name);
    let description_folded = draft.description.as_deref().map(fold).unwrap_or_default();
    let at_str             = encode_dt(now());

    let raw: Option<RawProject> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE projects SET
             name = ?3, description = ?4, status = ?5, start_date = ?6,
             end_date = ?7, name_folded = ?8, description_folded = ?9,
             updated_at = ?10
           WHERE project_id = ?1 AND company_id = ?2",
          rusqlite::params![
            project_str,
            company_str,
            draft.name,
            draft.description,
            status,
            start_date,
            end_date,
            name_folded,
            description_folded,
            at_str,
          ],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        let row = select_project(&tx, &company_str, &project_str)?;
        tx.commit()?;
        Ok(row)
      })
      .await?;

    raw.map(RawProject::into_project).transpose()
  }

  async fn delete_project(&self, company_id: Uuid, project_id: Uuid) -> Result<bool> {
    let company_str = encode_uuid(company_id);
    let project_str = encode_uuid(project_id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM projects WHERE project_id = ?1 AND company_id = ?2",
          rusqlite::params![project_str, company_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }
}
