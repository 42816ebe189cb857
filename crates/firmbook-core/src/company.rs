//! Companies, the tenant scope that owns contacts and projects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Result, text};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
  pub company_id: Uuid,
  pub name:       String,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewCompany {
  pub name: String,
}

impl NewCompany {
  pub fn normalize(self) -> Result<Self> {
    Ok(Self {
      name: text::required("name", &self.name, 200)?,
    })
  }
}
