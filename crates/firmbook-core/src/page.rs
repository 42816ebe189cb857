//! Pagination and sorting.
//!
//! Callers hand the managers an opaque [`PageRequest`]; it is resolved
//! against the sortable fields of the resource being listed into an
//! [`Order`] and a [`Window`] the store understands.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

// ─── Request ─────────────────────────────────────────────────────────────────

/// Page index (zero-based), page size and an optional `field[,asc|desc]`
/// sort spec.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageRequest {
  pub page: u32,
  pub size: u32,
  pub sort: Option<String>,
}

impl Default for PageRequest {
  fn default() -> Self {
    Self {
      page: 0,
      size: DEFAULT_PAGE_SIZE,
      sort: None,
    }
  }
}

impl PageRequest {
  pub fn new(page: u32, size: u32) -> Self { Self { page, size, sort: None } }

  pub fn sorted_by(mut self, sort: impl Into<String>) -> Self {
    self.sort = Some(sort.into());
    self
  }

  /// Resolve against the sortable fields `F` of a resource.
  ///
  /// A zero size is rejected; sizes above [`MAX_PAGE_SIZE`] are clamped.
  pub fn resolve<F>(&self) -> Result<(Order<F>, Window)>
  where
    F: FromStr + Default + Copy,
  {
    if self.size == 0 {
      return Err(Error::invalid("page size must be greater than zero"));
    }
    let window = Window {
      page: self.page,
      size: self.size.min(MAX_PAGE_SIZE),
    };

    let order = match self.sort.as_deref().map(str::trim) {
      None | Some("") => Order::default(),
      Some(spec) => Order::parse(spec)?,
    };

    Ok((order, window))
  }
}

// ─── Resolved parts ──────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Direction {
  #[default]
  Asc,
  Desc,
}

/// A sort field and direction. Stores always append the resource identifier
/// as a final tiebreaker so ordering is deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Order<F> {
  pub field:     F,
  pub direction: Direction,
}

impl<F: FromStr> Order<F> {
  fn parse(spec: &str) -> Result<Self> {
    let (field, direction) = match spec.split_once(',') {
      Some((f, d)) => (f.trim(), d.trim()),
      None => (spec, ""),
    };

    let field = field
      .parse::<F>()
      .map_err(|_| Error::invalid(format!("cannot sort by {field:?}")))?;
    let direction = if direction.is_empty() {
      Direction::default()
    } else {
      direction
        .parse::<Direction>()
        .map_err(|_| Error::invalid(format!("unknown sort direction {direction:?}")))?
    };

    Ok(Self { field, direction })
  }
}

/// The slice of rows to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
  pub page: u32,
  pub size: u32,
}

impl Window {
  pub fn offset(&self) -> u64 { u64::from(self.page) * u64::from(self.size) }
}

// ─── Results ─────────────────────────────────────────────────────────────────

/// One window of rows plus the total number of rows in scope, as returned by
/// the store.
#[derive(Debug, Clone)]
pub struct Listing<T> {
  pub items: Vec<T>,
  pub total: u64,
}

/// A page of results with total-count-aware metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
  pub items:          Vec<T>,
  pub total_elements: u64,
  pub total_pages:    u64,
  pub page:           u32,
  pub size:           u32,
}

impl<T> Page<T> {
  pub fn assemble(listing: Listing<T>, window: Window) -> Self {
    Self {
      items:          listing.items,
      total_elements: listing.total,
      total_pages:    listing.total.div_ceil(u64::from(window.size)),
      page:           window.page,
      size:           window.size,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::contact::ContactSortField;

  #[test]
  fn default_request_resolves_to_created_at_ascending() {
    let (order, window) = PageRequest::default()
      .resolve::<ContactSortField>()
      .unwrap();
    assert_eq!(order.field, ContactSortField::CreatedAt);
    assert_eq!(order.direction, Direction::Asc);
    assert_eq!(window, Window { page: 0, size: DEFAULT_PAGE_SIZE });
  }

  #[test]
  fn oversized_pages_are_clamped() {
    let (_, window) = PageRequest::new(3, 5_000)
      .resolve::<ContactSortField>()
      .unwrap();
    assert_eq!(window.size, MAX_PAGE_SIZE);
    assert_eq!(window.offset(), 300);
  }

  #[test]
  fn zero_size_is_invalid() {
    assert!(matches!(
      PageRequest::new(0, 0).resolve::<ContactSortField>(),
      Err(Error::InvalidInput(_))
    ));
  }

  #[test]
  fn sort_spec_parses_field_and_direction() {
    let (order, _) = PageRequest::default()
      .sorted_by("email,DESC")
      .resolve::<ContactSortField>()
      .unwrap();
    assert_eq!(order.field, ContactSortField::Email);
    assert_eq!(order.direction, Direction::Desc);

    let (order, _) = PageRequest::default()
      .sorted_by("name")
      .resolve::<ContactSortField>()
      .unwrap();
    assert_eq!(order.field, ContactSortField::Name);
    assert_eq!(order.direction, Direction::Asc);
  }

  #[test]
  fn unknown_sort_field_or_direction_is_invalid() {
    for spec in ["password", "name,sideways"] {
      assert!(matches!(
        PageRequest::default()
          .sorted_by(spec)
          .resolve::<ContactSortField>(),
        Err(Error::InvalidInput(_))
      ));
    }
  }

  #[test]
  fn total_pages_rounds_up() {
    let window = Window { page: 0, size: 20 };
    let page = Page::assemble(Listing { items: vec![(); 20], total: 41 }, window);
    assert_eq!(page.total_pages, 3);

    let empty = Page::<()>::assemble(Listing { items: vec![], total: 0 }, window);
    assert_eq!(empty.total_elements, 0);
    assert_eq!(empty.total_pages, 0);
  }
}
