//! Normalisation helpers shared by input validation and search.

use crate::{Error, Result};

/// Trim `value` and require it to be non-empty and at most `max` characters.
pub fn required(field: &str, value: &str, max: usize) -> Result<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(Error::invalid(format!("{field} must not be blank")));
  }
  if trimmed.chars().count() > max {
    return Err(Error::invalid(format!(
      "{field} must be at most {max} characters"
    )));
  }
  Ok(trimmed.to_owned())
}

/// Trim an optional value; blank becomes `None`.
pub fn optional(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}

/// Trim and sanity-check an email address: one `@` with non-empty parts on
/// both sides and no whitespace.
pub fn email(field: &str, value: &str) -> Result<String> {
  let address = required(field, value, 254)?;
  let valid = match address.split_once('@') {
    Some((local, domain)) => {
      !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !address.chars().any(char::is_whitespace)
    }
    None => false,
  };
  if !valid {
    return Err(Error::invalid(format!("{field} is not a valid email address")));
  }
  Ok(address)
}

/// Case-folded form used for case-insensitive matching.
pub fn fold(value: &str) -> String { value.trim().to_lowercase() }

/// Fold a search term; a blank term becomes `None` (match everything).
pub fn search_term(term: &str) -> Option<String> {
  Some(fold(term)).filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn required_trims_and_rejects_blank() {
    assert_eq!(required("name", "  Acme  ", 10).unwrap(), "Acme");
    assert!(matches!(required("name", "   ", 10), Err(Error::InvalidInput(_))));
    assert!(matches!(
      required("name", "abcdefghijk", 10),
      Err(Error::InvalidInput(_))
    ));
  }

  #[test]
  fn optional_drops_blank_values() {
    assert_eq!(optional(Some("  ".into())), None);
    assert_eq!(optional(Some(" x ".into())), Some("x".into()));
    assert_eq!(optional(None), None);
  }

  #[test]
  fn email_shape() {
    assert_eq!(email("email", " a@x.com ").unwrap(), "a@x.com");
    for bad in ["ax.com", "@x.com", "a@", "a@@x.com", "a b@x.com"] {
      assert!(email("email", bad).is_err(), "{bad} should be rejected");
    }
  }

  #[test]
  fn fold_handles_non_ascii() {
    assert_eq!(fold("ÉCOLE Straße"), "école straße");
    assert_eq!(search_term("  "), None);
    assert_eq!(search_term(" JoHn "), Some("john".into()));
  }
}
