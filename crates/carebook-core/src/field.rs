//! Validated scalar attributes shared by every person.
//!
//! Each type can only be obtained through its `parse` constructor, so holding
//! one is proof that the raw input passed its validator.

use std::fmt;

use strum::{Display, EnumString};

use crate::{Error, Result};

// ─── Name ────────────────────────────────────────────────────────────────────

/// Letters, digits and spaces; must start with a letter or digit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name(String);

impl Name {
  pub fn parse(raw: &str) -> Result<Self> {
    let mut chars = raw.chars();
    match chars.next() {
      Some(first) if first.is_alphanumeric() => {}
      _ => {
        return Err(Error::violation(
          "name",
          "must start with a letter or digit",
        ));
      }
    }
    if !chars.all(|c| c.is_alphanumeric() || c == ' ') {
      return Err(Error::violation(
        "name",
        "may only contain letters, digits and spaces",
      ));
    }
    Ok(Self(raw.to_owned()))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

// ─── Gender ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Gender {
  #[strum(serialize = "M")]
  Male,
  #[strum(serialize = "F")]
  Female,
}

impl Gender {
  pub fn parse(raw: &str) -> Result<Self> {
    raw
      .parse()
      .map_err(|_| Error::violation("gender", format!("expected M or F, got {raw:?}")))
  }
}

// ─── Phone ───────────────────────────────────────────────────────────────────

const PHONE_MIN_DIGITS: usize = 3;
const PHONE_MAX_DIGITS: usize = 15;

/// ASCII digits only, between 3 and 15 of them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Phone(String);

impl Phone {
  pub fn parse(raw: &str) -> Result<Self> {
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
      return Err(Error::violation("phone", "may only contain digits"));
    }
    if !(PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&raw.len()) {
      return Err(Error::violation(
        "phone",
        format!("must be {PHONE_MIN_DIGITS} to {PHONE_MAX_DIGITS} digits long"),
      ));
    }
    Ok(Self(raw.to_owned()))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

// ─── Email ───────────────────────────────────────────────────────────────────

/// `local-part@domain`.
///
/// The local part is alphanumeric plus `+ _ . -`, and may not start or end
/// with one of those special characters. The domain is a dot-separated list
/// of alphanumeric labels that may contain interior hyphens; the final label
/// is at least two characters long.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
  pub fn parse(raw: &str) -> Result<Self> {
    let (local, domain) = raw
      .split_once('@')
      .ok_or_else(|| Error::violation("email", "must contain '@'"))?;

    if !valid_local_part(local) {
      return Err(Error::violation("email", "malformed local part"));
    }
    if !valid_domain(domain) {
      return Err(Error::violation("email", "malformed domain"));
    }
    Ok(Self(raw.to_owned()))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

fn valid_local_part(local: &str) -> bool {
  let is_special = |c: char| matches!(c, '+' | '_' | '.' | '-');
  let (Some(first), Some(last)) = (local.chars().next(), local.chars().last())
  else {
    return false;
  };
  !is_special(first)
    && !is_special(last)
    && local.chars().all(|c| c.is_ascii_alphanumeric() || is_special(c))
}

fn valid_domain(domain: &str) -> bool {
  let labels: Vec<&str> = domain.split('.').collect();
  let label_ok = |label: &str| {
    !label.is_empty()
      && !label.starts_with('-')
      && !label.ends_with('-')
      && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
  };
  labels.iter().all(|l| label_ok(l))
    && labels.last().is_some_and(|l| l.len() >= 2)
}

// ─── Address ─────────────────────────────────────────────────────────────────

/// Free text; must not be blank or start with whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address(String);

impl Address {
  pub fn parse(raw: &str) -> Result<Self> {
    match raw.chars().next() {
      Some(first) if !first.is_whitespace() => Ok(Self(raw.to_owned())),
      _ => Err(Error::violation(
        "address",
        "must not be blank or start with whitespace",
      )),
    }
  }

  pub fn as_str(&self) -> &str { &self.0 }

  /// Case-insensitive substring match used by the list filter.
  pub fn contains_ignore_case(&self, needle: &str) -> bool {
    self.0.to_lowercase().contains(&needle.to_lowercase())
  }
}

// ─── Tag ─────────────────────────────────────────────────────────────────────

/// A free-form alphanumeric label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(String);

impl Tag {
  pub fn parse(raw: &str) -> Result<Self> {
    if raw.is_empty() || !raw.chars().all(char::is_alphanumeric) {
      return Err(Error::violation(
        "tag",
        format!("{raw:?} is not a non-empty alphanumeric label"),
      ));
    }
    Ok(Self(raw.to_owned()))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

macro_rules! display_as_str {
  ($($ty:ty),*) => {
    $(impl fmt::Display for $ty {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
      }
    })*
  };
}

display_as_str!(Name, Phone, Email, Address, Tag);

#[cfg(test)]
mod tests {
  use super::*;

  fn rejected_field<T: fmt::Debug>(result: Result<T>) -> &'static str {
    match result.unwrap_err() {
      Error::FieldConstraintViolation { field, .. } => field,
      other => panic!("unexpected error: {other:?}"),
    }
  }

  #[test]
  fn names() {
    assert!(Name::parse("Alice Tan").is_ok());
    assert!(Name::parse("R2D2").is_ok());
    assert_eq!(rejected_field(Name::parse("")), "name");
    assert_eq!(rejected_field(Name::parse(" Alice")), "name");
    assert_eq!(rejected_field(Name::parse("Alice*")), "name");
  }

  #[test]
  fn genders_are_exact_tokens() {
    assert_eq!(Gender::parse("M").unwrap(), Gender::Male);
    assert_eq!(Gender::parse("F").unwrap(), Gender::Female);
    assert_eq!(rejected_field(Gender::parse("f")), "gender");
    assert_eq!(rejected_field(Gender::parse("X")), "gender");
    assert_eq!(Gender::Female.to_string(), "F");
  }

  #[test]
  fn phones() {
    assert!(Phone::parse("911").is_ok());
    assert!(Phone::parse("98765432").is_ok());
    assert_eq!(rejected_field(Phone::parse("91")), "phone");
    assert_eq!(rejected_field(Phone::parse("9876 5432")), "phone");
    assert_eq!(rejected_field(Phone::parse("1234567890123456")), "phone");
  }

  #[test]
  fn emails() {
    for ok in [
      "alice@example.com",
      "a.b+c_d-e@mail.example-host.sg",
      "x@ab",
    ] {
      assert!(Email::parse(ok).is_ok(), "{ok} should be valid");
    }
    for bad in [
      "alice",
      "@example.com",
      ".alice@example.com",
      "alice.@example.com",
      "alice@",
      "alice@example.c",
      "alice@-example.com",
      "alice@example..com",
      "al ice@example.com",
    ] {
      assert_eq!(rejected_field(Email::parse(bad)), "email", "{bad}");
    }
  }

  #[test]
  fn addresses() {
    assert!(Address::parse("Blk 30 Clementi Ave 3, #06-40").is_ok());
    assert_eq!(rejected_field(Address::parse("")), "address");
    assert_eq!(rejected_field(Address::parse("  Clementi")), "address");

    let address = Address::parse("Blk 30 Clementi Ave 3").unwrap();
    assert!(address.contains_ignore_case("clementi"));
    assert!(!address.contains_ignore_case("Jurong"));
  }

  #[test]
  fn tags() {
    assert!(Tag::parse("diabetic").is_ok());
    assert_eq!(rejected_field(Tag::parse("")), "tag");
    assert_eq!(rejected_field(Tag::parse("high risk")), "tag");
  }
}
