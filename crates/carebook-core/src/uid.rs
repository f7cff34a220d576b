//! Person identifiers.

use std::fmt;

use crate::{Error, Result};

/// A positive integer identifying one person across the whole population.
///
/// Bounded by `i64::MAX` so that it survives storage as a signed integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uid(u64);

impl Uid {
  pub const FIRST: Self = Self(1);
  pub const MAX: Self = Self(i64::MAX as u64);

  /// Validate a raw identifier. Zero is rejected.
  pub fn new(raw: u64) -> Result<Self> {
    if raw == 0 {
      return Err(Error::violation("uid", "must be a positive integer"));
    }
    if raw > Self::MAX.0 {
      return Err(Error::violation("uid", format!("must not exceed {}", Self::MAX)));
    }
    Ok(Self(raw))
  }

  /// Validate a signed identifier as read from an external record.
  pub fn from_signed(raw: i64) -> Result<Self> {
    u64::try_from(raw)
      .map_err(|_| Error::violation("uid", "must be a positive integer"))
      .and_then(Self::new)
  }

  pub fn get(self) -> u64 { self.0 }

  /// The stored, signed form.
  pub fn to_signed(self) -> i64 {
    // Lossless: `new` rejects anything above `i64::MAX`.
    self.0 as i64
  }

  /// The identifier following this one, saturating at [`Uid::MAX`].
  pub fn next(self) -> Self { Self(self.0.saturating_add(1).min(Self::MAX.0)) }
}

impl fmt::Display for Uid {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}
