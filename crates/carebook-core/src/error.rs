//! Error types for `carebook-core`.

use chrono::NaiveDate;
use thiserror::Error;

use crate::{date_slot::Outcome, person::Category, uid::Uid};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("invalid {field}: {reason}")]
  FieldConstraintViolation { field: &'static str, reason: String },

  #[error("a person with uid {0} already exists")]
  DuplicateUid(Uid),

  #[error("date slot {date} #{slot} appears more than once")]
  DuplicateDateSlot { date: NaiveDate, slot: u8 },

  /// The stored value is absent, or no longer equal to the caller's snapshot.
  #[error("no stored person matches uid {0}")]
  NotFound(Uid),

  #[error("no person with uid {0} in the displayed list")]
  PersonNotFound(Uid),

  #[error("uid {uid} is not in category {expected}")]
  WrongVariant { uid: Uid, expected: Category },

  #[error("date slot index {index} is out of bounds (patient has {len})")]
  IndexOutOfBounds { index: usize, len: usize },

  #[error("cannot {action} a date slot whose outcome is {from}")]
  InvalidTransition { action: &'static str, from: Outcome },

  #[error("visit date {0} has not been reached")]
  DateNotReached(NaiveDate),

  #[error("replacement uid {new} does not match stored uid {old}")]
  UidMismatch { old: Uid, new: Uid },
}

impl Error {
  pub(crate) fn violation(field: &'static str, reason: impl Into<String>) -> Self {
    Self::FieldConstraintViolation { field, reason: reason.into() }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
