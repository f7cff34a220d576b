//! Date slots: one scheduled home visit and its outcome.
//!
//! A [`DateSlot`] is a value. Every transition returns a new slot and leaves
//! the original untouched, so a patient snapshot handed out to a caller can
//! never be changed behind its back.
//!
//! ```text
//!   PENDING ── mark_visited ──▶ VISITED
//!     │   ▲
//!     │   │ unmark
//!     ▼   │
//!    FAILED
//!   (mark_failed)
//! ```
//!
//! None of the transitions may be applied to a slot dated after the day of
//! the operation.

use chrono::NaiveDate;
use strum::{Display, EnumString};

use crate::{Error, Result, uid::Uid};

/// Visit slots per day, numbered from zero.
pub const SLOTS_PER_DAY: u8 = 4;

/// The recorded result of a scheduled visit.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
  #[default]
  Pending,
  Visited,
  Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateSlot {
  date:     NaiveDate,
  slot:     u8,
  outcome:  Outcome,
  /// Caregiver assigned to carry out the visit.
  assignee: Option<Uid>,
}

impl DateSlot {
  /// A fresh, unassigned slot awaiting its visit.
  pub fn new(date: NaiveDate, slot: u8) -> Result<Self> {
    Self::restore(date, slot, Outcome::Pending, None)
  }

  /// Rebuild a slot in an arbitrary recorded state.
  pub fn restore(
    date: NaiveDate,
    slot: u8,
    outcome: Outcome,
    assignee: Option<Uid>,
  ) -> Result<Self> {
    if slot >= SLOTS_PER_DAY {
      return Err(Error::violation(
        "slot",
        format!("must be between 0 and {}", SLOTS_PER_DAY - 1),
      ));
    }
    Ok(Self { date, slot, outcome, assignee })
  }

  pub fn date(&self) -> NaiveDate { self.date }

  pub fn slot(&self) -> u8 { self.slot }

  pub fn outcome(&self) -> Outcome { self.outcome }

  pub fn assignee(&self) -> Option<Uid> { self.assignee }

  pub fn is_visited(&self) -> bool { self.outcome == Outcome::Visited }

  /// Record that the visit took place.
  pub fn mark_visited(&self, today: NaiveDate) -> Result<Self> {
    self.transition(today, "mark as visited", Outcome::Pending, Outcome::Visited)
  }

  /// Record that the visit was attempted and failed.
  pub fn mark_failed(&self, today: NaiveDate) -> Result<Self> {
    self.transition(today, "mark as failed", Outcome::Pending, Outcome::Failed)
  }

  /// Withdraw a failed outcome so the visit can be recorded again.
  pub fn unmark(&self, today: NaiveDate) -> Result<Self> {
    self.transition(today, "unmark", Outcome::Failed, Outcome::Pending)
  }

  pub fn assign(&self, caregiver: Uid) -> Self {
    Self { assignee: Some(caregiver), ..self.clone() }
  }

  pub fn unassign(&self) -> Result<Self> {
    if self.assignee.is_none() {
      return Err(Error::InvalidTransition {
        action: "unassign",
        from:   self.outcome,
      });
    }
    Ok(Self { assignee: None, ..self.clone() })
  }

  fn transition(
    &self,
    today: NaiveDate,
    action: &'static str,
    from: Outcome,
    to: Outcome,
  ) -> Result<Self> {
    if self.date > today {
      return Err(Error::DateNotReached(self.date));
    }
    if self.outcome != from {
      return Err(Error::InvalidTransition { action, from: self.outcome });
    }
    Ok(Self { outcome: to, ..self.clone() })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_helpers::date;

  fn today() -> NaiveDate { date(2024, 3, 1) }

  fn pending() -> DateSlot { DateSlot::new(date(2024, 1, 1), 0).unwrap() }

  #[test]
  fn slot_index_is_bounded() {
    assert!(DateSlot::new(today(), SLOTS_PER_DAY - 1).is_ok());
    let err = DateSlot::new(today(), SLOTS_PER_DAY).unwrap_err();
    assert!(matches!(err, Error::FieldConstraintViolation { field: "slot", .. }));
  }

  #[test]
  fn mark_visited_from_pending() {
    let slot = pending();
    let visited = slot.mark_visited(today()).unwrap();
    assert_eq!(visited.outcome(), Outcome::Visited);
    // The original value is untouched.
    assert_eq!(slot.outcome(), Outcome::Pending);
  }

  #[test]
  fn visited_cannot_be_marked_again() {
    let visited = pending().mark_visited(today()).unwrap();

    let err = visited.mark_visited(today()).unwrap_err();
    assert!(matches!(err, Error::InvalidTransition { from: Outcome::Visited, .. }));

    let err = visited.mark_failed(today()).unwrap_err();
    assert!(matches!(err, Error::InvalidTransition { from: Outcome::Visited, .. }));

    let err = visited.unmark(today()).unwrap_err();
    assert!(matches!(err, Error::InvalidTransition { from: Outcome::Visited, .. }));
  }

  #[test]
  fn unmark_only_from_failed() {
    let err = pending().unmark(today()).unwrap_err();
    assert!(matches!(err, Error::InvalidTransition { from: Outcome::Pending, .. }));

    let failed = pending().mark_failed(today()).unwrap();
    assert_eq!(failed.outcome(), Outcome::Failed);

    let reopened = failed.unmark(today()).unwrap();
    assert_eq!(reopened.outcome(), Outcome::Pending);
    assert!(reopened.mark_visited(today()).is_ok());
    assert!(reopened.mark_failed(today()).is_ok());
  }

  #[test]
  fn same_day_is_reached() {
    let slot = DateSlot::new(today(), 2).unwrap();
    assert!(slot.mark_visited(today()).is_ok());
  }

  #[test]
  fn future_dates_are_guarded_whatever_the_outcome() {
    let future = date(2024, 3, 2);
    for outcome in [Outcome::Pending, Outcome::Visited, Outcome::Failed] {
      let slot = DateSlot::restore(future, 1, outcome, None).unwrap();
      for result in [
        slot.mark_visited(today()),
        slot.mark_failed(today()),
        slot.unmark(today()),
      ] {
        assert_eq!(result.unwrap_err(), Error::DateNotReached(future));
      }
    }
  }

  #[test]
  fn assignment_is_independent_of_date_and_outcome() {
    let caregiver = Uid::new(7).unwrap();
    let future = DateSlot::new(date(2030, 1, 1), 0).unwrap();

    let assigned = future.assign(caregiver);
    assert_eq!(assigned.assignee(), Some(caregiver));
    assert_eq!(assigned.outcome(), Outcome::Pending);

    let cleared = assigned.unassign().unwrap();
    assert_eq!(cleared.assignee(), None);
    assert!(matches!(
      cleared.unassign().unwrap_err(),
      Error::InvalidTransition { action: "unassign", .. }
    ));
  }

  #[test]
  fn outcome_tokens() {
    assert_eq!(Outcome::Visited.to_string(), "VISITED");
    assert_eq!("FAILED".parse::<Outcome>().unwrap(), Outcome::Failed);
    assert!("visited".parse::<Outcome>().is_err());
  }
}
