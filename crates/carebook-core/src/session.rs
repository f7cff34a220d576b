//! [`Session`] — the owner of a population and its active filter.

use chrono::{Local, NaiveDate};

use crate::{
  Error, Result,
  filter::{FilterRequest, PersonFilter},
  mutation::{self, Mutation},
  person::{Category, Person},
  population::Population,
  store::RecordStore,
  uid::Uid,
};

/// What a successful request reports back to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
  /// Human-readable summary of what happened.
  pub summary: String,
  /// Copies of the persons now displayed, in display order.
  pub view:    Vec<Person>,
}

/// A running session.
///
/// Requests run one at a time to completion. A request that fails leaves
/// both the population and the active filter exactly as they were.
#[derive(Debug, Clone, Default)]
pub struct Session {
  population: Population,
  filter:     PersonFilter,
}

impl Session {
  pub fn new(population: Population) -> Self {
    Self { population, filter: PersonFilter::show_all() }
  }

  pub fn population(&self) -> &Population { &self.population }

  pub fn filter(&self) -> &PersonFilter { &self.filter }

  /// Copies of the persons matching the active filter.
  pub fn view(&self) -> Vec<Person> {
    self.population.filtered_view(&self.filter).cloned().collect()
  }

  /// Replace the active filter.
  pub fn list(&mut self, request: &FilterRequest) -> CommandOutcome {
    self.filter = PersonFilter::from_request(request);
    let view = self.view();
    let summary = if self.filter.is_show_all() {
      format!("Listed all {} persons", view.len())
    } else {
      format!("{} persons listed", view.len())
    };
    CommandOutcome { summary, view }
  }

  /// Apply `mutation` using the local calendar date as the operation date.
  pub fn apply_today(&mut self, mutation: Mutation) -> Result<CommandOutcome> {
    self.apply(mutation, Local::now().date_naive())
  }

  /// Apply `mutation` as of `today`.
  ///
  /// Targets are resolved in the currently displayed list. On success the
  /// filter is reset so that the changed person stays visible.
  pub fn apply(
    &mut self,
    mutation: Mutation,
    today: NaiveDate,
  ) -> Result<CommandOutcome> {
    let summary = match mutation {
      Mutation::Add(person) => {
        let summary = format!("New person added: {person}");
        let uid = person.uid();
        self.population.check_assignees(&person)?;
        self.population.add(person)?;
        tracing::debug!(uid = %uid, "added person");
        summary
      }
      Mutation::Delete { uid } => self.delete(uid)?,
      Mutation::Edit { uid, edit } => {
        let old = self.displayed(uid)?.clone();
        let new = mutation::edit(&old, &edit)?;
        self.population.check_assignees(&new)?;
        self.install(&old, new, "Edited person")?
      }
      Mutation::Mark { uid, index } => {
        let old = self.displayed(uid)?.clone();
        let new = mutation::mark(&old, index, today)?;
        self.install(&old, new, &format!("Marked date slot {index} as visited"))?
      }
      Mutation::MarkFailed { uid, index } => {
        let old = self.displayed(uid)?.clone();
        let new = mutation::mark_failed(&old, index, today)?;
        self.install(&old, new, &format!("Marked date slot {index} as failed"))?
      }
      Mutation::Unmark { uid, index } => {
        let old = self.displayed(uid)?.clone();
        let new = mutation::unmark(&old, index, today)?;
        self.install(&old, new, &format!("Unmarked date slot {index}"))?
      }
      Mutation::Assign { uid, index, caregiver } => {
        let old = self.displayed(uid)?.clone();
        self.require_caregiver(caregiver)?;
        let new = mutation::assign(&old, index, caregiver)?;
        self.install(
          &old,
          new,
          &format!("Assigned caregiver {caregiver} to date slot {index}"),
        )?
      }
      Mutation::Unassign { uid, index } => {
        let old = self.displayed(uid)?.clone();
        let new = mutation::unassign(&old, index)?;
        self.install(&old, new, &format!("Unassigned date slot {index}"))?
      }
    };

    self.filter = PersonFilter::show_all();
    Ok(CommandOutcome { summary, view: self.view() })
  }

  /// Replace the population with a freshly loaded one.
  ///
  /// On failure the current population is kept as is.
  pub fn reload<S: RecordStore>(&mut self, store: &S) -> Result<usize, S::Error> {
    let population = store.load().inspect_err(|e| {
      tracing::warn!("load failed, keeping {} persons: {e}", self.population.len());
    })?;
    tracing::debug!("loaded {} persons", population.len());
    self.population = population;
    self.filter = PersonFilter::show_all();
    Ok(self.population.len())
  }

  pub fn save<S: RecordStore>(&self, store: &S) -> Result<(), S::Error> {
    store.save(&self.population)?;
    tracing::debug!("saved {} persons", self.population.len());
    Ok(())
  }

  // ── Helpers ──────────────────────────────────────────────────────────────

  /// Resolve `uid` among the persons currently displayed.
  fn displayed(&self, uid: Uid) -> Result<&Person> {
    self
      .population
      .find(uid)
      .filter(|p| self.filter.matches(p))
      .ok_or(Error::PersonNotFound(uid))
  }

  fn require_caregiver(&self, uid: Uid) -> Result<()> {
    match self.population.find(uid) {
      Some(Person::Caregiver(_)) => Ok(()),
      Some(Person::Patient(_)) => Err(Error::WrongVariant {
        uid,
        expected: Category::Caregiver,
      }),
      None => Err(Error::PersonNotFound(uid)),
    }
  }

  fn install(&mut self, old: &Person, new: Person, what: &str) -> Result<String> {
    let summary = format!("{what}: {new}");
    self.population.replace(old, new)?;
    tracing::debug!(uid = %old.uid(), "{what}");
    Ok(summary)
  }

  /// Remove a displayed person. Deleting a caregiver also clears them from
  /// every visit they were assigned to.
  fn delete(&mut self, uid: Uid) -> Result<String> {
    let target = self.displayed(uid)?.clone();

    let mut released = Vec::new();
    if target.category() == Category::Caregiver {
      for person in &self.population {
        if let Some(new) = mutation::release_caregiver(person, uid)? {
          released.push((person.clone(), new));
        }
      }
    }

    self.population.remove(uid)?;
    for (old, new) in released {
      self.population.replace(&old, new)?;
    }
    tracing::debug!(uid = %uid, "deleted person");
    Ok(format!("Deleted person: {target}"))
  }
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;

  use super::*;
  use crate::{
    date_slot::{DateSlot, Outcome},
    field::Name,
    mutation::PersonEdit,
    person::VisitStatus,
    test_helpers::{caregiver, date, patient, slot, uid},
  };

  fn today() -> NaiveDate { date(2024, 3, 1) }

  /// Patient 1 with one past pending visit, caregiver 2, patient 3 with a
  /// visit in the future.
  fn session() -> Session {
    Session::new(
      Population::from_persons([
        patient(1, "Alice Tan", vec![slot(date(2024, 1, 1), 0, Outcome::Pending)]),
        caregiver(2, "Bob Lim"),
        patient(3, "Carol Ng", vec![slot(date(2024, 6, 1), 0, Outcome::Pending)]),
      ])
      .unwrap(),
    )
  }

  fn stored_patient(session: &Session, raw: u64) -> crate::person::Patient {
    session
      .population()
      .find(uid(raw))
      .and_then(Person::as_patient)
      .cloned()
      .unwrap()
  }

  #[test]
  fn mark_then_mark_again() {
    let mut s = session();

    let outcome = s.apply(Mutation::Mark { uid: uid(1), index: 0 }, today()).unwrap();
    assert!(outcome.summary.starts_with("Marked date slot 0 as visited: Alice Tan"));

    let alice = stored_patient(&s, 1);
    assert_eq!(alice.date_slots()[0].outcome(), Outcome::Visited);
    assert_eq!(alice.visit_status(), VisitStatus::FullyVisited);

    let before = s.population().clone();
    let err = s.apply(Mutation::Mark { uid: uid(1), index: 0 }, today()).unwrap_err();
    assert!(matches!(err, Error::InvalidTransition { from: Outcome::Visited, .. }));
    assert_eq!(s.population(), &before);
  }

  #[test]
  fn future_visit_is_not_reached() {
    let mut s = session();
    let err = s.apply(Mutation::MarkFailed { uid: uid(3), index: 0 }, today()).unwrap_err();
    assert_eq!(err, Error::DateNotReached(date(2024, 6, 1)));
  }

  #[test]
  fn unknown_uid_and_wrong_variant() {
    let mut s = session();
    assert_eq!(
      s.apply(Mutation::Mark { uid: uid(9), index: 0 }, today()).unwrap_err(),
      Error::PersonNotFound(uid(9))
    );
    assert!(matches!(
      s.apply(Mutation::Unmark { uid: uid(2), index: 0 }, today()).unwrap_err(),
      Error::WrongVariant { expected: Category::Patient, .. }
    ));
    assert_eq!(
      s.apply(Mutation::Mark { uid: uid(1), index: 1 }, today()).unwrap_err(),
      Error::IndexOutOfBounds { index: 1, len: 1 }
    );
  }

  #[test]
  fn targets_resolve_in_the_displayed_list() {
    let mut s = session();
    let listed = s.list(&FilterRequest {
      category: Some("C".into()),
      ..Default::default()
    });
    assert_eq!(listed.view.len(), 1);

    let err = s.apply(Mutation::Mark { uid: uid(1), index: 0 }, today()).unwrap_err();
    assert_eq!(err, Error::PersonNotFound(uid(1)));
    // The failed request leaves the filter in place.
    assert!(!s.filter().is_show_all());
  }

  #[test]
  fn success_resets_the_filter() {
    let mut s = session();
    s.list(&FilterRequest {
      address: Some("Clementi".into()),
      ..Default::default()
    });

    let outcome = s.apply(Mutation::Mark { uid: uid(1), index: 0 }, today()).unwrap();
    assert!(s.filter().is_show_all());
    assert_eq!(outcome.view.len(), 3);
  }

  #[test]
  fn add_rejects_duplicate_uid() {
    let mut s = session();
    let before = s.population().clone();
    let err = s.apply(Mutation::Add(caregiver(1, "Dan Koh")), today()).unwrap_err();
    assert_eq!(err, Error::DuplicateUid(uid(1)));
    assert_eq!(s.population(), &before);

    let outcome = s.apply(Mutation::Add(caregiver(4, "Dan Koh")), today()).unwrap();
    assert!(outcome.summary.starts_with("New person added: Dan Koh"));
    assert_eq!(outcome.view.last().unwrap().uid(), uid(4));
  }

  #[test]
  fn edit_through_session() {
    let mut s = session();
    let edit = PersonEdit {
      name: Some(Name::parse("Bobby Lim").unwrap()),
      ..Default::default()
    };
    s.apply(Mutation::Edit { uid: uid(2), edit }, today()).unwrap();
    assert_eq!(
      s.population().find(uid(2)).unwrap().contact().name.as_str(),
      "Bobby Lim"
    );
  }

  #[test]
  fn added_and_edited_slots_must_name_caregivers() {
    let mut s = session();
    let before = s.population().clone();
    let visit = |caregiver: u64| {
      slot(date(2024, 1, 8), 1, Outcome::Pending).assign(uid(caregiver))
    };
    let is_assignee_violation = |err: Error| {
      matches!(err, Error::FieldConstraintViolation { field: "assignee", .. })
    };

    let err = s
      .apply(Mutation::Add(patient(4, "Eve Goh", vec![visit(3)])), today())
      .unwrap_err();
    assert!(is_assignee_violation(err));

    let edit = PersonEdit { date_slots: Some(vec![visit(9)]), ..Default::default() };
    let err = s.apply(Mutation::Edit { uid: uid(1), edit }, today()).unwrap_err();
    assert!(is_assignee_violation(err));
    assert_eq!(s.population(), &before);

    s.apply(Mutation::Add(patient(4, "Eve Goh", vec![visit(2)])), today())
      .unwrap();
    let edit = PersonEdit { date_slots: Some(vec![visit(2)]), ..Default::default() };
    s.apply(Mutation::Edit { uid: uid(1), edit }, today()).unwrap();
    assert!(stored_patient(&s, 1).is_fully_assigned());
  }

  #[test]
  fn assign_requires_a_caregiver() {
    let mut s = session();
    let err = s
      .apply(Mutation::Assign { uid: uid(1), index: 0, caregiver: uid(3) }, today())
      .unwrap_err();
    assert_eq!(err, Error::WrongVariant { uid: uid(3), expected: Category::Caregiver });

    let err = s
      .apply(Mutation::Assign { uid: uid(1), index: 0, caregiver: uid(8) }, today())
      .unwrap_err();
    assert_eq!(err, Error::PersonNotFound(uid(8)));

    s.apply(Mutation::Assign { uid: uid(1), index: 0, caregiver: uid(2) }, today())
      .unwrap();
    assert_eq!(stored_patient(&s, 1).date_slots()[0].assignee(), Some(uid(2)));
    assert!(stored_patient(&s, 1).is_fully_assigned());

    s.apply(Mutation::Unassign { uid: uid(1), index: 0 }, today()).unwrap();
    assert_eq!(stored_patient(&s, 1).date_slots()[0].assignee(), None);
  }

  #[test]
  fn deleting_a_caregiver_releases_their_visits() {
    let mut s = session();
    s.apply(Mutation::Assign { uid: uid(1), index: 0, caregiver: uid(2) }, today())
      .unwrap();

    let outcome = s.apply(Mutation::Delete { uid: uid(2) }, today()).unwrap();
    assert!(outcome.summary.starts_with("Deleted person: Bob Lim"));
    assert!(s.population().find(uid(2)).is_none());
    assert_eq!(stored_patient(&s, 1).date_slots()[0].assignee(), None);

    assert_eq!(
      s.apply(Mutation::Delete { uid: uid(2) }, today()).unwrap_err(),
      Error::PersonNotFound(uid(2))
    );
  }

  // ── Load / save ──────────────────────────────────────────────────────────

  /// In-memory backend whose next load can be made to fail.
  #[derive(Default)]
  struct MemoryStore {
    saved:   RefCell<Population>,
    corrupt: bool,
  }

  impl RecordStore for MemoryStore {
    type Error = Error;

    fn load(&self) -> Result<Population> {
      if self.corrupt {
        return Err(Error::violation("uid", "missing"));
      }
      Ok(self.saved.borrow().clone())
    }

    fn save(&self, population: &Population) -> Result<()> {
      *self.saved.borrow_mut() = population.clone();
      Ok(())
    }
  }

  #[test]
  fn save_then_reload() {
    let store = MemoryStore::default();
    let original = session();
    original.save(&store).unwrap();

    let mut fresh = Session::default();
    assert_eq!(fresh.reload(&store).unwrap(), 3);
    assert_eq!(fresh.population(), original.population());
  }

  #[test]
  fn failed_reload_keeps_current_population() {
    let store = MemoryStore { corrupt: true, ..Default::default() };
    let mut s = session();
    let before = s.population().clone();

    assert!(s.reload(&store).is_err());
    assert_eq!(s.population(), &before);
  }

  #[test]
  fn slots_are_values() {
    let s = session();
    let snapshot: Vec<DateSlot> = stored_patient(&s, 1).date_slots().to_vec();
    let mut s = s;
    s.apply(Mutation::Mark { uid: uid(1), index: 0 }, today()).unwrap();
    assert_eq!(snapshot[0].outcome(), Outcome::Pending);
  }
}
