//! [`Population`] — the in-memory store of every person in a session.

use std::collections::HashMap;

use crate::{Error, Result, filter::PersonFilter, person::Person, uid::Uid};

/// All persons, keyed by [`Uid`], in display order.
///
/// The population owns its values. Callers only ever see shared references
/// or clones; every change goes through [`add`](Self::add),
/// [`replace`](Self::replace) or [`remove`](Self::remove).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Population {
  persons: Vec<Person>,
  /// Position of each uid within `persons`.
  index:   HashMap<Uid, usize>,
}

impl Population {
  pub fn new() -> Self { Self::default() }

  /// Build a population from persons in display order.
  pub fn from_persons(persons: impl IntoIterator<Item = Person>) -> Result<Self> {
    let mut population = Self::new();
    for person in persons {
      population.add(person)?;
    }
    Ok(population)
  }

  pub fn len(&self) -> usize { self.persons.len() }

  pub fn is_empty(&self) -> bool { self.persons.is_empty() }

  /// Every person, in display order.
  pub fn iter(&self) -> std::slice::Iter<'_, Person> { self.persons.iter() }

  pub fn find(&self, uid: Uid) -> Option<&Person> {
    self.index.get(&uid).map(|&i| &self.persons[i])
  }

  /// One past the highest uid in use.
  pub fn next_uid(&self) -> Uid {
    self
      .index
      .keys()
      .max()
      .map_or(Uid::FIRST, |uid| uid.next())
  }

  pub fn add(&mut self, person: Person) -> Result<()> {
    let uid = person.uid();
    if self.index.contains_key(&uid) {
      return Err(Error::DuplicateUid(uid));
    }
    self.index.insert(uid, self.persons.len());
    self.persons.push(person);
    Ok(())
  }

  /// Swap `old` for `new` in place, keeping its display position.
  ///
  /// `old` must still be the stored value: a caller holding a stale snapshot
  /// gets [`Error::NotFound`] instead of silently overwriting newer data.
  pub fn replace(&mut self, old: &Person, new: Person) -> Result<()> {
    if old.uid() != new.uid() {
      return Err(Error::UidMismatch { old: old.uid(), new: new.uid() });
    }
    let position = match self.index.get(&old.uid()) {
      Some(&i) if self.persons[i] == *old => i,
      _ => return Err(Error::NotFound(old.uid())),
    };
    if old.category() != new.category() {
      return Err(Error::WrongVariant {
        uid:      old.uid(),
        expected: old.category(),
      });
    }
    self.persons[position] = new;
    Ok(())
  }

  /// Every caregiver assigned to one of `person`'s visits must be a
  /// caregiver in this population.
  pub fn check_assignees(&self, person: &Person) -> Result<()> {
    let Some(patient) = person.as_patient() else {
      return Ok(());
    };
    for assignee in patient.date_slots().iter().filter_map(|s| s.assignee()) {
      match self.find(assignee) {
        Some(Person::Caregiver(_)) => {}
        Some(Person::Patient(_)) => {
          return Err(Error::violation(
            "assignee",
            format!("uid {assignee} is a patient, not a caregiver"),
          ));
        }
        None => {
          return Err(Error::violation(
            "assignee",
            format!("no caregiver with uid {assignee}"),
          ));
        }
      }
    }
    Ok(())
  }

  pub fn remove(&mut self, uid: Uid) -> Result<Person> {
    let position = self.index.remove(&uid).ok_or(Error::NotFound(uid))?;
    let removed = self.persons.remove(position);
    for i in self.index.values_mut() {
      if *i > position {
        *i -= 1;
      }
    }
    Ok(removed)
  }

  /// Lazily walk the persons matching `filter`, in display order.
  ///
  /// The returned iterator is `Clone`, so a view can be restarted without
  /// consulting the store again.
  pub fn filtered_view<'a>(
    &'a self,
    filter: &'a PersonFilter,
  ) -> impl Iterator<Item = &'a Person> + Clone + 'a {
    self.persons.iter().filter(move |p| filter.matches(p))
  }
}

impl<'a> IntoIterator for &'a Population {
  type IntoIter = std::slice::Iter<'a, Person>;
  type Item = &'a Person;

  fn into_iter(self) -> Self::IntoIter { self.iter() }
}
