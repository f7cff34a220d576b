//! Mutation requests and the pure operations that carry them out.
//!
//! Every operation takes the current [`Person`] by reference and returns its
//! replacement; nothing here touches a [`Population`](crate::population::Population).
//! Resolving the target and installing the result is the job of
//! [`Session::apply`](crate::session::Session::apply).

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::{
  Error, Result,
  date_slot::DateSlot,
  field::{Address, Email, Gender, Name, Phone, Tag},
  person::{Category, Patient, Person},
  uid::Uid,
};

// ─── Requests ────────────────────────────────────────────────────────────────

/// One change to the population, as requested by a caller.
///
/// `index` is always a zero-based position in the patient's date-slot list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
  Add(Person),
  Delete { uid: Uid },
  Edit { uid: Uid, edit: PersonEdit },
  Mark { uid: Uid, index: usize },
  MarkFailed { uid: Uid, index: usize },
  Unmark { uid: Uid, index: usize },
  Assign { uid: Uid, index: usize, caregiver: Uid },
  Unassign { uid: Uid, index: usize },
}

/// Replacement values for an edit. `None` keeps the current value.
///
/// There is deliberately no way to change a person's uid or category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonEdit {
  pub name:       Option<Name>,
  pub gender:     Option<Gender>,
  pub phone:      Option<Phone>,
  pub email:      Option<Email>,
  pub address:    Option<Address>,
  pub tags:       Option<BTreeSet<Tag>>,
  /// Patients only.
  pub date_slots: Option<Vec<DateSlot>>,
}

// ─── Operations ──────────────────────────────────────────────────────────────

/// Record the visit at `index` as carried out.
pub fn mark(person: &Person, index: usize, today: NaiveDate) -> Result<Person> {
  update_slot(person, index, |slot| slot.mark_visited(today))
}

/// Record the visit at `index` as failed.
pub fn mark_failed(
  person: &Person,
  index: usize,
  today: NaiveDate,
) -> Result<Person> {
  update_slot(person, index, |slot| slot.mark_failed(today))
}

/// Withdraw a failed outcome at `index`.
pub fn unmark(person: &Person, index: usize, today: NaiveDate) -> Result<Person> {
  update_slot(person, index, |slot| slot.unmark(today))
}

/// Put `caregiver` in charge of the visit at `index`. The caller is
/// responsible for checking that `caregiver` names a caregiver.
pub fn assign(person: &Person, index: usize, caregiver: Uid) -> Result<Person> {
  update_slot(person, index, |slot| Ok(slot.assign(caregiver)))
}

pub fn unassign(person: &Person, index: usize) -> Result<Person> {
  update_slot(person, index, DateSlot::unassign)
}

/// Apply `edit`, keeping the person's uid and category.
pub fn edit(person: &Person, edit: &PersonEdit) -> Result<Person> {
  let mut contact = person.contact().clone();
  if let Some(name) = &edit.name {
    contact.name = name.clone();
  }
  if let Some(gender) = edit.gender {
    contact.gender = gender;
  }
  if let Some(phone) = &edit.phone {
    contact.phone = phone.clone();
  }
  if let Some(email) = &edit.email {
    contact.email = email.clone();
  }
  if let Some(address) = &edit.address {
    contact.address = address.clone();
  }
  if let Some(tags) = &edit.tags {
    contact.tags = tags.clone();
  }

  match (person, &edit.date_slots) {
    (Person::Caregiver(_), Some(_)) => Err(Error::WrongVariant {
      uid:      person.uid(),
      expected: Category::Patient,
    }),
    (Person::Patient(_), Some(slots)) => {
      Ok(Person::Patient(Patient::new(contact, slots.clone())?))
    }
    (_, None) => person.with_contact(contact),
  }
}

/// Clear `caregiver` from every slot of `person`.
///
/// Returns `None` when nothing referred to the caregiver.
pub fn release_caregiver(person: &Person, caregiver: Uid) -> Result<Option<Person>> {
  let Some(patient) = person.as_patient() else {
    return Ok(None);
  };
  if !patient
    .date_slots()
    .iter()
    .any(|s| s.assignee() == Some(caregiver))
  {
    return Ok(None);
  }

  let slots = patient
    .date_slots()
    .iter()
    .map(|s| {
      if s.assignee() == Some(caregiver) {
        s.unassign()
      } else {
        Ok(s.clone())
      }
    })
    .collect::<Result<Vec<_>>>()?;
  Ok(Some(Person::Patient(patient.with_date_slots(slots)?)))
}

fn update_slot(
  person: &Person,
  index: usize,
  apply: impl FnOnce(&DateSlot) -> Result<DateSlot>,
) -> Result<Person> {
  let Person::Patient(patient) = person else {
    return Err(Error::WrongVariant {
      uid:      person.uid(),
      expected: Category::Patient,
    });
  };

  let slots = patient.date_slots();
  let current = slots
    .get(index)
    .ok_or(Error::IndexOutOfBounds { index, len: slots.len() })?;

  let mut updated = slots.to_vec();
  updated[index] = apply(current)?;
  Ok(Person::Patient(patient.with_date_slots(updated)?))
}
