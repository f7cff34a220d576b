//! People tracked by the register: caregivers and the patients they visit.

use std::{collections::BTreeSet, fmt};

use strum::{Display, EnumString};

use crate::{
  Error, Result,
  date_slot::DateSlot,
  field::{Address, Email, Gender, Name, Phone, Tag},
  uid::Uid,
};

// ─── Category ────────────────────────────────────────────────────────────────

/// Which variant of [`Person`] a record describes. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Category {
  #[strum(to_string = "P", serialize = "PATIENT")]
  Patient,
  #[strum(to_string = "C", serialize = "CAREGIVER")]
  Caregiver,
}

impl Category {
  /// The single-letter token written to stored records; the same text as
  /// `Display`.
  pub fn token(self) -> &'static str {
    match self {
      Self::Patient => "P",
      Self::Caregiver => "C",
    }
  }

  pub fn from_token(token: &str) -> Option<Self> {
    match token {
      "P" => Some(Self::Patient),
      "C" => Some(Self::Caregiver),
      _ => None,
    }
  }
}

// ─── Visit status ────────────────────────────────────────────────────────────

/// Aggregate progress over a patient's date slots. Always derived, never set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum VisitStatus {
  NotStarted,
  InProgress,
  FullyVisited,
}

impl VisitStatus {
  pub fn derive(slots: &[DateSlot]) -> Self {
    let visited = slots.iter().filter(|s| s.is_visited()).count();
    match visited {
      0 => Self::NotStarted,
      n if n == slots.len() => Self::FullyVisited,
      _ => Self::InProgress,
    }
  }
}

// ─── Contact ─────────────────────────────────────────────────────────────────

/// Identity and contact attributes common to every person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
  pub uid:     Uid,
  pub name:    Name,
  pub gender:  Gender,
  pub phone:   Phone,
  pub email:   Email,
  pub address: Address,
  pub tags:    BTreeSet<Tag>,
}

impl Contact {
  pub fn has_tag(&self, tag: &Tag) -> bool { self.tags.contains(tag) }
}

// ─── Patient ─────────────────────────────────────────────────────────────────

/// A person receiving home visits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patient {
  contact:      Contact,
  /// In entry order, which need not be chronological.
  date_slots:   Vec<DateSlot>,
  visit_status: VisitStatus,
}

impl Patient {
  /// Build a patient, rejecting any repeated `(date, slot)` pairing.
  pub fn new(contact: Contact, date_slots: Vec<DateSlot>) -> Result<Self> {
    let mut seen = BTreeSet::new();
    for slot in &date_slots {
      if !seen.insert((slot.date(), slot.slot())) {
        return Err(Error::DuplicateDateSlot {
          date: slot.date(),
          slot: slot.slot(),
        });
      }
    }

    let visit_status = VisitStatus::derive(&date_slots);
    Ok(Self { contact, date_slots, visit_status })
  }

  pub fn contact(&self) -> &Contact { &self.contact }

  pub fn date_slots(&self) -> &[DateSlot] { &self.date_slots }

  pub fn visit_status(&self) -> VisitStatus { self.visit_status }

  /// True when there is at least one slot and every slot has a caregiver.
  pub fn is_fully_assigned(&self) -> bool {
    !self.date_slots.is_empty()
      && self.date_slots.iter().all(|s| s.assignee().is_some())
  }

  /// A copy of this patient with a new slot list; the status is recomputed.
  pub fn with_date_slots(&self, date_slots: Vec<DateSlot>) -> Result<Self> {
    Self::new(self.contact.clone(), date_slots)
  }
}

// ─── Person ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Person {
  Caregiver(Contact),
  Patient(Patient),
}

impl Person {
  pub fn contact(&self) -> &Contact {
    match self {
      Self::Caregiver(contact) => contact,
      Self::Patient(patient) => patient.contact(),
    }
  }

  pub fn uid(&self) -> Uid { self.contact().uid }

  pub fn category(&self) -> Category {
    match self {
      Self::Caregiver(_) => Category::Caregiver,
      Self::Patient(_) => Category::Patient,
    }
  }

  pub fn as_patient(&self) -> Option<&Patient> {
    match self {
      Self::Patient(patient) => Some(patient),
      Self::Caregiver(_) => None,
    }
  }

  /// Same variant (and, for patients, same slots) with new contact details.
  pub(crate) fn with_contact(&self, contact: Contact) -> Result<Self> {
    Ok(match self {
      Self::Caregiver(_) => Self::Caregiver(contact),
      Self::Patient(patient) => {
        Self::Patient(Patient::new(contact, patient.date_slots.clone())?)
      }
    })
  }
}

impl fmt::Display for Person {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let c = self.contact();
    write!(
      f,
      "{}; Uid: {}; Category: {}; Gender: {}; Phone: {}; Email: {}; Address: {}",
      c.name,
      c.uid,
      self.category().token(),
      c.gender,
      c.phone,
      c.email,
      c.address,
    )?;
    if !c.tags.is_empty() {
      f.write_str("; Tags: ")?;
      for tag in &c.tags {
        write!(f, "[{tag}]")?;
      }
    }
    if let Self::Patient(patient) = self {
      write!(f, "; Visit status: {}", patient.visit_status)?;
      for (i, slot) in patient.date_slots.iter().enumerate() {
        write!(
          f,
          "{}{i}) {} #{} {}",
          if i == 0 { "; Date slots: " } else { ", " },
          slot.date(),
          slot.slot(),
          slot.outcome(),
        )?;
      }
    }
    Ok(())
  }
}
