//! List filters.
//!
//! A [`FilterRequest`] carries the raw criteria exactly as the caller typed
//! them. [`PersonFilter::from_request`] compiles it once into a predicate.
//! Compilation never fails: a category, gender or tag that cannot be parsed
//! becomes a criterion that no person satisfies, so a malformed filter yields
//! an empty list rather than an error.

use crate::{
  field::{Gender, Tag},
  person::{Category, Person, VisitStatus},
};

// ─── Request ─────────────────────────────────────────────────────────────────

/// Raw filter criteria. Every field is optional; absent fields do not
/// constrain the result, present ones must all match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterRequest {
  /// Case-insensitive substring of the address.
  pub address:        Option<String>,
  /// `P`/`patient` or `C`/`caregiver`, any case.
  pub category:       Option<String>,
  /// `M` or `F`, any case.
  pub gender:         Option<String>,
  pub tag:            Option<String>,
  /// Patients whose every date slot has a caregiver assigned.
  pub fully_assigned: Option<bool>,
  /// Patients whose every date slot has been visited.
  pub fully_visited:  Option<bool>,
}

// ─── Compiled filter ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum Criterion<T> {
  Is(T),
  /// The raw token did not parse; matches nobody.
  Unrecognized,
}

impl<T> Criterion<T> {
  fn parse<E>(raw: &str, parse: impl FnOnce(&str) -> Result<T, E>) -> Self {
    parse(raw).map_or(Self::Unrecognized, Self::Is)
  }
}

impl<T: PartialEq> Criterion<T> {
  fn accepts(&self, value: &T) -> bool {
    matches!(self, Self::Is(expected) if expected == value)
  }
}

/// A compiled, conjunctive predicate over persons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonFilter {
  address:        Option<String>,
  category:       Option<Criterion<Category>>,
  gender:         Option<Criterion<Gender>>,
  tag:            Option<Criterion<Tag>>,
  fully_assigned: Option<bool>,
  fully_visited:  Option<bool>,
}

impl PersonFilter {
  /// The filter that every person satisfies.
  pub fn show_all() -> Self { Self::default() }

  pub fn is_show_all(&self) -> bool { *self == Self::show_all() }

  pub fn from_request(request: &FilterRequest) -> Self {
    let upper = |raw: &String| raw.trim().to_ascii_uppercase();
    Self {
      address:        request.address.clone(),
      category:       request
        .category
        .as_ref()
        .map(|raw| Criterion::parse(&upper(raw), str::parse::<Category>)),
      gender:         request
        .gender
        .as_ref()
        .map(|raw| Criterion::parse(&upper(raw), Gender::parse)),
      tag:            request
        .tag
        .as_deref()
        .map(|raw| Criterion::parse(raw.trim(), Tag::parse)),
      fully_assigned: request.fully_assigned,
      fully_visited:  request.fully_visited,
    }
  }

  pub fn matches(&self, person: &Person) -> bool {
    let contact = person.contact();
    let patient = person.as_patient();

    self
      .address
      .as_deref()
      .is_none_or(|needle| contact.address.contains_ignore_case(needle))
      && self
        .category
        .as_ref()
        .is_none_or(|c| c.accepts(&person.category()))
      && self.gender.as_ref().is_none_or(|g| g.accepts(&contact.gender))
      && self
        .tag
        .as_ref()
        .is_none_or(|t| matches!(t, Criterion::Is(tag) if contact.has_tag(tag)))
      && self.fully_assigned.is_none_or(|wanted| {
        patient.is_some_and(|p| p.is_fully_assigned() == wanted)
      })
      && self.fully_visited.is_none_or(|wanted| {
        patient.is_some_and(|p| {
          (p.visit_status() == VisitStatus::FullyVisited) == wanted
        })
      })
  }
}
