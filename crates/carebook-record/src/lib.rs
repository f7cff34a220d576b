//! Record codec for Carebook.
//!
//! Converts between [`carebook_core`] persons and the flat record format
//! used for durable storage. Encoding is infallible; decoding re-validates
//! every field with the rules applied at construction, so a stored record
//! that could not have been built in memory is rejected.
//!
//! ```json
//! {
//!   "uid": 1, "name": "Alice Tan", "category": "P", "gender": "F",
//!   "phone": "98765432", "email": "alice@example.com",
//!   "address": "Blk 30 Clementi Ave 3",
//!   "dateSlot": [{ "date": "2024-01-01", "slot": 0, "outcome": "PENDING" }],
//!   "tagged": ["diabetic"],
//!   "visitStatus": "NOT_STARTED"
//! }
//! ```

mod decode;
mod encode;
pub mod error;
mod file_store;
pub mod record;

use carebook_core::population::Population;
pub use decode::{decode_date_slot, decode_person, decode_population, decode_records};
pub use encode::{encode_date_slot, encode_person, encode_population};
pub use error::{Error, Result};
pub use file_store::JsonFileStore;
pub use record::{DateSlotRecord, PersonRecord, PopulationDocument};

// ─── JSON documents ──────────────────────────────────────────────────────────

/// Serialize a whole population as a pretty-printed JSON document.
pub fn to_json(population: &Population) -> Result<String> {
  Ok(serde_json::to_string_pretty(&encode_population(population))?)
}

/// Parse and validate a whole JSON document.
///
/// Any failure, including malformed JSON, is an [`Error::LoadFailure`].
pub fn from_json(input: &str) -> Result<Population> {
  let document: PopulationDocument =
    serde_json::from_str(input).map_err(|e| Error::load_failure(None, e))?;
  decode_population(document)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod roundtrip_tests {
  use carebook_core::date_slot::{DateSlot, Outcome};

  use super::{test_helpers::*, *};

  fn assert_round_trips(person: Person) {
    let decoded = decode_person(encode_person(&person)).expect("decode failed");
    assert_eq!(decoded, person);
  }

  #[test]
  fn caregiver_round_trips() {
    assert_round_trips(caregiver(2, "Bob Lim", &["night"]));
  }

  #[test]
  fn patient_without_slots() {
    assert_round_trips(patient(1, "Alice Tan", vec![]));
  }

  #[test]
  fn patient_with_one_slot() {
    assert_round_trips(patient(1, "Alice Tan", vec![slot(2024, 1, 1, 0, Outcome::Visited)]));
  }

  #[test]
  fn patient_with_many_slots_keeps_order() {
    let assigned = DateSlot::restore(date(2024, 2, 1), 3, Outcome::Pending, Some(uid(2)))
      .unwrap();
    assert_round_trips(patient(1, "Alice Tan", vec![
      slot(2024, 3, 1, 0, Outcome::Failed),
      slot(2024, 1, 1, 2, Outcome::Visited),
      assigned,
      slot(2024, 1, 1, 1, Outcome::Pending),
    ]));
  }

  #[test]
  fn whole_population_through_json() {
    let population = Population::from_persons([
      patient(1, "Alice Tan", vec![slot(2024, 1, 1, 0, Outcome::Visited)]),
      caregiver(2, "Bob Lim", &[]),
      patient(3, "Carol Ng", vec![]),
    ])
    .unwrap();

    let json = to_json(&population).unwrap();
    assert_eq!(from_json(&json).unwrap(), population);
  }
}




// ─── Shared test helpers ─────────────────────────────────────────────────────
