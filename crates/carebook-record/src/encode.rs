//! Person → record. Encoding cannot fail: every value in the model is
//! already valid.

use carebook_core::{
  date_slot::DateSlot,
  person::Person,
  population::Population,
};
use serde_json::Value;

use crate::record::{DateSlotRecord, PersonRecord, PopulationDocument};

fn text(value: impl ToString) -> Option<Value> {
  Some(Value::String(value.to_string()))
}

pub fn encode_person(person: &Person) -> PersonRecord {
  let contact = person.contact();

  let (date_slots, visit_status) = match person {
    Person::Caregiver(_) => (None, None),
    Person::Patient(patient) => (
      Some(Value::Array(
        patient
          .date_slots()
          .iter()
          .map(|slot| encode_date_slot(slot).into())
          .collect(),
      )),
      text(patient.visit_status()),
    ),
  };

  PersonRecord {
    uid: Some(Value::from(contact.uid.to_signed())),
    name: text(&contact.name),
    category: text(person.category().token()),
    gender: text(contact.gender),
    phone: text(&contact.phone),
    email: text(&contact.email),
    address: text(&contact.address),
    date_slots,
    tagged: Some(Value::Array(
      contact.tags.iter().map(|tag| Value::from(tag.as_str())).collect(),
    )),
    visit_status,
  }
}

pub fn encode_date_slot(slot: &DateSlot) -> DateSlotRecord {
  DateSlotRecord {
    date:     text(slot.date()),
    slot:     Some(Value::from(slot.slot())),
    outcome:  text(slot.outcome()),
    assignee: slot.assignee().map(|uid| Value::from(uid.to_signed())),
  }
}

pub fn encode_population(population: &Population) -> PopulationDocument {
  PopulationDocument {
    persons: population.iter().map(encode_person).collect(),
  }
}
