//! Record → person, re-validating every field with the same rules as
//! construction.

use std::collections::BTreeSet;

use carebook_core::{
  date_slot::{DateSlot, Outcome},
  field::{Address, Email, Gender, Name, Phone, Tag},
  person::{Category, Contact, Patient, Person, VisitStatus},
  population::Population,
  uid::Uid,
};
use chrono::NaiveDate;
use serde_json::Value;

use crate::{
  Error, Result,
  record::{DateSlotRecord, PersonRecord, PopulationDocument},
};

// ─── Raw fields ──────────────────────────────────────────────────────────────

fn violation(field: &'static str, reason: impl Into<String>) -> Error {
  carebook_core::Error::FieldConstraintViolation { field, reason: reason.into() }
    .into()
}

fn kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}

fn required(value: Option<Value>, field: &'static str) -> Result<Value> {
  value.ok_or(Error::MissingField(field))
}

fn string(value: Value, field: &'static str) -> Result<String> {
  match value {
    Value::String(s) => Ok(s),
    other => Err(violation(field, format!("expected a string, got {}", kind(&other)))),
  }
}

fn required_string(value: Option<Value>, field: &'static str) -> Result<String> {
  string(required(value, field)?, field)
}

/// Integers outside the signed 64-bit range are passed on as `u64` so the
/// field's own validator can reject them with a meaningful reason.
enum Integer {
  Signed(i64),
  Unsigned(u64),
}

fn integer(value: Value, field: &'static str) -> Result<Integer> {
  let number = match &value {
    Value::Number(n) => n,
    other => {
      return Err(violation(field, format!("expected an integer, got {}", kind(other))));
    }
  };
  number
    .as_i64()
    .map(Integer::Signed)
    .or_else(|| number.as_u64().map(Integer::Unsigned))
    .ok_or_else(|| violation(field, format!("{number} is not an integer")))
}

/// A uid stored under `field`; violations are reported against `field`.
fn decode_uid(value: Value, field: &'static str) -> Result<Uid> {
  let uid = match integer(value, field)? {
    Integer::Signed(raw) => Uid::from_signed(raw),
    Integer::Unsigned(raw) => Uid::new(raw),
  };
  uid.map_err(|e| match e {
    carebook_core::Error::FieldConstraintViolation { reason, .. } => {
      violation(field, reason)
    }
    other => other.into(),
  })
}

/// Absent and `null` both mean an empty list.
fn list(value: Option<Value>, field: &'static str) -> Result<Vec<Value>> {
  match value {
    None | Some(Value::Null) => Ok(Vec::new()),
    Some(Value::Array(items)) => Ok(items),
    Some(other) => {
      Err(violation(field, format!("expected an array, got {}", kind(&other))))
    }
  }
}

// ─── Persons ─────────────────────────────────────────────────────────────────

pub fn decode_person(record: PersonRecord) -> Result<Person> {
  let uid = decode_uid(required(record.uid, "uid")?, "uid")?;
  let name = Name::parse(&required_string(record.name, "name")?)?;
  let gender = Gender::parse(&required_string(record.gender, "gender")?)?;
  let phone = Phone::parse(&required_string(record.phone, "phone")?)?;
  let email = Email::parse(&required_string(record.email, "email")?)?;
  let address = Address::parse(&required_string(record.address, "address")?)?;
  let tags = list(record.tagged, "tagged")?
    .into_iter()
    .map(|raw| -> Result<Tag> { Ok(Tag::parse(&string(raw, "tag")?)?) })
    .collect::<Result<BTreeSet<_>>>()?;

  let category_token = required_string(record.category, "category")?;
  let category = Category::from_token(&category_token)
    .ok_or(Error::UnknownCategory(category_token))?;

  let contact = Contact { uid, name, gender, phone, email, address, tags };
  let date_slots = list(record.date_slots, "dateSlot")?;

  match category {
    Category::Caregiver => {
      if !date_slots.is_empty() || record.visit_status.is_some() {
        return Err(violation(
          "category",
          "a caregiver record cannot carry date slots or a visit status",
        ));
      }
      Ok(Person::Caregiver(contact))
    }
    Category::Patient => {
      let raw_status = required_string(record.visit_status, "visitStatus")?;
      let stored_status: VisitStatus = raw_status
        .parse()
        .map_err(|_| violation("visitStatus", format!("unknown status {raw_status:?}")))?;

      let date_slots = date_slots
        .into_iter()
        .map(|raw| -> Result<DateSlot> {
          let record: DateSlotRecord = serde_json::from_value(raw)
            .map_err(|e| violation("dateSlot", e.to_string()))?;
          decode_date_slot(record)
        })
        .collect::<Result<Vec<_>>>()?;

      let patient = Patient::new(contact, date_slots)?;
      if patient.visit_status() != stored_status {
        return Err(violation(
          "visitStatus",
          format!(
            "stored {stored_status} contradicts {} derived from the date slots",
            patient.visit_status()
          ),
        ));
      }
      Ok(Person::Patient(patient))
    }
  }
}

pub fn decode_date_slot(record: DateSlotRecord) -> Result<DateSlot> {
  let raw_date = required_string(record.date, "date")?;
  let date: NaiveDate = raw_date
    .parse()
    .map_err(|_| violation("date", format!("{raw_date:?} is not a YYYY-MM-DD date")))?;

  let slot = match integer(required(record.slot, "slot")?, "slot")? {
    Integer::Signed(raw) => u8::try_from(raw).ok(),
    Integer::Unsigned(raw) => u8::try_from(raw).ok(),
  }
  .ok_or_else(|| violation("slot", "is out of range"))?;

  let raw_outcome = required_string(record.outcome, "outcome")?;
  let outcome: Outcome = raw_outcome
    .parse()
    .map_err(|_| violation("outcome", format!("unknown outcome {raw_outcome:?}")))?;

  let assignee = match record.assignee {
    None | Some(Value::Null) => None,
    Some(raw) => Some(decode_uid(raw, "assignee")?),
  };

  Ok(DateSlot::restore(date, slot, outcome, assignee)?)
}

// ─── Populations ─────────────────────────────────────────────────────────────

/// Decode every record in order. The first failure abandons the whole
/// population and is reported as [`Error::LoadFailure`].
pub fn decode_population(document: PopulationDocument) -> Result<Population> {
  decode_records(document.persons)
}

/// Decode records in display order into a population, as [`decode_population`]
/// does for a whole document.
///
/// Once every record has decoded, each visit's assignee must name a caregiver
/// in the same population.
pub fn decode_records(
  records: impl IntoIterator<Item = PersonRecord>,
) -> Result<Population> {
  let mut population = Population::new();
  for (index, record) in records.into_iter().enumerate() {
    let person =
      decode_person(record).map_err(|e| Error::load_failure(Some(index), e))?;
    population
      .add(person)
      .map_err(|e| Error::load_failure(Some(index), e))?;
  }

  for (index, person) in population.iter().enumerate() {
    population
      .check_assignees(person)
      .map_err(|e| Error::load_failure(Some(index), e))?;
  }
  Ok(population)
}
