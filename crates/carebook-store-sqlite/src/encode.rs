//! Conversion between persons and `persons` table rows.
//!
//! The `uid` and `category` columns duplicate what the JSON record holds so
//! that rows can be inspected with plain SQL. On load they must agree with
//! the record; a row whose columns contradict its JSON is rejected.

use carebook_core::person::Person;
use carebook_record::{PersonRecord, encode_person};
use serde_json::Value;

use crate::Result;

/// A row as stored, before the JSON is parsed.
pub struct RawPerson {
  pub uid:         i64,
  pub category:    String,
  pub record_json: String,
}

pub fn encode_row(person: &Person) -> Result<RawPerson> {
  Ok(RawPerson {
    uid:         person.uid().to_signed(),
    category:    person.category().token().to_owned(),
    record_json: serde_json::to_string(&encode_person(person))?,
  })
}

/// Parse a row's JSON and check it against the indexed columns. A column
/// is only compared when the record holds a value of the matching type;
/// anything else is left for the record decoder to reject.
///
/// Errors are returned unwrapped; the caller attaches the row position.
pub fn decode_row(raw: RawPerson) -> carebook_record::Result<PersonRecord> {
  let record: PersonRecord = serde_json::from_str(&raw.record_json)?;

  if record
    .uid
    .as_ref()
    .and_then(Value::as_i64)
    .is_some_and(|uid| uid != raw.uid)
  {
    return Err(column_mismatch("uid", raw.uid.to_string()));
  }
  if record
    .category
    .as_ref()
    .and_then(Value::as_str)
    .is_some_and(|category| category != raw.category)
  {
    return Err(column_mismatch("category", raw.category));
  }
  Ok(record)
}

fn column_mismatch(field: &'static str, column: String) -> carebook_record::Error {
  carebook_core::Error::FieldConstraintViolation {
    field,
    reason: format!("record disagrees with the {field} column ({column})"),
  }
  .into()
}
