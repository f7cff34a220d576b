//! The flat, serde-facing shape of stored records.
//!
//! Every field is kept as raw JSON at this level. Absence is reported as
//! [`Error::MissingField`](crate::Error::MissingField) and a value of the
//! wrong JSON type as a field violation by the decoder, so one bad field
//! never surfaces as an opaque error for the whole document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One stored person.
///
/// `dateSlot` and `visitStatus` are written for patients only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub uid:          Option<Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name:         Option<Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub category:     Option<Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub gender:       Option<Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub phone:        Option<Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub email:        Option<Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub address:      Option<Value>,
  /// An array of [`DateSlotRecord`] objects.
  #[serde(rename = "dateSlot", skip_serializing_if = "Option::is_none")]
  pub date_slots:   Option<Value>,
  /// An array of tag strings; absent means no tags.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub tagged:       Option<Value>,
  #[serde(rename = "visitStatus", skip_serializing_if = "Option::is_none")]
  pub visit_status: Option<Value>,
}

/// One stored visit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSlotRecord {
  /// `YYYY-MM-DD`.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub date:     Option<Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub slot:     Option<Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub outcome:  Option<Value>,
  /// Uid of the assigned caregiver, if any.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub assignee: Option<Value>,
}

impl From<DateSlotRecord> for Value {
  fn from(record: DateSlotRecord) -> Self {
    let fields = [
      ("date", record.date),
      ("slot", record.slot),
      ("outcome", record.outcome),
      ("assignee", record.assignee),
    ];
    Value::Object(
      fields
        .into_iter()
        .filter_map(|(key, value)| Some((key.to_owned(), value?)))
        .collect::<Map<_, _>>(),
    )
  }
}

/// A whole population, as written to a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationDocument {
  #[serde(default)]
  pub persons: Vec<PersonRecord>,
}
