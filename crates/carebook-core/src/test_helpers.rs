//! Builders shared by the unit tests in this crate.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::{
  date_slot::{DateSlot, Outcome},
  field::{Address, Email, Gender, Name, Phone, Tag},
  person::{Contact, Patient, Person},
  uid::Uid,
};

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub(crate) fn uid(raw: u64) -> Uid { Uid::new(raw).unwrap() }

pub(crate) fn slot(date: NaiveDate, index: u8, outcome: Outcome) -> DateSlot {
  DateSlot::restore(date, index, outcome, None).unwrap()
}

pub(crate) fn contact(raw_uid: u64, name: &str) -> Contact {
  Contact {
    uid:     uid(raw_uid),
    name:    Name::parse(name).unwrap(),
    gender:  Gender::Female,
    phone:   Phone::parse("98765432").unwrap(),
    email:   Email::parse("someone@example.com").unwrap(),
    address: Address::parse("Blk 30 Clementi Ave 3").unwrap(),
    tags:    BTreeSet::new(),
  }
}

pub(crate) fn with_tags(mut contact: Contact, tags: &[&str]) -> Contact {
  contact.tags = tags.iter().map(|t| Tag::parse(t).unwrap()).collect();
  contact
}

pub(crate) fn patient(raw_uid: u64, name: &str, slots: Vec<DateSlot>) -> Person {
  Person::Patient(Patient::new(contact(raw_uid, name), slots).unwrap())
}

pub(crate) fn caregiver(raw_uid: u64, name: &str) -> Person {
  Person::Caregiver(contact(raw_uid, name))
}
