//! Core types and operations for the Carebook visit register.
//!
//! This crate holds the patient/caregiver data model, the date-slot outcome
//! state machine, the in-memory population store and the mutation operations.
//! It knows nothing about files or databases; persistence backends implement
//! [`store::RecordStore`] in their own crates.

pub mod date_slot;
pub mod error;
pub mod field;
pub mod filter;
pub mod mutation;
pub mod person;
pub mod population;
pub mod session;
pub mod store;
pub mod uid;

pub use error::{Error, Result};

#[cfg(test)]
pub(crate) mod test_helpers;
