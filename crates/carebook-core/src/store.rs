//! The [`RecordStore`] trait implemented by persistence backends.
//!
//! Backends live in their own crates (`carebook-record` for JSON files,
//! `carebook-store-sqlite` for SQLite). The session depends on this trait,
//! not on any concrete backend.

use crate::population::Population;

/// Durable storage for a whole [`Population`].
///
/// Both operations work on complete snapshots:
///
/// - `load` either decodes and validates every stored record, or fails
///   without returning a partial population;
/// - `save` replaces the stored snapshot so that a later `load` observes
///   either the old snapshot or the new one, never a mixture.
pub trait RecordStore {
  type Error: std::error::Error + 'static;

  fn load(&self) -> Result<Population, Self::Error>;

  fn save(&self, population: &Population) -> Result<(), Self::Error>;
}
