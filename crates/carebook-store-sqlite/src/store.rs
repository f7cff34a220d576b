//! [`SqliteStore`] — the SQLite implementation of [`RecordStore`].

use std::path::Path;

use carebook_core::{population::Population, store::RecordStore};
use carebook_record::{Error as RecordError, decode_records};

use crate::{
  Error, Result,
  encode::{RawPerson, decode_row, encode_row},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Carebook population backed by a single SQLite file.
pub struct SqliteStore {
  pub(crate) conn: rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = rusqlite::Connection::open(path)?;
    let store = Self { conn };
    store.init_schema()?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub fn open_in_memory() -> Result<Self> {
    let conn = rusqlite::Connection::open_in_memory()?;
    let store = Self { conn };
    store.init_schema()?;
    Ok(store)
  }

  fn init_schema(&self) -> Result<()> {
    self.conn.execute_batch(SCHEMA)?;
    Ok(())
  }

  fn read_rows(&self) -> Result<Vec<RawPerson>> {
    let mut stmt = self.conn.prepare(
      "SELECT uid, category, record_json FROM persons ORDER BY position",
    )?;
    let rows = stmt
      .query_map([], |row| {
        Ok(RawPerson {
          uid:         row.get(0)?,
          category:    row.get(1)?,
          record_json: row.get(2)?,
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  fn load(&self) -> Result<Population> {
    let records = self
      .read_rows()?
      .into_iter()
      .enumerate()
      .map(|(position, raw)| {
        decode_row(raw).map_err(|e| RecordError::load_failure(Some(position), e))
      })
      .collect::<Result<Vec<_>, RecordError>>()?;

    let population = decode_records(records)?;
    tracing::debug!("read {} persons from sqlite", population.len());
    Ok(population)
  }

  fn save(&self, population: &Population) -> Result<()> {
    let rows = population
      .iter()
      .map(encode_row)
      .collect::<Result<Vec<_>>>()?;

    let tx = self.conn.unchecked_transaction()?;
    tx.execute("DELETE FROM persons", [])?;
    {
      let mut insert = tx.prepare(
        "INSERT INTO persons (position, uid, category, record_json)
         VALUES (?1, ?2, ?3, ?4)",
      )?;
      for (position, row) in rows.iter().enumerate() {
        insert.execute(rusqlite::params![
          position as i64,
          row.uid,
          row.category,
          row.record_json,
        ])?;
      }
    }
    tx.commit()?;

    tracing::debug!("wrote {} persons to sqlite", rows.len());
    Ok(())
  }
}
