//! SQL schema for the Carebook SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! layout so later migrations can be gated on it.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per person. Rows are rewritten wholesale on every save.
CREATE TABLE IF NOT EXISTS persons (
    position    INTEGER PRIMARY KEY,   -- display order, 0-based
    uid         INTEGER NOT NULL UNIQUE,
    category    TEXT    NOT NULL,      -- 'P' | 'C'
    record_json TEXT    NOT NULL       -- the person's full JSON record
);

PRAGMA user_version = 1;
";
