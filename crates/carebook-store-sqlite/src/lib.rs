//! SQLite backend for the Carebook record store.
//!
//! Each person is one row holding its JSON record, so the stored fields and
//! their validation are exactly those of [`carebook_record`]. A save replaces
//! every row inside a single transaction.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
