//! [`JsonFileStore`] — a [`RecordStore`] backed by one JSON document.

use std::{
  ffi::OsString,
  fs, io,
  path::{Path, PathBuf},
};

use carebook_core::{population::Population, store::RecordStore};

use crate::{Error, Result, from_json, to_json};

/// Stores the whole population as a single pretty-printed JSON file.
///
/// Saves go to a sibling `*.tmp` file that is then renamed over the target,
/// so a concurrent or later load sees either the old or the new snapshot.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
  path: PathBuf,
}

impl JsonFileStore {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  pub fn path(&self) -> &Path { &self.path }

  fn temp_path(&self) -> PathBuf {
    let mut name = self
      .path
      .file_name()
      .map(OsString::from)
      .unwrap_or_default();
    name.push(".tmp");
    self.path.with_file_name(name)
  }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> Error + '_ {
  move |source| Error::Io { path: path.to_path_buf(), source }
}

impl RecordStore for JsonFileStore {
  type Error = Error;

  /// A missing file loads as an empty population.
  fn load(&self) -> Result<Population> {
    let raw = match fs::read_to_string(&self.path) {
      Ok(raw) => raw,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        tracing::debug!("no store at {}, starting empty", self.path.display());
        return Ok(Population::new());
      }
      Err(e) => return Err(io_error(&self.path)(e)),
    };

    let population = from_json(&raw)?;
    tracing::debug!(
      "read {} persons from {}",
      population.len(),
      self.path.display()
    );
    Ok(population)
  }

  fn save(&self, population: &Population) -> Result<()> {
    let json = to_json(population)?;

    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty())
    {
      fs::create_dir_all(parent).map_err(io_error(parent))?;
    }

    let temp = self.temp_path();
    fs::write(&temp, json).map_err(io_error(&temp))?;
    fs::rename(&temp, &self.path).map_err(io_error(&self.path))?;

    tracing::debug!(
      "wrote {} persons to {}",
      population.len(),
      self.path.display()
    );
    Ok(())
  }
}
