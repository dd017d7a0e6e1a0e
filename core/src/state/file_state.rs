/* -------------------------------------------------------- *\
 *                                                          *
 *  tsprov: declarative ThoughtSpot TML provider            *
 *                                                          *
 *  This file is licensed as MIT. See LICENSE for details.  *
 *                                                          *
\* ---------------------------------------------------------*/


use super::StateHandler;
use anyhow::{anyhow, Context};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::{
	collections::BTreeSet,
	fs,
	io::Write,
	path::PathBuf,
};
use tempfile::NamedTempFile;
use tsprov_sdk::{Result, Urn};

/// Default location of the state file, relative to the working directory.
pub const DEFAULT_STATE_PATH: &str = ".tsprov/state.json";

/// State kept as a single JSON object, URN → resource state.
///
/// Every write replaces the whole file through a temporary file in the same directory, a crash
/// never leaves a truncated state behind.
pub struct FileState {
	path: PathBuf,
	entries: Mutex<Map<String, Value>>,
}

impl std::fmt::Debug for FileState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FileState")
			.field("path", &self.path)
			.field("resources", &self.entries.lock().len())
			.finish()
	}
}

impl FileState {
	/// Opens the state stored at `path`, the file is created on the first write.
	pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
		let path = path.into();
		let entries = if path.exists() {
			let raw = fs::read_to_string(&path)
				.with_context(|| format!("unable to read state file {}", path.display()))?;
			if raw.trim().is_empty() {
				Map::new()
			} else {
				serde_json::from_str(&raw)
					.with_context(|| format!("state file {} is corrupted", path.display()))?
			}
		} else {
			Map::new()
		};

		log::debug!("Loaded {} resource(s) from {}", entries.len(), path.display());
		Ok(Self { path, entries: Mutex::new(entries) })
	}

	fn persist(&self, entries: &Map<String, Value>) -> Result<()> {
		let dir = match self.path.parent() {
			Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
			_ => PathBuf::from("."),
		};
		fs::create_dir_all(&dir)?;

		let mut file = NamedTempFile::new_in(&dir)?;
		serde_json::to_writer_pretty(&mut file, entries)?;
		file.write_all(b"\n")?;
		file.persist(&self.path)
			.map_err(|err| anyhow!("unable to write state file {}: {}", self.path.display(), err))?;
		Ok(())
	}
}

impl StateHandler for FileState {
	fn get(&self, urn: &Urn) -> Result<Option<Value>> {
		Ok(self.entries.lock().get(urn.as_str()).cloned())
	}

	fn save(&self, urn: &Urn, state: &Value) -> Result<()> {
		let mut entries = self.entries.lock();
		entries.insert(urn.to_string(), state.clone());
		self.persist(&entries)
	}

	fn delete(&self, urn: &Urn) -> Result<()> {
		let mut entries = self.entries.lock();
		if entries.remove(urn.as_str()).is_none() {
			return Ok(())
		}
		self.persist(&entries)
	}

	fn resources(&self) -> Result<BTreeSet<Urn>> {
		self.entries.lock().keys().map(|urn| urn.parse()).collect()
	}
}
