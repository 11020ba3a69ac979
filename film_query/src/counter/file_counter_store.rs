// counter/file_counter_store.rs
use log::{debug, warn};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::counter_store::{CounterError, CounterStore, CounterTable};

/// Counter table persisted as a JSON object in a single file.
///
/// Every `record` re-reads the file, bumps one entry and rewrites the whole
/// table. Two processes pointed at the same file can lose each other's
/// updates.
pub struct FileCounterStore {
    path: PathBuf,
}

impl FileCounterStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, table: &CounterTable) -> Result<(), CounterError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        table.serialize(&mut serializer)?;
        fs::write(&self.path, buf)?;
        Ok(())
    }
}

impl CounterStore for FileCounterStore {
    fn load(&self) -> CounterTable {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No counter file at {}, starting empty", self.path.display());
                return CounterTable::new();
            }
            Err(e) => {
                warn!("Could not read counter file {}: {}", self.path.display(), e);
                return CounterTable::new();
            }
        };
        serde_json::from_str(&contents).unwrap_or_else(|e| {
            warn!("Ignoring malformed counter file {}: {}", self.path.display(), e);
            CounterTable::new()
        })
    }

    fn record(&mut self, signature: &str) -> Result<u64, CounterError> {
        let mut table = self.load();
        let count = {
            let entry = table.entry(signature.to_string()).or_insert(0);
            *entry += 1;
            *entry
        };
        self.save(&table)?;
        debug!("Recorded '{}' -> {}", signature, count);
        Ok(count)
    }
}
