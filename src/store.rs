//! File-backed persistence for the task list.
//!
//! The data file is a single pretty-printed JSON array (4-space indent,
//! non-ASCII written literally). Loading never fails: a missing file is an
//! empty list, and an unreadable or malformed one is reported through
//! `tracing` and then treated as empty.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::task::Task;

/// File name used when no path is given.
pub const DEFAULT_FILE: &str = "tarefas.json";

const INDENT: &[u8] = b"    ";

/// Durable mapping between a task list and one JSON file.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Store { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the task list, falling back to an empty list on any failure.
    pub fn load(&self) -> Vec<Task> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no data file, starting empty");
            return Vec::new();
        }
        let mut buf = String::new();
        match File::open(&self.path).and_then(|mut f| f.read_to_string(&mut buf)) {
            Ok(_) => match serde_json::from_str::<Vec<Task>>(&buf) {
                Ok(tasks) => {
                    debug!(path = %self.path.display(), count = tasks.len(), "loaded tasks");
                    tasks
                }
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "malformed data file, starting empty");
                    Vec::new()
                }
            },
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unreadable data file, starting empty");
                Vec::new()
            }
        }
    }

    /// Write the whole list, replacing the file via temp file + rename.
    pub fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        let data = encode(tasks)?;
        let tmp = self.temp_path();
        let mut f = File::create(&tmp).map_err(|e| StoreError::io(&tmp, e))?;
        f.write_all(&data).map_err(|e| StoreError::io(&tmp, e))?;
        f.flush().map_err(|e| StoreError::io(&tmp, e))?;
        drop(f);
        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            StoreError::io(&self.path, e)
        })?;
        debug!(path = %self.path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }

    /// Copy the data file to `backup/<timestamp>_<file name>` beside it.
    pub fn backup(&self) -> Result<PathBuf, StoreError> {
        if !self.path.exists() {
            return Err(StoreError::Missing(self.path.clone()));
        }
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        let backup_dir = parent.join("backup");
        fs::create_dir_all(&backup_dir).map_err(|e| StoreError::io(&backup_dir, e))?;

        let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let file_name = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(DEFAULT_FILE);
        let backup_path = backup_dir.join(format!("{timestamp}_{file_name}"));
        fs::copy(&self.path, &backup_path).map_err(|e| StoreError::io(&backup_path, e))?;
        Ok(backup_path)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from(DEFAULT_FILE));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Serialize a task list in the on-disk layout.
pub fn encode(tasks: &[Task]) -> Result<Vec<u8>, StoreError> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    tasks.serialize(&mut ser)?;
    Ok(buf)
}
