use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::Mutex,
};

use autovalue_core::{storage::stamp_record, CoreError, Filter, RecordStore};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tempfile::NamedTempFile;

const TABLE_EXTENSION: &str = "json";

/// Filesystem-backed JSON persistence: one array file per table.
pub struct JsonRecordStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonRecordStore {
    pub fn new(root: PathBuf) -> Result<Self, CoreError> {
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn table_path(&self, table: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", canonical_name(table), TABLE_EXTENSION))
    }

    /// Table names present on disk, sorted.
    pub fn list_tables(&self) -> Result<Vec<String>, CoreError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(TABLE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn read_table(&self, table: &str) -> Result<Vec<Value>, CoreError> {
        let path = self.table_path(table);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&path)?;
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_str(&data)? {
            Value::Array(rows) => Ok(rows),
            _ => Err(CoreError::Store(format!(
                "table `{}` is not a JSON array",
                canonical_name(table)
            ))),
        }
    }

    fn write_table(&self, table: &str, rows: &[Value]) -> Result<(), CoreError> {
        let json = serde_json::to_string_pretty(rows)?;
        // Readers see either the old table or the new one, never a partial write.
        let mut file = NamedTempFile::new_in(&self.root)?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
        file.persist(self.table_path(table)).map_err(|err| CoreError::from(err.error))?;
        Ok(())
    }
}

impl RecordStore for JsonRecordStore {
    fn select(&self, table: &str, filter: &Filter) -> Result<Option<Value>, CoreError> {
        Ok(self
            .read_table(table)?
            .into_iter()
            .find(|row| filter.accepts(row)))
    }

    fn select_all(&self, table: &str, filter: &Filter) -> Result<Vec<Value>, CoreError> {
        Ok(self
            .read_table(table)?
            .into_iter()
            .filter(|row| filter.accepts(row))
            .collect())
    }

    fn insert(&self, table: &str, record: Value, now: DateTime<Utc>) -> Result<Value, CoreError> {
        let stored = stamp_record(record, now)?;
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| CoreError::Store("table write lock poisoned".into()))?;
        let mut rows = self.read_table(table)?;
        rows.push(stored.clone());
        self.write_table(table, &rows)?;
        Ok(stored)
    }
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "records".into()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_are_filesystem_safe() {
        assert_eq!(canonical_name("Trade-In Offers"), "trade_in_offers");
        assert_eq!(canonical_name("../etc"), "___etc");
        assert_eq!(canonical_name("  "), "records");
    }
}
