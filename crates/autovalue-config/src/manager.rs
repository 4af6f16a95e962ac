use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::{Config, ConfigError};

const CONFIG_FILE: &str = "config.json";
const BACKUPS_DIR: &str = "backups";
const BACKUP_EXTENSION: &str = "json";

/// A saved configuration together with when and why it was captured.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigBackup {
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub config: Config,
}

/// Listing entry for a backup file, read from its envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct BackupInfo {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub note: Option<String>,
}

/// Reads and writes `config.json` and its backups under one directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    dir: PathBuf,
}

impl ConfigManager {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Uses `<base>/config`, creating it and its backup folder.
    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        let manager = Self::new(base.join("config"));
        fs::create_dir_all(manager.backup_root())?;
        Ok(manager)
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    fn backup_root(&self) -> PathBuf {
        self.dir.join(BACKUPS_DIR)
    }

    /// Reads the stored config, or defaults when none has been saved yet.
    pub fn load(&self) -> Result<Config, ConfigError> {
        let path = self.config_path();
        if !path.exists() {
            return Ok(Config::default());
        }
        let config: Config = read_json(&path)?;
        config.pricing.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        config.pricing.validate().map_err(ConfigError::Invalid)?;
        write_json(&self.config_path(), config)
    }

    /// Captures `config` as of `created_at` and returns the backup's file name.
    pub fn backup(
        &self,
        config: &Config,
        note: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> Result<String, ConfigError> {
        let note = note.map(str::trim).filter(|text| !text.is_empty());
        let mut name = created_at.format("config-%Y%m%dT%H%M%S%3f").to_string();
        if let Some(slug) = note.and_then(slugify) {
            name.push('-');
            name.push_str(&slug);
        }
        name.push('.');
        name.push_str(BACKUP_EXTENSION);

        let envelope = ConfigBackup {
            created_at,
            note: note.map(str::to_string),
            config: config.clone(),
        };
        write_json(&self.backup_root().join(&name), &envelope)?;
        Ok(name)
    }

    /// Makes the named backup the active config and returns it.
    pub fn restore(&self, name: &str) -> Result<Config, ConfigError> {
        let path = self.backup_root().join(name);
        let is_backup_file = Path::new(name).file_name().is_some_and(|file| file == name);
        if !is_backup_file || !path.is_file() {
            return Err(ConfigError::MissingBackup(name.to_string()));
        }
        let backup: ConfigBackup = read_json(&path)?;
        self.save(&backup.config)?;
        Ok(backup.config)
    }

    /// Readable backups, newest first. Files that are not backup envelopes are skipped.
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>, ConfigError> {
        let root = self.backup_root();
        if !root.exists() {
            return Ok(Vec::new());
        }
        let mut backups = Vec::new();
        for entry in fs::read_dir(&root)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if let Ok(backup) = read_json::<ConfigBackup>(&path) {
                backups.push(BackupInfo {
                    name: name.to_string(),
                    created_at: backup.created_at,
                    note: backup.note,
                });
            }
        }
        backups.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(backups)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
}

/// Replaces `path` in one rename so a crash never leaves a truncated file.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    let json =
        serde_json::to_string_pretty(value).map_err(|err| ConfigError::Serde(err.to_string()))?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(json.as_bytes())?;
    file.flush()?;
    file.persist(path).map_err(|err| ConfigError::Io(err.error))?;
    Ok(())
}

fn slugify(note: &str) -> Option<String> {
    let mut slug = String::new();
    for ch in note.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    (!slug.is_empty()).then(|| slug.to_string())
}
