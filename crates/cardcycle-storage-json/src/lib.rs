//! cardcycle-storage-json
//!
//! Filesystem-backed JSON persistence for the card list, its backups and the
//! import/export documents.

pub mod exchange;
pub mod migration;

use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use cardcycle_core::{card_warnings, CardBackupInfo, CardStorage, CoreError, LoadReport};
use cardcycle_domain::Card;
use chrono::{NaiveDateTime, Utc};
use serde_json::Value;

pub use exchange::{export_document, export_file_name, parse_import, ImportedDocument};
pub use migration::{cards_from_value, MigratedCards};

pub const CARDS_FILE_NAME: &str = "cards.json";
const BACKUP_DIR_NAME: &str = "backups";
const BACKUP_PREFIX: &str = "cards";
const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const STAGING_SUFFIX: &str = ".partial";
pub const DEFAULT_RETENTION: usize = 5;

/// Stores the card list as `<data_dir>/cards.json` with backups in
/// `<data_dir>/backups/`.
#[derive(Debug, Clone)]
pub struct JsonCardStorage {
    data_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonCardStorage {
    pub fn new(data_dir: PathBuf) -> Result<Self, CoreError> {
        Self::with_retention(data_dir, DEFAULT_RETENTION)
    }

    pub fn with_retention(data_dir: PathBuf, retention: usize) -> Result<Self, CoreError> {
        let backups_dir = data_dir.join(BACKUP_DIR_NAME);
        fs::create_dir_all(&data_dir)?;
        fs::create_dir_all(&backups_dir)?;
        Ok(Self {
            data_dir,
            backups_dir,
            retention: retention.max(1),
        })
    }

    pub fn cards_path(&self) -> PathBuf {
        self.data_dir.join(CARDS_FILE_NAME)
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    pub fn delete_backup(&self, backup_id: &str) -> Result<(), CoreError> {
        let path = self.backups_dir.join(backup_id);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Copies the current file into the backup directory, if there is one.
    fn backup_existing_file(&self, note: Option<&str>) -> Result<Option<CardBackupInfo>, CoreError> {
        let source = self.cards_path();
        if !source.exists() {
            return Ok(None);
        }
        fs::create_dir_all(&self.backups_dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut stem = format!("{BACKUP_PREFIX}_{timestamp}");
        if let Some(label) = sanitize_backup_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        let path = next_backup_path(&self.backups_dir, &stem)?;
        fs::copy(&source, &path)?;
        self.prune_backups()?;
        let id = file_name_of(&path);
        tracing::debug!(backup = %id, "backed up card file");
        Ok(Some(CardBackupInfo {
            id,
            created_at: timestamp,
            path,
        }))
    }

    fn prune_backups(&self) -> Result<(), CoreError> {
        for entry in self.list_backups()?.into_iter().skip(self.retention) {
            let _ = fs::remove_file(entry.path);
        }
        Ok(())
    }
}

impl CardStorage for JsonCardStorage {
    fn save_cards_noted(&self, cards: &[Card], note: Option<&str>) -> Result<(), CoreError> {
        let path = self.cards_path();
        self.backup_existing_file(note)?;
        save_cards_to_path(cards, &path)?;
        tracing::info!(cards = cards.len(), path = %path.display(), "saved cards");
        Ok(())
    }

    fn load_cards(&self) -> Result<LoadReport, CoreError> {
        let path = self.cards_path();
        if !path.exists() {
            return Ok(LoadReport::default());
        }
        load_cards_from_path(&path)
    }

    fn backup_cards(&self, note: Option<&str>) -> Result<Option<CardBackupInfo>, CoreError> {
        self.backup_existing_file(note)
    }

    fn list_backups(&self) -> Result<Vec<CardBackupInfo>, CoreError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let Some(created_at) = backup_timestamp(file_name) else {
                continue;
            };
            entries.push(CardBackupInfo {
                id: file_name.to_string(),
                created_at,
                path: path.clone(),
            });
        }
        entries.sort_by_key(|info| Reverse(backup_sort_key(&info.id)));
        Ok(entries)
    }

    fn restore_backup(&self, backup: &CardBackupInfo) -> Result<LoadReport, CoreError> {
        if !backup.path.exists() {
            return Err(CoreError::Storage(format!(
                "backup `{}` not found",
                backup.id
            )));
        }
        let report = load_cards_from_path(&backup.path)?;
        let target = self.cards_path();
        replace_file(&target, &fs::read(&backup.path)?)?;
        tracing::info!(backup = %backup.id, "restored card backup");
        Ok(report)
    }
}

/// Saves cards to an arbitrary path through a temporary file.
pub fn save_cards_to_path(cards: &[Card], path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    replace_file(path, serialize_cards(cards)?.as_bytes())
}

/// Loads and migrates cards from the provided path.
pub fn load_cards_from_path(path: &Path) -> Result<LoadReport, CoreError> {
    let data = fs::read_to_string(path)?;
    let value: Value =
        serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))?;
    let migrated = cards_from_value(value).map_err(|err| match err {
        CoreError::MalformedImport(reason) => {
            CoreError::Storage(format!("{}: {reason}", path.display()))
        }
        other => other,
    })?;
    let warnings = card_warnings(&migrated.cards);
    for warning in &warnings {
        tracing::warn!(%warning, "stored data anomaly");
    }
    Ok(LoadReport {
        cards: migrated.cards,
        migrations: migrated.migrations,
        warnings,
    })
}

/// Lowercase ASCII words of the note joined by `-`, if any remain.
fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let words: Vec<String> = note?
        .split(|ch: char| !ch.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();
    (!words.is_empty()).then(|| words.join("-"))
}

/// Picks `<stem>.json`, or `<stem>-N.json` above any sequence already taken
/// when several backups share a second.
fn next_backup_path(dir: &Path, stem: &str) -> Result<PathBuf, CoreError> {
    let suffix = format!(".{BACKUP_EXTENSION}");
    let mut highest: Option<u32> = None;
    for entry in fs::read_dir(dir)? {
        let name = entry?.file_name();
        let Some(rest) = name
            .to_str()
            .and_then(|name| name.strip_prefix(stem))
            .and_then(|rest| rest.strip_suffix(&suffix))
        else {
            continue;
        };
        let sequence = match rest.strip_prefix('-') {
            None if rest.is_empty() => Some(0),
            Some(digits) => digits.parse().ok(),
            None => None,
        };
        highest = highest.max(sequence);
    }
    let file_name = match highest {
        None => format!("{stem}{suffix}"),
        Some(taken) => format!("{stem}-{}{suffix}", taken + 1),
    };
    Ok(dir.join(file_name))
}

/// Extracts the `YYYYMMDD_HHMMSS` part of `cards_<timestamp>[_note].json`.
fn backup_timestamp(file_name: &str) -> Option<String> {
    let rest = file_name.strip_prefix(&format!("{BACKUP_PREFIX}_"))?;
    let raw = rest.get(..15)?;
    NaiveDateTime::parse_from_str(raw, BACKUP_TIMESTAMP_FORMAT).ok()?;
    Some(raw.to_string())
}

fn backup_sort_key(file_name: &str) -> (String, u32) {
    let timestamp = backup_timestamp(file_name).unwrap_or_default();
    let stem = file_name
        .strip_suffix(&format!(".{BACKUP_EXTENSION}"))
        .unwrap_or(file_name);
    let sequence = stem
        .rsplit_once('-')
        .and_then(|(_, tail)| tail.parse().ok())
        .unwrap_or(0);
    (timestamp, sequence)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string()
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(STAGING_SUFFIX);
    path.with_file_name(name)
}

/// Writes `data` to a staging file, flushes it to disk and renames it over `path`.
fn replace_file(path: &Path, data: &[u8]) -> Result<(), CoreError> {
    let staging = staging_path(path);
    let mut file = File::create(&staging)?;
    file.write_all(data)?;
    file.sync_all()?;
    fs::rename(&staging, path)?;
    Ok(())
}

fn serialize_cards(cards: &[Card]) -> Result<String, CoreError> {
    serde_json::to_string_pretty(cards).map_err(|err| CoreError::Serde(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_names_parse_with_and_without_notes() {
        assert_eq!(
            backup_timestamp("cards_20240501_101500.json").as_deref(),
            Some("20240501_101500")
        );
        assert_eq!(
            backup_timestamp("cards_20240501_101500_before-import.json").as_deref(),
            Some("20240501_101500")
        );
        assert!(backup_timestamp("notes.json").is_none());
        assert!(backup_timestamp("cards_2024.json").is_none());
    }

    #[test]
    fn same_second_backups_sort_by_sequence() {
        let first = backup_sort_key("cards_20240501_101500.json");
        let second = backup_sort_key("cards_20240501_101500-1.json");
        let eleventh = backup_sort_key("cards_20240501_101500-10.json");
        assert!(first < second && second < eleventh);
    }

    #[test]
    fn notes_are_slugged() {
        assert_eq!(
            sanitize_backup_note(Some("  Before Import!! v2 ")).as_deref(),
            Some("before-import-v2")
        );
        assert!(sanitize_backup_note(Some("***")).is_none());
        assert!(sanitize_backup_note(None).is_none());
    }
}
