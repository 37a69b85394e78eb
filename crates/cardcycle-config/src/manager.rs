use std::{
    cmp::Reverse,
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use chrono::{NaiveDateTime, Utc};

use crate::{Config, ConfigError};

const CONFIG_FILE_NAME: &str = "config.json";
const BACKUP_PREFIX: &str = "config_";
const BACKUP_EXTENSION: &str = ".json";
const BACKUP_STAMP: &str = "%Y%m%d_%H%M%S";
const BACKUP_STAMP_LEN: usize = 15;

/// Reads and writes the user [`Config`] and its named snapshots.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
    backups_dir: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf, backups_dir: PathBuf) -> Self {
        Self {
            config_path,
            backups_dir,
        }
    }

    /// Uses `<base>/config/config.json` with snapshots in `<base>/config/backups/`.
    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        let dir = base.join("config");
        let manager = Self::new(dir.join(CONFIG_FILE_NAME), dir.join("backups"));
        fs::create_dir_all(&manager.backups_dir)?;
        Ok(manager)
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Falls back to [`Config::default`] until something has been saved.
    pub fn load(&self) -> Result<Config, ConfigError> {
        match fs::read_to_string(&self.config_path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Config::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        replace_file(&self.config_path, &serde_json::to_string_pretty(config)?)
    }

    /// Snapshots `config` as `config_<stamp>[_<note>].json` and returns that name.
    pub fn backup(&self, config: &Config, note: Option<&str>) -> Result<String, ConfigError> {
        let stamp = Utc::now().format(BACKUP_STAMP).to_string();
        let name = match note.and_then(slugify) {
            Some(slug) => format!("{BACKUP_PREFIX}{stamp}_{slug}{BACKUP_EXTENSION}"),
            None => format!("{BACKUP_PREFIX}{stamp}{BACKUP_EXTENSION}"),
        };
        replace_file(
            &self.backups_dir.join(&name),
            &serde_json::to_string_pretty(config)?,
        )?;
        Ok(name)
    }

    /// Reads a snapshot back. Persisting it is left to the caller.
    pub fn restore(&self, backup_name: &str) -> Result<Config, ConfigError> {
        let missing = || ConfigError::BackupNotFound(backup_name.to_string());
        if Path::new(backup_name).file_name() != Some(backup_name.as_ref()) {
            return Err(missing());
        }
        match fs::read_to_string(self.backups_dir.join(backup_name)) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(missing()),
            Err(err) => Err(err.into()),
        }
    }

    /// Snapshot names, newest first.
    pub fn list_backups(&self) -> Result<Vec<String>, ConfigError> {
        let entries = match fs::read_dir(&self.backups_dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let mut names = Vec::new();
        for entry in entries {
            let name = entry?.file_name().to_string_lossy().into_owned();
            if name.ends_with(BACKUP_EXTENSION) {
                names.push(name);
            }
        }
        names.sort_by_cached_key(|name| Reverse((backup_stamp(name), name.clone())));
        Ok(names)
    }
}

/// Lowercase ASCII words of `note` joined by `-`.
fn slugify(note: &str) -> Option<String> {
    let slug = note
        .split(|ch: char| !ch.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    (!slug.is_empty()).then_some(slug)
}

fn backup_stamp(name: &str) -> Option<NaiveDateTime> {
    let stamp = name.strip_prefix(BACKUP_PREFIX)?.get(..BACKUP_STAMP_LEN)?;
    NaiveDateTime::parse_from_str(stamp, BACKUP_STAMP).ok()
}

/// Writes `data` next to `path` and renames it into place.
fn replace_file(path: &Path, data: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let staging = path.with_extension("json.tmp");
    let mut file = fs::File::create(&staging)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    fs::rename(&staging, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamps_ignore_the_note() {
        let plain = backup_stamp("config_20240102_030405.json");
        let noted = backup_stamp("config_20240102_030405_pre-import.json");
        assert!(plain.is_some());
        assert_eq!(plain, noted);
        assert!(backup_stamp("settings.json").is_none());
    }

    #[test]
    fn notes_become_slugs() {
        assert_eq!(slugify("  Before Reset! ").as_deref(), Some("before-reset"));
        assert_eq!(slugify("--"), None);
    }

    #[test]
    fn restore_rejects_paths() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let err = manager.restore("../config.json").unwrap_err();
        assert!(matches!(err, ConfigError::BackupNotFound(_)));
    }
}
