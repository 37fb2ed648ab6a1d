use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::analysis::{SortOrder, StreakSort};
use crate::log_warn;

const ENABLE_LOGS: bool = true;

/// Default ordering for streak listings when the caller does not pick one.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StreakListSettings {
    #[serde(default, alias = "sort_by")]
    pub sort_by: StreakSort,
    #[serde(default)]
    pub order: SortOrder,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct UserSettings {
    /// Overrides the default database location.
    #[serde(default, alias = "database_file", skip_serializing_if = "Option::is_none")]
    database_file: Option<PathBuf>,
    #[serde(default)]
    streaks: StreakListSettings,
}

/// Snapshot of the stored settings, as reported to the user.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SettingsView {
    pub path: PathBuf,
    pub database_file: Option<PathBuf>,
    pub streaks: StreakListSettings,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log_warn!("Ignoring malformed settings at {}: {err}", path.display());
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn database_file(&self) -> Option<PathBuf> {
        self.read().database_file.clone()
    }

    pub fn view(&self) -> SettingsView {
        let data = self.read();
        SettingsView {
            path: self.path.clone(),
            database_file: data.database_file.clone(),
            streaks: data.streaks,
        }
    }

    pub fn streaks(&self) -> StreakListSettings {
        self.read().streaks
    }

    pub fn update_streaks(&self, settings: StreakListSettings) -> Result<()> {
        let mut guard = self.write();
        guard.streaks = settings;
        self.persist(&guard)
    }

    pub fn update_database_file(&self, database_file: Option<PathBuf>) -> Result<()> {
        let mut guard = self.write();
        guard.database_file = database_file;
        self.persist(&guard)
    }

    fn read(&self) -> RwLockReadGuard<'_, UserSettings> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, UserSettings> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
