use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use log::{debug, warn};

use crate::errors::{Error, Result, SettingsError};
use crate::settings::{SettingsStore, WalletSettings};

/// [`SettingsStore`] backed by a pretty-printed JSON file.
#[derive(Debug)]
pub struct FileSettingsStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Move an unparseable settings file aside so the next load starts from
    /// defaults. Returns where the old file went, or `None` when the file
    /// was missing or readable.
    pub fn discard_malformed(&self) -> Result<Option<PathBuf>> {
        let _guard = self.guard()?;
        match self.load_locked() {
            Err(Error::Settings(SettingsError::Malformed(reason))) => {
                let backup = self.sibling("malformed");
                warn!("Discarding settings file: {}", reason);
                fs::rename(&self.path, &backup).map_err(|e| {
                    SettingsError::Write(format!("{}: {}", backup.display(), e))
                })?;
                Ok(Some(backup))
            }
            Err(e) => Err(e),
            Ok(_) => Ok(None),
        }
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".");
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| SettingsError::LockPoisoned.into())
    }

    fn load_locked(&self) -> Result<WalletSettings> {
        if !self.path.exists() {
            debug!("No settings file at {}, using defaults", self.path.display());
            return Ok(WalletSettings::default());
        }

        let raw = fs::read(&self.path)
            .map_err(|e| SettingsError::Read(format!("{}: {}", self.path.display(), e)))?;
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(WalletSettings::default());
        }

        let settings = serde_json::from_slice(&raw)
            .map_err(|e| SettingsError::Malformed(format!("{}: {}", self.path.display(), e)))?;
        Ok(settings)
    }

    fn persist_locked(&self, settings: &WalletSettings) -> Result<()> {
        let write_err =
            |e: std::io::Error| SettingsError::Write(format!("{}: {}", self.path.display(), e));

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        // Write a sibling and rename it over the file, so a crash mid-write
        // never leaves a truncated document behind.
        let json = serde_json::to_string_pretty(settings)?;
        let staging = self.sibling("tmp");
        fs::write(&staging, json).map_err(write_err)?;
        fs::rename(&staging, &self.path).map_err(write_err)?;
        Ok(())
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Result<WalletSettings> {
        let _guard = self.guard()?;
        self.load_locked()
    }

    fn save(&self, settings: &WalletSettings) -> Result<()> {
        let _guard = self.guard()?;
        self.persist_locked(settings)
    }

    fn update(&self, op: &mut dyn FnMut(&mut WalletSettings)) -> Result<WalletSettings> {
        let _guard = self.guard()?;
        let mut settings = self.load_locked()?;
        op(&mut settings);
        self.persist_locked(&settings)?;
        Ok(settings)
    }
}
