use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use log::warn;
use serde::{Deserialize, Serialize};

use super::ClientError;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTheme {
    dark_mode: bool,
}

/// Dark/light preference persisted to a small JSON file between runs.
///
/// Cloning shares the preference, so any page holding the context can toggle
/// it and every other page sees the change.
#[derive(Debug, Clone)]
pub struct ThemePreference {
    path: Arc<PathBuf>,
    dark: Arc<Mutex<bool>>,
}

impl ThemePreference {
    /// Reads the saved preference. A missing or unreadable file means light mode.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let dark = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<StoredTheme>(&raw) {
                Ok(stored) => stored.dark_mode,
                Err(e) => {
                    warn!("Ignoring unreadable theme file {}: {}", path.display(), e);
                    false
                }
            },
            Err(_) => false,
        };

        Self {
            path: Arc::new(path),
            dark: Arc::new(Mutex::new(dark)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        // Poisoning cannot leave a bool half-written.
        self.dark.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_dark(&self) -> bool {
        *self.lock()
    }

    /// Value for the document-level `data-theme` attribute.
    pub fn attribute(&self) -> &'static str {
        if self.is_dark() {
            "dark"
        } else {
            "light"
        }
    }

    pub fn set_dark(&self, dark: bool) -> Result<(), ClientError> {
        let mut current = self.lock();
        *current = dark;
        self.save(dark)
    }

    /// Flips the preference, persists it, and returns the new value.
    pub fn toggle(&self) -> Result<bool, ClientError> {
        let mut current = self.lock();
        *current = !*current;
        self.save(*current)?;
        Ok(*current)
    }

    fn save(&self, dark: bool) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string(&StoredTheme { dark_mode: dark })?;
        fs::write(self.path.as_ref(), raw)?;
        Ok(())
    }
}
