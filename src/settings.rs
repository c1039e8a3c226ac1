//! Settings collaborator
//!
//! The persistence medium belongs to the host (`chrome.storage.sync` in the
//! browser); the core only sees [`SettingsStore`].

use crate::error::{ReplaisError, Result};
use crate::models::{ContactConfig, PlatformId, UserSettings};
use async_trait::async_trait;
use std::cell::{Cell, RefCell};

#[async_trait(?Send)]
pub trait SettingsStore {
    /// Stored settings, or `UserSettings::default()` when nothing was saved.
    async fn load(&self) -> Result<UserSettings>;
    async fn save(&self, settings: &UserSettings) -> Result<()>;
}

/// Stored config for a conversation, or a fresh shell for a new one.
pub async fn contact_config(
    store: &dyn SettingsStore,
    platform: PlatformId,
    contact_key: &str,
    title: Option<&str>,
) -> Result<ContactConfig> {
    let settings = store.load().await?;
    Ok(settings.contact_or_default(platform, contact_key, title))
}

/// Read-modify-write of a single contact entry.
pub async fn upsert_contact_config(store: &dyn SettingsStore, config: ContactConfig) -> Result<()> {
    let mut settings = store.load().await?;
    log::debug!("saving contact config for {}", config.contact_key);
    settings.upsert_contact(config);
    store.save(&settings).await
}

/// Settings kept in memory. Used natively and in tests.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: RefCell<Option<UserSettings>>,
    saves: Cell<usize>,
    failing: Cell<bool>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: UserSettings) -> Self {
        let store = Self::default();
        store.settings.replace(Some(settings));
        store
    }

    /// Make every subsequent load and save fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    pub fn saves(&self) -> usize {
        self.saves.get()
    }

    pub fn snapshot(&self) -> Option<UserSettings> {
        self.settings.borrow().clone()
    }

    fn check(&self) -> Result<()> {
        if self.failing.get() {
            return Err(ReplaisError::Settings("store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl SettingsStore for MemorySettingsStore {
    async fn load(&self) -> Result<UserSettings> {
        self.check()?;
        Ok(self.settings.borrow().clone().unwrap_or_default())
    }

    async fn save(&self, settings: &UserSettings) -> Result<()> {
        self.check()?;
        self.settings.replace(Some(settings.clone()));
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
