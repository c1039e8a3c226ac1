//! Runtime configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONTAINER_CLASS: &str = "replais-dot-container";

/// Widget attachment timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MountOptions {
    /// Period of the initial attachment loop.
    pub interval_ms: u32,
    /// Initial attachment attempts before giving up.
    pub max_attempts: u32,
    /// Delay before the first remount attempt after a conversation switch.
    pub remount_initial_delay_ms: u32,
    /// Delays between remount attempts; its length bounds the retries.
    pub remount_delays_ms: Vec<u32>,
    /// Marker class of the injected container.
    pub container_class: String,
}

impl Default for MountOptions {
    fn default() -> Self {
        Self {
            interval_ms: 2_000,
            max_attempts: 10,
            remount_initial_delay_ms: 300,
            remount_delays_ms: vec![300, 500, 800, 1_200, 2_000],
            container_class: DEFAULT_CONTAINER_CLASS.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReplaisConfig {
    pub mount: MountOptions,
    /// Conversation watcher poll period.
    pub watch_interval_ms: u32,
    /// Messages sent with widget-triggered replies.
    pub context_limit: usize,
    /// Messages sent with host-triggered (`SUGGEST_REPLY`) replies.
    pub trigger_context_limit: usize,
    /// Client-side reply timeout; 0 disables it.
    pub reply_timeout_ms: u32,
    /// HTTP reply backend. The mock generator is used when unset.
    pub backend_url: Option<String>,
}

impl Default for ReplaisConfig {
    fn default() -> Self {
        Self {
            mount: MountOptions::default(),
            watch_interval_ms: crate::watcher::DEFAULT_POLL_INTERVAL_MS,
            context_limit: 12,
            trigger_context_limit: crate::adapters::DEFAULT_CONTEXT_LIMIT,
            reply_timeout_ms: 30_000,
            backend_url: None,
        }
    }
}

impl ReplaisConfig {
    /// Parse a (possibly partial) JSON config; missing fields keep their
    /// defaults.
    pub fn from_json(content: &str) -> Result<Self> {
        let config: ReplaisConfig =
            serde_json::from_str(content).context("Failed to parse ReplAIs config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.mount.interval_ms == 0 {
            anyhow::bail!("mount.intervalMs must be greater than zero");
        }
        if self.mount.max_attempts == 0 {
            anyhow::bail!("mount.maxAttempts must be greater than zero");
        }
        if self.watch_interval_ms == 0 {
            anyhow::bail!("watchIntervalMs must be greater than zero");
        }
        if self.mount.container_class.trim().is_empty()
            || self.mount.container_class.contains(char::is_whitespace)
        {
            anyhow::bail!(
                "mount.containerClass must be a single class name, got {:?}",
                self.mount.container_class
            );
        }
        Ok(())
    }
}
