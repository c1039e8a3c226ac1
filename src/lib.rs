//! ReplAIs content-script core
//!
//! Detects the messaging site a page belongs to, extracts the open
//! conversation into a normalized [`MessageContext`], keeps a small reply
//! widget attached next to the site's composer, and writes generated replies
//! back into it.
//!
//! The page is reached through the [`dom::Document`] traits and all waiting
//! goes through [`timers::Scheduler`], so everything except the `web`
//! bindings runs natively against [`dom::memory`] and
//! [`timers::manual::ManualScheduler`].

pub mod adapters;
pub mod assistant;
pub mod composer;
pub mod config;
pub mod dom;
pub mod error;
pub mod messaging;
pub mod models;
pub mod mount;
pub mod reply;
pub mod script;
pub mod settings;
pub mod timers;
pub mod utils;
pub mod watcher;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use adapters::{AdapterRegistry, ContextOptions, MountPositionHint, SiteAdapter, WhatsAppAdapter};
pub use assistant::{ReplyAssistant, ReplyOverrides};
pub use composer::ComposerIo;
pub use config::{MountOptions, ReplaisConfig};
pub use error::{ReplaisError, Result};
pub use messaging::{HostMessage, MetaResponse};
pub use models::{MessageContext, PlatformId, ReplyRequest, ReplyResponse};
pub use mount::{MountController, MountPhase, WidgetRenderer};
pub use reply::{MockReplyGenerator, ReplyGenerator};
pub use script::ContentScript;
pub use settings::{MemorySettingsStore, SettingsStore};
pub use watcher::{ConversationWatcher, PollingWatcher};
