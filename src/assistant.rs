//! Suggest-reply orchestration
//!
//! [`ReplyAssistant`] ties the pieces of one reply together: the adapter for
//! the current page, stored contact settings, the reply backend and the
//! composer the reply is written into.

use crate::adapters::{AdapterRegistry, ContextOptions, SiteAdapter};
use crate::composer::ComposerIo;
use crate::config::ReplaisConfig;
use crate::dom::Document;
use crate::error::{ReplaisError, Result};
use crate::messaging::MetaResponse;
use crate::models::{
    ContactConfig, ReplyRequest, ReplyResponse, UserContext, DEFAULT_PERSONA, DEFAULT_TONE,
};
use crate::reply::{with_timeout, ReplyGenerator};
use crate::settings::{self, SettingsStore};
use crate::timers::Scheduler;
use std::rc::Rc;

/// Per-reply choices made in the widget. Unset fields fall back to the
/// contact's stored config, then to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyOverrides {
    pub persona_id: Option<String>,
    pub tone: Option<String>,
    pub contact_instructions: Option<String>,
    pub reply_instructions: Option<String>,
    /// Messages of context to send; the configured widget limit when unset.
    pub context_limit: Option<usize>,
}

pub struct ReplyAssistant<D: Document> {
    document: D,
    registry: Rc<AdapterRegistry<D>>,
    settings: Rc<dyn SettingsStore>,
    generator: Rc<dyn ReplyGenerator>,
    scheduler: Rc<dyn Scheduler>,
    config: ReplaisConfig,
}

impl<D: Document> ReplyAssistant<D> {
    pub fn new(
        document: D,
        registry: Rc<AdapterRegistry<D>>,
        settings: Rc<dyn SettingsStore>,
        generator: Rc<dyn ReplyGenerator>,
        scheduler: Rc<dyn Scheduler>,
        config: ReplaisConfig,
    ) -> Self {
        Self {
            document,
            registry,
            settings,
            generator,
            scheduler,
            config,
        }
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn config(&self) -> &ReplaisConfig {
        &self.config
    }

    pub fn settings(&self) -> &dyn SettingsStore {
        self.settings.as_ref()
    }

    /// Adapter for the page's current URL.
    pub fn adapter(&self) -> Option<Rc<dyn SiteAdapter<D>>> {
        self.registry.detect(&self.document.location())
    }

    /// Answer for a `GET_META` request.
    pub fn metadata(&self) -> MetaResponse {
        let Some(adapter) = self.adapter() else {
            return MetaResponse::missing();
        };
        match adapter.conversation_title() {
            Some(title) => MetaResponse::found(adapter.id(), title, adapter.contact_key()),
            None => MetaResponse::missing(),
        }
    }

    /// Stored contact settings merged with `overrides`. A settings failure
    /// is logged and treated as "nothing stored".
    pub async fn user_context(
        &self,
        adapter: &dyn SiteAdapter<D>,
        contact_key: &str,
        overrides: &ReplyOverrides,
    ) -> UserContext {
        let title = adapter.conversation_title();
        let stored = match settings::contact_config(
            self.settings.as_ref(),
            adapter.id(),
            contact_key,
            title.as_deref(),
        )
        .await
        {
            Ok(config) => config,
            Err(e) => {
                log::warn!("could not load contact settings: {e}");
                ContactConfig::new(contact_key, adapter.id(), title.as_deref().unwrap_or("Unknown"))
            }
        };

        UserContext {
            contact_key: contact_key.to_string(),
            platform: adapter.id(),
            conversation_title: title.unwrap_or_default(),
            persona_id: Some(
                overrides
                    .persona_id
                    .clone()
                    .or(stored.persona_id)
                    .unwrap_or_else(|| DEFAULT_PERSONA.to_string()),
            ),
            tone: Some(
                overrides
                    .tone
                    .clone()
                    .or(stored.tone)
                    .unwrap_or_else(|| DEFAULT_TONE.to_string()),
            ),
            contact_instructions: overrides
                .contact_instructions
                .clone()
                .or(stored.instructions)
                .unwrap_or_default(),
            reply_instructions: overrides
                .reply_instructions
                .clone()
                .filter(|text| !text.trim().is_empty()),
        }
    }

    /// Everything the backend needs for one reply, read from the page as it
    /// is right now.
    pub async fn build_request(
        &self,
        adapter: &dyn SiteAdapter<D>,
        overrides: &ReplyOverrides,
    ) -> Result<ReplyRequest> {
        let contact_key = adapter.contact_key();
        if contact_key.is_empty() {
            log::warn!("no contact key available");
            return Err(ReplaisError::IdentityMissing);
        }

        let limit = overrides.context_limit.unwrap_or(self.config.context_limit);
        let Some(context) = adapter.context(ContextOptions::with_limit(limit)) else {
            log::warn!("no conversation context found, open a chat and try again");
            return Err(ReplaisError::ContextUnavailable);
        };

        let ui_state = ComposerIo::new(&self.document, Some(adapter)).read_draft_and_selection();
        let user_context = self.user_context(adapter, &contact_key, overrides).await;

        Ok(ReplyRequest {
            context,
            user_context,
            ui_state: Some(ui_state),
        })
    }

    /// Generate a reply for the open conversation and write it into the
    /// composer.
    pub async fn suggest(&self, overrides: ReplyOverrides) -> Result<ReplyResponse> {
        let adapter = self.adapter().ok_or_else(|| {
            let url = self.document.location();
            log::warn!("no adapter for {url}");
            ReplaisError::NoAdapter(url)
        })?;
        let request = self.build_request(adapter.as_ref(), &overrides).await?;
        log::debug!(
            "requesting reply for {} with {} messages",
            request.user_context.contact_key,
            request.context.messages.len()
        );

        let response = with_timeout(
            self.scheduler.as_ref(),
            self.config.reply_timeout_ms,
            self.generator.generate(&request),
        )
        .await?;

        if let Some(updated) = &response.updated_contact_config {
            if let Err(e) = settings::upsert_contact_config(self.settings.as_ref(), updated.clone()).await {
                log::warn!("could not save contact settings: {e}");
            }
        }

        if response.reply_text.trim().is_empty() {
            return Err(ReplaisError::EmptyReply);
        }

        if !ComposerIo::new(&self.document, Some(adapter.as_ref())).insert_text(&response.reply_text) {
            log::warn!("reply generated but no composer accepted it");
        }
        Ok(response)
    }

    /// `SUGGEST_REPLY` from the host: uses the shorter trigger context and
    /// only logs failures.
    pub async fn suggest_from_host(&self) {
        let overrides = ReplyOverrides {
            context_limit: Some(self.config.trigger_context_limit),
            ..ReplyOverrides::default()
        };
        if let Err(e) = self.suggest(overrides).await {
            log::error!("error getting reply: {e}");
        }
    }
}
