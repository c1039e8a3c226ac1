//! Reply-generation collaborator
//!
//! [`ReplyGenerator`] turns a [`ReplyRequest`] into a reply. The backend is
//! pluggable: [`MockReplyGenerator`] answers locally, `HttpReplyGenerator`
//! (feature `http`) posts to a ReplAIs backend.

#[cfg(feature = "http")]
pub mod http;

use crate::config::ReplaisConfig;
use crate::error::{ReplaisError, Result};
use crate::models::{ContactConfig, ReplyRequest, ReplyResponse};
use crate::timers::Scheduler;
use async_trait::async_trait;
use futures::future::{self, Either};
use std::future::Future;
use std::rc::Rc;

#[cfg(feature = "http")]
pub use http::HttpReplyGenerator;

pub const MOCK_REPLY_TEXT: &str = "Hello from ReplAIs 👋 (real AI coming soon)";

#[async_trait(?Send)]
pub trait ReplyGenerator {
    async fn generate(&self, request: &ReplyRequest) -> Result<ReplyResponse>;
}

/// Local stand-in for the backend. Echoes the request's persona, tone and
/// contact instructions back as the updated contact config.
#[derive(Debug, Clone)]
pub struct MockReplyGenerator {
    reply_text: String,
}

impl MockReplyGenerator {
    pub fn new() -> Self {
        Self::with_reply(MOCK_REPLY_TEXT)
    }

    pub fn with_reply(reply_text: impl Into<String>) -> Self {
        Self {
            reply_text: reply_text.into(),
        }
    }
}

impl Default for MockReplyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl ReplyGenerator for MockReplyGenerator {
    async fn generate(&self, request: &ReplyRequest) -> Result<ReplyResponse> {
        let user = &request.user_context;
        let display_name = if user.conversation_title.is_empty() {
            "Unknown"
        } else {
            user.conversation_title.as_str()
        };

        let mut updated = ContactConfig::new(user.contact_key.as_str(), user.platform, display_name);
        updated.persona_id = user.persona_id.clone();
        updated.tone = user.tone.clone();
        updated.instructions = Some(user.contact_instructions.clone());

        Ok(ReplyResponse {
            reply_text: self.reply_text.clone(),
            updated_contact_config: Some(updated),
        })
    }
}

/// Backend selected by the config: HTTP when `backend_url` is set, the mock
/// otherwise.
#[cfg(feature = "http")]
pub fn reply_generator(config: &ReplaisConfig) -> Rc<dyn ReplyGenerator> {
    match config.backend_url.as_deref().filter(|url| !url.trim().is_empty()) {
        Some(url) => {
            log::info!("using reply backend at {url}");
            Rc::new(HttpReplyGenerator::new(url))
        }
        None => Rc::new(MockReplyGenerator::new()),
    }
}

#[cfg(not(feature = "http"))]
pub fn reply_generator(config: &ReplaisConfig) -> Rc<dyn ReplyGenerator> {
    if config.backend_url.is_some() {
        log::warn!("backendUrl is set but HTTP support is not compiled in, using mock replies");
    }
    Rc::new(MockReplyGenerator::new())
}

/// Race `generation` against `timeout_ms` on `scheduler`. A zero timeout
/// waits indefinitely.
pub async fn with_timeout<F>(scheduler: &dyn Scheduler, timeout_ms: u32, generation: F) -> Result<ReplyResponse>
where
    F: Future<Output = Result<ReplyResponse>>,
{
    if timeout_ms == 0 {
        return generation.await;
    }

    match future::select(Box::pin(generation), scheduler.sleep(timeout_ms)).await {
        Either::Left((response, _)) => response,
        Either::Right(((), _)) => {
            log::warn!("reply generation timed out after {timeout_ms}ms");
            Err(ReplaisError::Timeout(timeout_ms))
        }
    }
}
