//! HTTP reply backend

use super::ReplyGenerator;
use crate::error::{ReplaisError, Result};
use crate::models::{ReplyRequest, ReplyResponse};
use async_trait::async_trait;
use reqwest::Client;

const SUGGEST_PATH: &str = "/v1/suggest";

/// Posts requests as JSON to `{base_url}/v1/suggest`.
#[derive(Debug, Clone)]
pub struct HttpReplyGenerator {
    client: Client,
    endpoint: String,
}

impl HttpReplyGenerator {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: suggest_endpoint(base_url),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn suggest_endpoint(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), SUGGEST_PATH)
}

#[async_trait(?Send)]
impl ReplyGenerator for HttpReplyGenerator {
    async fn generate(&self, request: &ReplyRequest) -> Result<ReplyResponse> {
        log::debug!("requesting reply from {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| ReplaisError::Backend(format!("request failed: {e}")))?
            .error_for_status()
            .map_err(|e| ReplaisError::Backend(e.to_string()))?;

        response
            .json::<ReplyResponse>()
            .await
            .map_err(|e| ReplaisError::Backend(format!("invalid reply payload: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("https://api.replais.in" ; "bare host")]
    #[test_case("https://api.replais.in/" ; "trailing slash")]
    #[test_case("https://api.replais.in//" ; "repeated slashes")]
    fn test_endpoint_joins_suggest_path(base: &str) {
        assert_eq!(suggest_endpoint(base), "https://api.replais.in/v1/suggest");
    }
}
