//! Outbound SBI client
//!
//! JSON-over-HTTP POST shared by both network functions. Every failure,
//! including an unreadable response body, becomes
//! [`QofError::RemoteProvisioning`] naming the target URI.

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Serialize;

use crate::config::HttpClientConfig;
use crate::error::{QofError, QofResult};
use crate::logging::{log_sbi_message, Direction};

/// reqwest client carrying the configured timeouts.
#[derive(Debug, Clone)]
pub struct SbiClient {
    client: Client,
}

impl SbiClient {
    /// Builds a client enforcing `cfg`'s request and connect timeouts.
    pub fn new(cfg: &HttpClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(cfg.timeout())
            .connect_timeout(cfg.connect_timeout())
            .build()?;
        Ok(Self { client })
    }

    /// Posts `body` to `target` and returns the response text on a 2xx.
    ///
    /// `peer` and `path` only label the SBI log lines.
    pub async fn post_json<T: Serialize + Sync>(
        &self,
        target: &str,
        peer: &str,
        path: &str,
        body: &T,
    ) -> QofResult<String> {
        let remote_err = |reason: String| QofError::RemoteProvisioning {
            target: target.to_string(),
            reason,
        };

        let payload = serde_json::to_string(body)
            .map_err(|e| remote_err(format!("cannot encode request: {e}")))?;
        log_sbi_message(Direction::Tx, peer, path, &payload);

        let response = self
            .client
            .post(target)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|e| remote_err(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| remote_err(format!("cannot read response: {e}")))?;
        log_sbi_message(Direction::Rx, peer, path, &text);

        if !status.is_success() {
            return Err(remote_err(format!("status {status}: {text}")));
        }
        Ok(text)
    }
}
