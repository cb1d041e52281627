//! Slack Web API client for direct messages.
//!
//! `chat.postMessage` with a user id as the channel opens (or reuses) the
//! bot's DM with that user. Slack reports most failures as HTTP 200 with
//! `{"ok": false, "error": "..."}`.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use setdesk_core::collab::{CallResult, Messenger};
use setdesk_core::config::SlackConfig;
use setdesk_core::notice::Notice;

use crate::error::ClientError;

const SERVICE: &str = "Slack";

#[derive(Serialize)]
struct PostMessage<'a> {
    channel: &'a str,
    text: &'a str,
    blocks: &'a serde_json::Value,
}

#[derive(Deserialize)]
struct SlackResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

pub struct SlackClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl SlackClient {
    pub fn new(config: &SlackConfig) -> Result<Self, ClientError> {
        let timeout = (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs));
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.bot_token.clone(),
        })
    }

    pub fn post_message(&self, channel: &str, notice: &Notice) -> Result<(), ClientError> {
        let token = self
            .token
            .as_deref()
            .ok_or(ClientError::MissingToken(SERVICE))?;
        let resp = self
            .http
            .post(format!("{}/chat.postMessage", self.base_url))
            .bearer_auth(token)
            .json(&PostMessage {
                channel,
                text: &notice.text,
                blocks: &notice.blocks,
            })
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Api {
                service: SERVICE,
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("unknown error").to_string(),
            });
        }
        let body: SlackResponse = resp.json()?;
        if body.ok {
            Ok(())
        } else {
            Err(ClientError::Slack(
                body.error.unwrap_or_else(|| "unknown_error".to_string()),
            ))
        }
    }
}

impl Messenger for SlackClient {
    fn send_direct_message(&self, handle: &str, notice: &Notice) -> CallResult {
        Ok(self.post_message(handle, notice)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn client(url: &str) -> SlackClient {
        SlackClient::new(&SlackConfig {
            base_url: url.to_string(),
            bot_token: Some("xoxb-test".into()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn posts_notice_to_user_channel() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/chat.postMessage")
            .match_header("authorization", "Bearer xoxb-test")
            .match_body(Matcher::PartialJson(json!({
                "channel": "U-kim",
                "text": "Your device is ready"
            })))
            .with_status(200)
            .with_body(r#"{"ok":true,"channel":"D123","ts":"1.2"}"#)
            .create();

        client(&server.url())
            .send_direct_message("U-kim", &Notice::pickup_notice())
            .unwrap();
        mock.assert();
    }

    #[test]
    fn ok_false_is_an_error() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/chat.postMessage")
            .with_status(200)
            .with_body(r#"{"ok":false,"error":"channel_not_found"}"#)
            .create();

        let err = client(&server.url())
            .send_direct_message("U-ghost", &Notice::pickup_button())
            .unwrap_err();
        assert_eq!(err.0, "Slack error: channel_not_found");
    }

    #[test]
    fn http_failure_is_an_error() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/chat.postMessage")
            .with_status(500)
            .create();

        let err = client(&server.url())
            .send_direct_message("U-kim", &Notice::pickup_notice())
            .unwrap_err();
        assert!(err.0.contains("500"), "{err}");
    }
}
