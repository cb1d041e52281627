//! Okta management API client.
//!
//! Authenticates with an `SSWS` API token. Non-2xx responses are turned
//! into [`ClientError::Api`] carrying Okta's `errorSummary`.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use serde_json::json;

use setdesk_core::collab::{CallResult, IdentityProvider};
use setdesk_core::config::OktaConfig;

use crate::error::ClientError;

const SERVICE: &str = "Okta";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OktaErrorBody {
    #[serde(default)]
    error_code: Option<String>,
    error_summary: String,
}

pub struct OktaClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl OktaClient {
    pub fn new(config: &OktaConfig) -> Result<Self, ClientError> {
        let timeout = (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs));
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        })
    }

    /// `PUT /api/v1/groups/{group}/users/{user}`
    pub fn add_user_to_group(&self, group_id: &str, user_id: &str) -> Result<(), ClientError> {
        let url = format!("{}/api/v1/groups/{group_id}/users/{user_id}", self.base_url);
        self.send(self.http.put(url))
    }

    /// Admin password set, without requiring the old password.
    pub fn set_password(&self, user_id: &str, new_password: &str) -> Result<(), ClientError> {
        let url = format!("{}/api/v1/users/{user_id}", self.base_url);
        let body = json!({ "credentials": { "password": { "value": new_password } } });
        self.send(self.http.post(url).json(&body))
    }

    /// Activate a staged or deprovisioned user without sending the
    /// activation email.
    pub fn activate_user(&self, user_id: &str) -> Result<(), ClientError> {
        let url = format!(
            "{}/api/v1/users/{user_id}/lifecycle/activate",
            self.base_url
        );
        self.send(self.http.post(url).query(&[("sendEmail", "false")]))
    }

    fn send(&self, request: RequestBuilder) -> Result<(), ClientError> {
        let token = self
            .token
            .as_deref()
            .ok_or(ClientError::MissingToken(SERVICE))?;
        let resp = request
            .header(AUTHORIZATION, format!("SSWS {token}"))
            .header(ACCEPT, "application/json")
            .send()?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let message = match resp.json::<OktaErrorBody>() {
            Ok(body) => match body.error_code {
                Some(code) => format!("{} ({code})", body.error_summary),
                None => body.error_summary,
            },
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
        };
        tracing::debug!(status = status.as_u16(), %message, "okta request failed");
        Err(ClientError::Api {
            service: SERVICE,
            status: status.as_u16(),
            message,
        })
    }
}

impl IdentityProvider for OktaClient {
    fn add_to_group(&self, group_id: &str, user_id: &str) -> CallResult {
        Ok(self.add_user_to_group(group_id, user_id)?)
    }

    fn reset_password(&self, user_id: &str, new_password: &str) -> CallResult {
        Ok(self.set_password(user_id, new_password)?)
    }

    fn activate(&self, user_id: &str) -> CallResult {
        Ok(self.activate_user(user_id)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
