//! Direct-message content sent by the notice kinds.
//!
//! A [`Notice`] is Slack block-kit JSON plus the plain fallback text shown
//! in notifications.

use serde::Serialize;
use serde_json::{json, Value};

/// `action_id` of the pickup date picker.
pub const PICKUP_DATE_ACTION: &str = "pickup_date_select";
/// `action_id` of the pickup confirmation button.
pub const PICKUP_CONFIRM_ACTION: &str = "pickup_confirm";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub text: String,
    pub blocks: Value,
}

impl Notice {
    /// Tells the user their password is being reset and what it becomes.
    pub fn password_notice(user_name: &str, password: &str) -> Self {
        Self {
            text: "Okta password reset".to_string(),
            blocks: json!([
                header("🔐 Okta password reset"),
                section(&format!(
                    "Hi {user_name} :wave:\nYour *Okta password is being reset* so we can set up your device. \
                     Use the password below for your first sign-in."
                )),
                section(&format!("`{password}`")),
                context("⚠️ Please *do not change this password* until you have picked up your device."),
                context("Questions? Contact your *IT Manager*."),
            ]),
        }
    }

    pub fn pickup_notice() -> Self {
        Self {
            text: "Your device is ready".to_string(),
            blocks: json!([
                header("💻 Your device is ready"),
                section(
                    "Your new device has been set up and is ready for pickup. \
                     Please pick a date and time that works for you in the next message."
                ),
                context("Bring your employee ID card when you come by."),
            ]),
        }
    }

    /// Interactive follow-up to [`Notice::pickup_notice`].
    pub fn pickup_button() -> Self {
        Self {
            text: "Choose a pickup date and time".to_string(),
            blocks: json!([
                section("*When would you like to pick up your device?*"),
                {
                    "type": "actions",
                    "block_id": "pickup_schedule",
                    "elements": [
                        {
                            "type": "datepicker",
                            "action_id": PICKUP_DATE_ACTION,
                            "placeholder": { "type": "plain_text", "text": "Select a date", "emoji": true }
                        },
                        {
                            "type": "button",
                            "action_id": PICKUP_CONFIRM_ACTION,
                            "style": "primary",
                            "text": { "type": "plain_text", "text": "Confirm", "emoji": true },
                            "value": "confirm"
                        }
                    ]
                }
            ]),
        }
    }
}

// ---------------------------------------------------------------------------
// Block helpers
// ---------------------------------------------------------------------------

fn header(text: &str) -> Value {
    json!({
        "type": "header",
        "text": { "type": "plain_text", "text": text, "emoji": true }
    })
}

fn section(text: &str) -> Value {
    json!({
        "type": "section",
        "text": { "type": "mrkdwn", "text": text }
    })
}

fn context(text: &str) -> Value {
    json!({
        "type": "context",
        "elements": [{ "type": "mrkdwn", "text": text }]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_notice_carries_name_and_password() {
        let n = Notice::password_notice("Kim", "ABCDE-12345-XYZ12");
        let body = n.blocks.to_string();
        assert!(body.contains("Hi Kim"));
        assert!(body.contains("ABCDE-12345-XYZ12"));
        assert_eq!(n.blocks[0]["type"], "header");
    }

    #[test]
    fn pickup_button_exposes_action_ids() {
        let n = Notice::pickup_button();
        let elements = &n.blocks[1]["elements"];
        assert_eq!(elements[0]["action_id"], PICKUP_DATE_ACTION);
        assert_eq!(elements[1]["action_id"], PICKUP_CONFIRM_ACTION);
    }
}
