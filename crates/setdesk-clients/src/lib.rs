//! `setdesk-clients`: HTTP clients behind the executor's collaborator
//! traits.
//!
//! [`OktaClient`] implements [`IdentityProvider`] against the Okta
//! management API and [`SlackClient`] implements [`Messenger`] against the
//! Slack Web API. Both use `reqwest`'s blocking client with a per-request
//! timeout; they must not be created or dropped on an async runtime thread.
//!
//! [`IdentityProvider`]: setdesk_core::collab::IdentityProvider
//! [`Messenger`]: setdesk_core::collab::Messenger

pub mod error;
pub mod okta;
pub mod slack;

pub use error::ClientError;
pub use okta::OktaClient;
pub use slack::SlackClient;
