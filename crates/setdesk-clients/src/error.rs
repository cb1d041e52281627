use setdesk_core::collab::CollabError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0} token is not configured")]
    MissingToken(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned {status}: {message}")]
    Api {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("Slack error: {0}")]
    Slack(String),
}

impl From<ClientError> for CollabError {
    fn from(e: ClientError) -> Self {
        CollabError(e.to_string())
    }
}
