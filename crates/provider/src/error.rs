use slack_mcp_common::FromMessage;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
    #[error(transparent)]
    UrlParse(#[from] url::ParseError),
    #[error("slack api error on {method}: {code}")]
    Api { method: String, code: String },
    #[error("rate limited on {method}, gave up after {attempts} attempts")]
    RateLimited { method: String, attempts: u32 },
    #[error("{message}")]
    Message { message: String },
}

impl Error {
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }

    /// An `ok: false` envelope. Slack reports the reason as an error code
    /// string (`channel_not_found`, `invalid_auth`, ...).
    #[must_use]
    pub fn api(method: impl Into<String>, code: Option<String>) -> Self {
        Self::Api {
            method: method.into(),
            code: code.unwrap_or_else(|| "unknown_error".into()),
        }
    }
}

impl FromMessage for Error {
    fn from_message(message: String) -> Self {
        Self::Message { message }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

slack_mcp_common::impl_context!();
