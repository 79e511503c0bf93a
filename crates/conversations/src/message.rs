//! Wire-level history records and the normalized message shape.

use serde::{Deserialize, Serialize};

/// A raw message as returned by the provider's history API.
///
/// Only the fields the pipeline consumes are modeled; unknown payload fields
/// are ignored on deserialization. Every field tolerates absence so partial
/// records (system notices, bot posts) still parse.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMessage {
    /// Provider-assigned timestamp. Lexically sortable within a channel, and
    /// doubles as the message's durable identifier.
    #[serde(default)]
    pub ts: String,
    /// Sender id. Empty for system messages and some bot posts.
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub text: String,
    /// Message subtype (`channel_join`, `bot_message`, ...). Normalization
    /// ignores it; callers may filter on it before normalizing.
    #[serde(default)]
    pub subtype: Option<String>,
    /// Parent thread timestamp for threaded replies. Ignored by normalization.
    #[serde(default)]
    pub thread_ts: Option<String>,
    #[serde(default)]
    pub files: Vec<File>,
}

/// A file attached to a raw message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct File {
    /// Stable id, unique within the parent message.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub mimetype: String,
    #[serde(default)]
    pub url_private: String,
    /// Preferred over `url_private` when present.
    #[serde(default)]
    pub url_private_download: String,
}

/// A display-ready message produced by [`crate::normalize`].
///
/// Constructed fresh per invocation and owned by the caller afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedMessage {
    /// Copied verbatim from the raw message's timestamp.
    pub message_id: String,
    /// Copied from the caller-supplied channel id, not derived from the message.
    pub channel_id: String,
    /// Copied verbatim from the raw message's sender id.
    pub user_id: String,
    /// Resolved display name. Empty when resolution was not requested or the
    /// directory missed; consumers treat empty and absent as equivalent.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_name: String,
    pub text: String,
    /// JSON-encoded array of [`ImageRef`] entries, or `None` when the message
    /// carries no image attachments. Consumers treat `None` and an empty
    /// list as equivalent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<String>,
}

/// One extracted image attachment.
///
/// The serialized shape is a boundary contract: exactly the keys `id`,
/// `title`, `url`, all string-valued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub id: String,
    pub title: String,
    pub url: String,
}
