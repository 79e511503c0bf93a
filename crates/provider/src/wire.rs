//! Typed Slack Web API payloads.
//!
//! Every endpoint answers with the standard envelope: `ok`, an optional
//! `error` code, the payload, and `response_metadata.next_cursor` for
//! pagination. Only the fields this server consumes are modeled.

use serde::{Deserialize, Serialize};

use slack_mcp_conversations::RawMessage;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMetadata {
    #[serde(default)]
    pub next_cursor: String,
}

/// Envelope for `conversations.history` and `conversations.replies`.
#[derive(Debug, Deserialize)]
pub struct HistoryResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub messages: Vec<RawMessage>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

/// One fetched page of history, cursor included.
#[derive(Debug, Default)]
pub struct HistoryPage {
    pub messages: Vec<RawMessage>,
    /// Empty when the channel has no further pages.
    pub next_cursor: String,
}

/// Envelope for `users.list`.
#[derive(Debug, Deserialize)]
pub struct UsersListResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub members: Vec<SlackUser>,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

/// A workspace member as returned by `users.list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlackUser {
    #[serde(default)]
    pub id: String,
    /// Login handle.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub profile: UserProfile,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub real_name: String,
}

impl SlackUser {
    /// Preferred display name: profile display name, then real name, then
    /// the login handle.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if !self.profile.display_name.is_empty() {
            &self.profile.display_name
        } else if !self.profile.real_name.is_empty() {
            &self.profile.real_name
        } else {
            &self.name
        }
    }
}

/// Envelope for `conversations.list`.
#[derive(Debug, Deserialize)]
pub struct ChannelsListResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub channels: Vec<SlackChannel>,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

/// One fetched page of channels, cursor included.
#[derive(Debug, Default)]
pub struct ChannelsPage {
    pub channels: Vec<SlackChannel>,
    pub next_cursor: String,
}

/// A conversation as returned by `conversations.list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlackChannel {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_im: bool,
    #[serde(default)]
    pub is_mpim: bool,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub topic: ChannelTopic,
    #[serde(default)]
    pub purpose: ChannelTopic,
    #[serde(default)]
    pub num_members: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelTopic {
    #[serde(default)]
    pub value: String,
}

impl SlackChannel {
    /// Conversation kind as used in `conversations.list` type filters.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        if self.is_im {
            "im"
        } else if self.is_mpim {
            "mpim"
        } else if self.is_private {
            "private_channel"
        } else {
            "public_channel"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_envelope_parses() {
        let json = r#"{
            "ok": true,
            "messages": [
                {"type": "message", "ts": "1700000001.000100", "user": "U1", "text": "hi"},
                {"type": "message", "ts": "1700000002.000200", "user": "U2", "text": "hello"}
            ],
            "has_more": true,
            "response_metadata": {"next_cursor": "bmV4dDox"}
        }"#;
        let resp: HistoryResponse = serde_json::from_str(json).unwrap();
        assert!(resp.ok);
        assert_eq!(resp.messages.len(), 2);
        assert!(resp.has_more);
        assert_eq!(resp.response_metadata.unwrap().next_cursor, "bmV4dDox");
    }

    #[test]
    fn error_envelope_parses() {
        let resp: HistoryResponse =
            serde_json::from_str(r#"{"ok": false, "error": "channel_not_found"}"#).unwrap();
        assert!(!resp.ok);
        assert_eq!(resp.error.as_deref(), Some("channel_not_found"));
        assert!(resp.messages.is_empty());
    }

    #[test]
    fn display_name_preference_chain() {
        let mut user = SlackUser {
            id: "U1".into(),
            name: "jdoe".into(),
            ..Default::default()
        };
        assert_eq!(user.display_name(), "jdoe");

        user.profile.real_name = "Jane Doe".into();
        assert_eq!(user.display_name(), "Jane Doe");

        user.profile.display_name = "jane".into();
        assert_eq!(user.display_name(), "jane");
    }

    #[test]
    fn channel_kind_mapping() {
        let mut ch = SlackChannel {
            id: "C1".into(),
            name: "general".into(),
            ..Default::default()
        };
        assert_eq!(ch.kind(), "public_channel");

        ch.is_private = true;
        assert_eq!(ch.kind(), "private_channel");

        ch.is_mpim = true;
        assert_eq!(ch.kind(), "mpim");

        ch.is_im = true;
        assert_eq!(ch.kind(), "im");
    }
}
