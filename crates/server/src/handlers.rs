//! Conversation tool handlers: fetch through the provider, normalize, and
//! reply as JSON text content.

use std::sync::Arc;

use {
    async_trait::async_trait,
    serde::{Deserialize, de::DeserializeOwned},
};

use {
    slack_mcp_config::HistoryConfig,
    slack_mcp_conversations::{RawMessage, normalize},
    slack_mcp_provider::{ChannelsCache, SlackClient, UsersCache},
};

use crate::{
    error::{Error, Result},
    tools::{ToolHandler, ToolRouter},
    types::{ToolDef, ToolsCallResult},
};

/// Shared state handed to every tool handler.
///
/// The caches are immutable snapshots; handlers only read them.
pub struct ToolContext {
    pub client: SlackClient,
    pub users: UsersCache,
    pub channels: ChannelsCache,
    pub history: HistoryConfig,
}

/// Build the standard router with the three conversation tools.
#[must_use]
pub fn default_router(ctx: Arc<ToolContext>) -> ToolRouter {
    let mut router = ToolRouter::new();
    router.register(Arc::new(ConversationsHistory {
        ctx: Arc::clone(&ctx),
    }));
    router.register(Arc::new(ConversationsReplies {
        ctx: Arc::clone(&ctx),
    }));
    router.register(Arc::new(ChannelsList { ctx }));
    router
}

/// Message subtypes treated as channel activity noise.
const ACTIVITY_SUBTYPES: &[&str] = &[
    "channel_join",
    "channel_leave",
    "channel_topic",
    "channel_purpose",
    "channel_name",
];

fn without_activity(messages: Vec<RawMessage>, include_activity: bool) -> Vec<RawMessage> {
    if include_activity {
        return messages;
    }
    messages
        .into_iter()
        .filter(|m| {
            !m.subtype
                .as_deref()
                .is_some_and(|s| ACTIVITY_SUBTYPES.contains(&s))
        })
        .collect()
}

fn parse_args<T: DeserializeOwned>(arguments: serde_json::Value) -> Result<T> {
    serde_json::from_value(arguments).map_err(|e| Error::InvalidParams(e.to_string()))
}

fn clamp_limit(requested: Option<u32>, history: &HistoryConfig) -> u32 {
    requested
        .unwrap_or(history.default_limit)
        .clamp(1, history.max_limit)
}

fn reply(body: serde_json::Value) -> Result<ToolsCallResult> {
    Ok(ToolsCallResult::text(body.to_string()))
}

fn default_true() -> bool {
    true
}

// ── conversations_history ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct HistoryArgs {
    channel_id: String,
    #[serde(default)]
    limit: Option<u32>,
    #[serde(default)]
    cursor: Option<String>,
    #[serde(default)]
    include_activity_messages: bool,
    #[serde(default = "default_true")]
    resolve_users: bool,
}

struct ConversationsHistory {
    ctx: Arc<ToolContext>,
}

#[async_trait]
impl ToolHandler for ConversationsHistory {
    fn definition(&self) -> ToolDef {
        ToolDef {
            name: "conversations_history".into(),
            description: "Fetch messages from a channel or DM, with sender display names \
                          resolved and image attachments extracted."
                .into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "channel_id": {
                        "type": "string",
                        "description": "Channel id (C…/D…/G…) or #channel-name",
                    },
                    "limit": {"type": "integer", "description": "Messages per page"},
                    "cursor": {
                        "type": "string",
                        "description": "Pagination cursor from a previous call",
                    },
                    "include_activity_messages": {
                        "type": "boolean",
                        "description": "Keep join/leave/topic notices",
                        "default": false,
                    },
                    "resolve_users": {
                        "type": "boolean",
                        "description": "Resolve sender ids to display names",
                        "default": true,
                    },
                },
                "required": ["channel_id"],
            }),
        }
    }

    async fn call(&self, arguments: serde_json::Value) -> Result<ToolsCallResult> {
        let args: HistoryArgs = parse_args(arguments)?;
        let ctx = &self.ctx;

        let channel = ctx.channels.resolve(&args.channel_id).ok_or_else(|| {
            Error::invalid_params(format!("unknown channel: {}", args.channel_id))
        })?;
        let limit = clamp_limit(args.limit, &ctx.history);

        let page = ctx
            .client
            .conversations_history(&channel, limit, args.cursor.as_deref())
            .await?;
        let messages = without_activity(page.messages, args.include_activity_messages);
        let normalized = normalize(&messages, &channel, args.resolve_users, &ctx.users);

        reply(serde_json::json!({
            "messages": normalized,
            "nextCursor": page.next_cursor,
        }))
    }
}

// ── conversations_replies ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RepliesArgs {
    channel_id: String,
    thread_ts: String,
    #[serde(default)]
    limit: Option<u32>,
    #[serde(default)]
    cursor: Option<String>,
    #[serde(default)]
    include_activity_messages: bool,
    #[serde(default = "default_true")]
    resolve_users: bool,
}

struct ConversationsReplies {
    ctx: Arc<ToolContext>,
}

#[async_trait]
impl ToolHandler for ConversationsReplies {
    fn definition(&self) -> ToolDef {
        ToolDef {
            name: "conversations_replies".into(),
            description: "Fetch a thread by its parent timestamp, parent message first, with \
                          the same normalization as conversations_history."
                .into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "channel_id": {
                        "type": "string",
                        "description": "Channel id (C…/D…/G…) or #channel-name",
                    },
                    "thread_ts": {
                        "type": "string",
                        "description": "Timestamp of the thread's parent message",
                    },
                    "limit": {"type": "integer", "description": "Messages per page"},
                    "cursor": {
                        "type": "string",
                        "description": "Pagination cursor from a previous call",
                    },
                    "include_activity_messages": {
                        "type": "boolean",
                        "description": "Keep join/leave/topic notices",
                        "default": false,
                    },
                    "resolve_users": {
                        "type": "boolean",
                        "description": "Resolve sender ids to display names",
                        "default": true,
                    },
                },
                "required": ["channel_id", "thread_ts"],
            }),
        }
    }

    async fn call(&self, arguments: serde_json::Value) -> Result<ToolsCallResult> {
        let args: RepliesArgs = parse_args(arguments)?;
        let ctx = &self.ctx;

        let channel = ctx.channels.resolve(&args.channel_id).ok_or_else(|| {
            Error::invalid_params(format!("unknown channel: {}", args.channel_id))
        })?;
        let limit = clamp_limit(args.limit, &ctx.history);

        let page = ctx
            .client
            .conversations_replies(&channel, &args.thread_ts, limit, args.cursor.as_deref())
            .await?;
        let messages = without_activity(page.messages, args.include_activity_messages);
        let normalized = normalize(&messages, &channel, args.resolve_users, &ctx.users);

        reply(serde_json::json!({
            "messages": normalized,
            "nextCursor": page.next_cursor,
        }))
    }
}

// ── channels_list ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChannelsArgs {
    #[serde(default)]
    channel_types: Option<String>,
    #[serde(default)]
    limit: Option<usize>,
    #[serde(default)]
    cursor: Option<String>,
}

struct ChannelsList {
    ctx: Arc<ToolContext>,
}

#[async_trait]
impl ToolHandler for ChannelsList {
    fn definition(&self) -> ToolDef {
        ToolDef {
            name: "channels_list".into(),
            description: "List the cached conversation inventory: channels, groups, DMs."
                .into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "channel_types": {
                        "type": "string",
                        "description": "Comma-separated filter: public_channel, \
                                        private_channel, im, mpim",
                    },
                    "limit": {"type": "integer", "description": "Entries per page"},
                    "cursor": {
                        "type": "string",
                        "description": "Pagination cursor from a previous call",
                    },
                },
            }),
        }
    }

    async fn call(&self, arguments: serde_json::Value) -> Result<ToolsCallResult> {
        let args: ChannelsArgs = parse_args(arguments)?;

        let offset = match args.cursor.as_deref().filter(|c| !c.is_empty()) {
            Some(cursor) => cursor
                .parse::<usize>()
                .map_err(|_| Error::invalid_params(format!("bad cursor: {cursor}")))?,
            None => 0,
        };
        let limit = args.limit.unwrap_or(100).clamp(1, 1000);

        let (channels, next_offset) =
            self.ctx
                .channels
                .list(args.channel_types.as_deref(), limit, offset);

        reply(serde_json::json!({
            "channels": channels,
            "nextCursor": next_offset.map(|n| n.to_string()).unwrap_or_default(),
        }))
    }
}
