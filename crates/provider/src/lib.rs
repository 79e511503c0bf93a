//! Slack Web API access: credentials, a typed client with pagination and
//! rate-limit backoff, and the local users/channels snapshots.

pub mod auth;
pub mod channels;
pub mod client;
pub mod error;
pub mod users;
pub mod wire;

pub use auth::SlackAuth;
pub use channels::{ChannelInfo, ChannelsCache};
pub use client::SlackClient;
pub use error::{Error, Result};
pub use users::UsersCache;
pub use wire::{ChannelsPage, HistoryPage, SlackChannel, SlackUser};
