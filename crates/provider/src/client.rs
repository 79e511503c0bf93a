//! Typed Slack Web API client: GET wrappers, cursor pagination, and bounded
//! rate-limit backoff.

use std::time::Duration;

use {
    reqwest::StatusCode,
    serde::de::DeserializeOwned,
    tracing::{debug, warn},
    url::Url,
};

use crate::{
    auth::SlackAuth,
    error::{Error, Result},
    wire::{
        ChannelsListResponse, ChannelsPage, HistoryPage, HistoryResponse, SlackChannel, SlackUser,
        UsersListResponse,
    },
};

const DEFAULT_BASE_URL: &str = "https://slack.com/api/";

/// Attempts per request before giving up on a rate-limited endpoint.
const MAX_RATE_LIMIT_ATTEMPTS: u32 = 3;

/// Page size used when crawling the full user/channel listings.
const CRAWL_PAGE_SIZE: u32 = 200;

pub struct SlackClient {
    http: reqwest::Client,
    base_url: Url,
    auth: SlackAuth,
}

impl SlackClient {
    pub fn new(auth: SlackAuth) -> Result<Self> {
        Self::with_base_url(auth, DEFAULT_BASE_URL)
    }

    /// Point the client at a different API root. Tests use this to talk to a
    /// local mock server.
    pub fn with_base_url(auth: SlackAuth, base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("slack-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Self {
            http,
            base_url: Url::parse(&base)?,
            auth,
        })
    }

    /// Fetch one page of channel history, newest first, as the API returns it.
    pub async fn conversations_history(
        &self,
        channel: &str,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<HistoryPage> {
        let mut params = vec![
            ("channel", channel.to_string()),
            ("limit", limit.to_string()),
        ];
        push_cursor(&mut params, cursor);

        let resp: HistoryResponse = self.get_json("conversations.history", &params).await?;
        if !resp.ok {
            return Err(Error::api("conversations.history", resp.error));
        }
        Ok(HistoryPage {
            messages: resp.messages,
            next_cursor: next_cursor(resp.response_metadata),
        })
    }

    /// Fetch one page of a thread. The parent message leads the page on the
    /// first cursor, exactly as the API returns it.
    pub async fn conversations_replies(
        &self,
        channel: &str,
        thread_ts: &str,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<HistoryPage> {
        let mut params = vec![
            ("channel", channel.to_string()),
            ("ts", thread_ts.to_string()),
            ("limit", limit.to_string()),
        ];
        push_cursor(&mut params, cursor);

        let resp: HistoryResponse = self.get_json("conversations.replies", &params).await?;
        if !resp.ok {
            return Err(Error::api("conversations.replies", resp.error));
        }
        Ok(HistoryPage {
            messages: resp.messages,
            next_cursor: next_cursor(resp.response_metadata),
        })
    }

    /// Fetch one page of the conversation inventory.
    pub async fn conversations_list(
        &self,
        types: &str,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<ChannelsPage> {
        let mut params = vec![("types", types.to_string()), ("limit", limit.to_string())];
        push_cursor(&mut params, cursor);

        let resp: ChannelsListResponse = self.get_json("conversations.list", &params).await?;
        if !resp.ok {
            return Err(Error::api("conversations.list", resp.error));
        }
        Ok(ChannelsPage {
            channels: resp.channels,
            next_cursor: next_cursor(resp.response_metadata),
        })
    }

    /// Fetch one page of the workspace member list.
    pub async fn users_list(&self, limit: u32, cursor: Option<&str>) -> Result<(Vec<SlackUser>, String)> {
        let mut params = vec![("limit", limit.to_string())];
        push_cursor(&mut params, cursor);

        let resp: UsersListResponse = self.get_json("users.list", &params).await?;
        if !resp.ok {
            return Err(Error::api("users.list", resp.error));
        }
        Ok((resp.members, next_cursor(resp.response_metadata)))
    }

    /// Crawl the entire member list across pages.
    pub async fn list_all_users(&self) -> Result<Vec<SlackUser>> {
        let mut users = Vec::new();
        let mut cursor = String::new();
        loop {
            let (page, next) = self
                .users_list(CRAWL_PAGE_SIZE, non_empty(&cursor))
                .await?;
            users.extend(page);
            if next.is_empty() {
                break;
            }
            cursor = next;
        }
        debug!(count = users.len(), "crawled workspace member list");
        Ok(users)
    }

    /// Crawl the entire conversation inventory across pages.
    pub async fn list_all_channels(&self, types: &str) -> Result<Vec<SlackChannel>> {
        let mut channels = Vec::new();
        let mut cursor = String::new();
        loop {
            let page = self
                .conversations_list(types, CRAWL_PAGE_SIZE, non_empty(&cursor))
                .await?;
            channels.extend(page.channels);
            if page.next_cursor.is_empty() {
                break;
            }
            cursor = page.next_cursor;
        }
        debug!(count = channels.len(), "crawled conversation inventory");
        Ok(channels)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = self.base_url.join(method)?;
        let mut attempt = 0;
        loop {
            let req = self.auth.apply(self.http.get(url.clone()).query(params));
            let resp = req.send().await?;

            if resp.status() == StatusCode::TOO_MANY_REQUESTS {
                attempt += 1;
                if attempt >= MAX_RATE_LIMIT_ATTEMPTS {
                    return Err(Error::RateLimited {
                        method: method.into(),
                        attempts: attempt,
                    });
                }
                let wait = retry_after_seconds(&resp).unwrap_or(1);
                warn!(method, wait, attempt, "rate limited, backing off");
                tokio::time::sleep(Duration::from_secs(wait)).await;
                continue;
            }

            let resp = resp.error_for_status()?;
            return Ok(resp.json::<T>().await?);
        }
    }
}

fn push_cursor(params: &mut Vec<(&str, String)>, cursor: Option<&str>) {
    if let Some(cursor) = cursor
        && !cursor.is_empty()
    {
        params.push(("cursor", cursor.to_string()));
    }
}

fn next_cursor(metadata: Option<crate::wire::ResponseMetadata>) -> String {
    metadata.map(|m| m.next_cursor).unwrap_or_default()
}

fn non_empty(cursor: &str) -> Option<&str> {
    if cursor.is_empty() { None } else { Some(cursor) }
}

fn retry_after_seconds(resp: &reqwest::Response) -> Option<u64> {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}
