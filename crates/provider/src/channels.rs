//! Channel inventory snapshot with `#name` resolution.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use {
    serde::Serialize,
    tracing::{debug, info, warn},
};

use crate::{client::SlackClient, error::Result, wire::SlackChannel};

/// Conversation kinds crawled into the inventory.
const INVENTORY_TYPES: &str = "public_channel,private_channel,im,mpim";

/// One inventory entry as surfaced to tool callers.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelInfo {
    pub id: String,
    pub name: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub topic: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub purpose: String,
    pub member_count: u32,
}

/// Immutable snapshot of the conversation inventory.
#[derive(Debug, Default)]
pub struct ChannelsCache {
    channels: Vec<SlackChannel>,
    ids_by_name: HashMap<String, String>,
    path: Option<PathBuf>,
}

impl ChannelsCache {
    #[must_use]
    pub fn from_channels(channels: Vec<SlackChannel>) -> Self {
        let mut ids_by_name = HashMap::new();
        for channel in &channels {
            if !channel.name.is_empty() {
                ids_by_name.insert(channel.name.clone(), channel.id.clone());
            }
        }
        Self {
            channels,
            ids_by_name,
            path: None,
        }
    }

    /// Load from the snapshot file, or `None` if it doesn't exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(path)?;
        let channels: Vec<SlackChannel> = serde_json::from_str(&data)?;
        let mut cache = Self::from_channels(channels);
        cache.path = Some(path.to_path_buf());
        debug!(path = %path.display(), count = cache.channels.len(), "loaded channels snapshot");
        Ok(Some(cache))
    }

    /// Crawl the inventory and persist a fresh snapshot.
    pub async fn refresh(client: &SlackClient, path: &Path) -> Result<Self> {
        let channels = client.list_all_channels(INVENTORY_TYPES).await?;
        let mut cache = Self::from_channels(channels);
        cache.persist_to(path)?;
        info!(path = %path.display(), count = cache.channels.len(), "refreshed channels snapshot");
        Ok(cache)
    }

    /// Use the on-disk snapshot when present, otherwise crawl and persist
    /// one. An unreadable snapshot falls back to a crawl.
    pub async fn warm(client: &SlackClient, path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(Some(cache)) => Ok(cache),
            Ok(None) => Self::refresh(client, path).await,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "channels snapshot unreadable, recrawling");
                Self::refresh(client, path).await
            },
        }
    }

    /// Attach a snapshot path and write the current contents to it.
    pub fn persist_to(&mut self, path: &Path) -> Result<()> {
        self.path = Some(path.to_path_buf());
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(&self.channels)?)?;
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Resolve a tool-supplied channel spec to an id: `#name` through the
    /// inventory, anything else passed through verbatim.
    #[must_use]
    pub fn resolve(&self, spec: &str) -> Option<String> {
        match spec.strip_prefix('#') {
            Some(name) => self.ids_by_name.get(name).cloned(),
            None => Some(spec.to_string()),
        }
    }

    /// Page through the inventory, optionally filtered to a comma-separated
    /// set of kinds. Returns the page plus the offset of the next one, if
    /// any.
    #[must_use]
    pub fn list(
        &self,
        kinds: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> (Vec<ChannelInfo>, Option<usize>) {
        let wanted: Option<Vec<&str>> = kinds.map(|k| {
            k.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect()
        });

        let filtered: Vec<&SlackChannel> = self
            .channels
            .iter()
            .filter(|c| wanted.as_ref().is_none_or(|w| w.contains(&c.kind())))
            .collect();

        let page: Vec<ChannelInfo> = filtered
            .iter()
            .skip(offset)
            .take(limit)
            .map(|c| ChannelInfo {
                id: c.id.clone(),
                name: c.name.clone(),
                kind: c.kind(),
                topic: c.topic.value.clone(),
                purpose: c.purpose.value.clone(),
                member_count: c.num_members,
            })
            .collect();

        let consumed = offset + page.len();
        let next_offset = (consumed < filtered.len()).then_some(consumed);
        (page, next_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(id: &str, name: &str) -> SlackChannel {
        SlackChannel {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    fn inventory() -> ChannelsCache {
        let mut dm = SlackChannel {
            id: "D1".into(),
            ..Default::default()
        };
        dm.is_im = true;
        ChannelsCache::from_channels(vec![
            channel("C1", "general"),
            channel("C2", "random"),
            dm,
        ])
    }

    #[test]
    fn hash_names_resolve_through_inventory() {
        let cache = inventory();
        assert_eq!(cache.resolve("#general").as_deref(), Some("C1"));
        assert!(cache.resolve("#nonexistent").is_none());
    }

    #[test]
    fn raw_ids_pass_through() {
        let cache = inventory();
        assert_eq!(cache.resolve("C999").as_deref(), Some("C999"));
        assert_eq!(cache.resolve("D1").as_deref(), Some("D1"));
    }

    #[test]
    fn kind_filter_limits_listing() {
        let cache = inventory();
        let (page, next) = cache.list(Some("im"), 10, 0);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, "D1");
        assert!(next.is_none());
    }

    #[test]
    fn paging_reports_next_offset() {
        let cache = inventory();
        let (page, next) = cache.list(None, 2, 0);
        assert_eq!(page.len(), 2);
        assert_eq!(next, Some(2));

        let (rest, done) = cache.list(None, 2, 2);
        assert_eq!(rest.len(), 1);
        assert!(done.is_none());
    }

    #[test]
    fn snapshot_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("channels.json");

        let mut cache = inventory();
        cache.persist_to(&path).unwrap();

        let loaded = ChannelsCache::load(&path).unwrap().unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.resolve("#random").as_deref(), Some("C2"));
    }
}
