//! Users directory snapshot: id ↔ display-name maps with disk persistence.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

use slack_mcp_conversations::UserDirectory;

use crate::{client::SlackClient, error::Result, wire::SlackUser};

/// Immutable snapshot of the workspace member directory.
///
/// Built once from `users.list` (or reloaded from the snapshot file) and then
/// only read. A refresh builds a replacement snapshot instead of mutating a
/// live one, so normalization can hold a reference for the duration of a
/// call without locking.
#[derive(Debug, Default)]
pub struct UsersCache {
    users: Vec<SlackUser>,
    names_by_id: HashMap<String, String>,
    ids_by_name: HashMap<String, String>,
    path: Option<PathBuf>,
}

impl UsersCache {
    /// Build the lookup maps from a member list. Deleted members stay in the
    /// snapshot but are excluded from resolution.
    #[must_use]
    pub fn from_users(users: Vec<SlackUser>) -> Self {
        let mut names_by_id = HashMap::new();
        let mut ids_by_name = HashMap::new();
        for user in &users {
            if user.deleted || user.id.is_empty() {
                continue;
            }
            let display = user.display_name().to_string();
            ids_by_name.insert(display.clone(), user.id.clone());
            names_by_id.insert(user.id.clone(), display);
        }
        Self {
            users,
            names_by_id,
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
        let users: Vec<SlackUser> = serde_json::from_str(&data)?;
        let mut cache = Self::from_users(users);
        cache.path = Some(path.to_path_buf());
        debug!(path = %path.display(), count = cache.users.len(), "loaded users snapshot");
        Ok(Some(cache))
    }

    /// Fetch the member list and persist a fresh snapshot.
    pub async fn refresh(client: &SlackClient, path: &Path) -> Result<Self> {
        let users = client.list_all_users().await?;
        let mut cache = Self::from_users(users);
        cache.persist_to(path)?;
        info!(path = %path.display(), count = cache.users.len(), "refreshed users snapshot");
        Ok(cache)
    }

    /// Use the on-disk snapshot when present, otherwise fetch and persist
    /// one. An unreadable snapshot falls back to a fetch.
    pub async fn warm(client: &SlackClient, path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(Some(cache)) => Ok(cache),
            Ok(None) => Self::refresh(client, path).await,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "users snapshot unreadable, refetching");
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
        std::fs::write(path, serde_json::to_string_pretty(&self.users)?)?;
        Ok(())
    }

    /// Number of resolvable members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names_by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names_by_id.is_empty()
    }

    /// Reverse lookup: display name to member id.
    #[must_use]
    pub fn id_for(&self, display_name: &str) -> Option<&str> {
        self.ids_by_name.get(display_name).map(String::as_str)
    }
}

impl UserDirectory for UsersCache {
    fn lookup(&self, user_id: &str) -> Option<String> {
        self.names_by_id.get(user_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use crate::wire::UserProfile;

    use super::*;

    fn member(id: &str, name: &str, display: &str) -> SlackUser {
        SlackUser {
            id: id.into(),
            name: name.into(),
            profile: UserProfile {
                display_name: display.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn maps_are_bidirectional() {
        let cache = UsersCache::from_users(vec![member("U1", "ada", "Ada Lovelace")]);
        assert_eq!(cache.lookup("U1").as_deref(), Some("Ada Lovelace"));
        assert_eq!(cache.id_for("Ada Lovelace"), Some("U1"));
        assert!(cache.lookup("U2").is_none());
    }

    #[test]
    fn deleted_members_do_not_resolve() {
        let mut gone = member("U9", "ghost", "Ghost");
        gone.deleted = true;
        let cache = UsersCache::from_users(vec![gone, member("U1", "ada", "Ada")]);
        assert_eq!(cache.len(), 1);
        assert!(cache.lookup("U9").is_none());
    }

    #[test]
    fn handle_is_used_when_profile_is_blank() {
        let cache = UsersCache::from_users(vec![member("U3", "jdoe", "")]);
        assert_eq!(cache.lookup("U3").as_deref(), Some("jdoe"));
    }

    #[test]
    fn snapshot_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");

        let mut cache = UsersCache::from_users(vec![member("U1", "ada", "Ada Lovelace")]);
        cache.persist_to(&path).unwrap();

        let loaded = UsersCache::load(&path).unwrap().unwrap();
        assert_eq!(loaded.lookup("U1").as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn missing_snapshot_loads_as_none() {
        assert!(
            UsersCache::load(Path::new("/nonexistent/users.json"))
                .unwrap()
                .is_none()
        );
    }
}
