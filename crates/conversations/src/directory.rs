//! Read-only user directory capability.

use std::collections::HashMap;

/// Lookup from opaque user ids to display names.
///
/// Lookups are total: a miss returns `None`, never an error. Implementations
/// hand the normalizer an immutable snapshot; the pipeline never mutates or
/// retains what it is given. Directory refresh must swap in a new snapshot
/// rather than mutate one a normalization call may be reading.
pub trait UserDirectory: Send + Sync {
    fn lookup(&self, user_id: &str) -> Option<String>;
}

/// A directory with no entries; every lookup misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyDirectory;

impl UserDirectory for EmptyDirectory {
    fn lookup(&self, _user_id: &str) -> Option<String> {
        None
    }
}

/// Plain maps act as directories, mostly for tests and fixtures.
impl UserDirectory for HashMap<String, String> {
    fn lookup(&self, user_id: &str) -> Option<String> {
        self.get(user_id).cloned()
    }
}
