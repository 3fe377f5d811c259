use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One fresh read of the two OS toggles the reminder cares about.
///
/// Snapshots are recomputed on every cycle and never cached between cycles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PermissionSnapshot {
    pub notifications_enabled: bool,
    pub location_enabled: bool,
}

impl PermissionSnapshot {
    pub fn all_granted(&self) -> bool {
        self.notifications_enabled && self.location_enabled
    }
}

/// Platform-specific permission adapters implement this trait.
///
/// Queries are expected to be synchronous and fast; the checker calls them
/// from its own worker thread, never from the host UI thread.
pub trait PermissionStatusProvider: Send + Sync {
    /// Whether the app is currently allowed to post notifications.
    fn notifications_enabled(&self) -> Result<bool>;

    /// Whether any location provider (GPS or network) is switched on.
    fn location_provider_enabled(&self) -> Result<bool>;
}
