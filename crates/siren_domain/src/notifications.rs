use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Stable identity slot for a notification. Rendering into an occupied slot
/// replaces the previous notification rather than stacking a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub u32);

/// Persistent entry shown while monitoring is running.
pub const ONGOING_STATUS_ID: NotificationId = NotificationId(1001);
/// The single dismissible "action required" alert.
pub const ACTION_REQUIRED_ID: NotificationId = NotificationId(1002);

/// System settings surface a notification tap (or an explicit navigation
/// command from the UI layer) should land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsSurface {
    AppNotificationSettings,
    AppDetailsSettings,
    LocationSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationRequest {
    pub id: NotificationId,
    pub title: String,
    pub body: String,
    pub tap_action: Option<SettingsSurface>,
}

/// Platform-specific notification adapters will implement this trait.
pub trait NotificationSink: Send + Sync {
    /// Dismissible alert. A request reusing an id replaces the live alert
    /// carrying that id.
    fn show_alert(&self, request: NotificationRequest) -> Result<()>;

    /// Non-dismissible status entry kept visible while monitoring runs.
    fn show_ongoing_status(&self, request: NotificationRequest) -> Result<()>;

    /// Retract the notification in the given slot, if any.
    fn cancel(&self, id: NotificationId) -> Result<()>;
}

/// Routes the user to a system settings surface.
pub trait SettingsNavigator: Send + Sync {
    fn open(&self, surface: SettingsSurface) -> Result<()>;
}
