pub mod checker;
pub mod notifications;
pub mod permissions;
pub mod reminder;

pub use crate::checker::{CheckerStatus, PermissionReminder, PermissionReminderBuilder, StartError, StartOutcome};
pub use crate::notifications::{NotificationRequest, NotificationSink, SettingsNavigator, SettingsSurface};
pub use crate::permissions::{PermissionSnapshot, PermissionStatusProvider};
