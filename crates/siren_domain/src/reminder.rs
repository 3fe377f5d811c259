//! Alert policy: which reminder, if any, a permission snapshot warrants.

use std::time::Duration;

use crate::notifications::{
    NotificationRequest, SettingsSurface, ACTION_REQUIRED_ID, ONGOING_STATUS_ID,
};
use crate::permissions::PermissionSnapshot;

/// Default spacing between permission checks.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(6 * 60 * 60);

pub(crate) const ALERT_TITLE: &str = "Action required";
pub(crate) const BOTH_MISSING_BODY: &str =
    "Enable notifications and location for full functionality";
pub(crate) const NOTIFICATIONS_MISSING_BODY: &str =
    "Enable notifications to receive incident alerts";
pub(crate) const LOCATION_MISSING_BODY: &str = "Enable location to improve incident accuracy";

pub(crate) const STATUS_TITLE: &str = "Siren permissions monitor";
pub(crate) const STATUS_BODY: &str = "Tap to review notification and location settings";

/// The alert a snapshot calls for, or `None` when everything is granted.
///
/// Both-missing wins over notifications-only, which wins over location-only,
/// so at most one alert is ever rendered per cycle.
pub fn reminder_for(snapshot: &PermissionSnapshot) -> Option<NotificationRequest> {
    if snapshot.all_granted() {
        return None;
    }
    let body = match (snapshot.notifications_enabled, snapshot.location_enabled) {
        (false, false) => BOTH_MISSING_BODY,
        (false, true) => NOTIFICATIONS_MISSING_BODY,
        _ => LOCATION_MISSING_BODY,
    };
    Some(NotificationRequest {
        id: ACTION_REQUIRED_ID,
        title: ALERT_TITLE.to_string(),
        body: body.to_string(),
        tap_action: Some(SettingsSurface::AppDetailsSettings),
    })
}

/// The persistent status entry displayed for the lifetime of a monitoring run.
pub fn ongoing_status() -> NotificationRequest {
    NotificationRequest {
        id: ONGOING_STATUS_ID,
        title: STATUS_TITLE.to_string(),
        body: STATUS_BODY.to_string(),
        tap_action: Some(SettingsSurface::AppNotificationSettings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(notifications: bool, location: bool) -> PermissionSnapshot {
        PermissionSnapshot {
            notifications_enabled: notifications,
            location_enabled: location,
        }
    }

    #[test]
    fn both_missing_takes_precedence() {
        let request = reminder_for(&snapshot(false, false)).expect("alert expected");
        assert_eq!(request.body, BOTH_MISSING_BODY);
        assert_eq!(request.id, ACTION_REQUIRED_ID);
    }

    #[test]
    fn notifications_only_variant() {
        let request = reminder_for(&snapshot(false, true)).expect("alert expected");
        assert_eq!(request.body, NOTIFICATIONS_MISSING_BODY);
    }

    #[test]
    fn location_only_variant() {
        let request = reminder_for(&snapshot(true, false)).expect("alert expected");
        assert_eq!(request.body, LOCATION_MISSING_BODY);
    }

    #[test]
    fn all_granted_renders_nothing() {
        assert!(reminder_for(&snapshot(true, true)).is_none());
    }
}
