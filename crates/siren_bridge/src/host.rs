//! Host-side platform adapter.
//!
//! The UI shell owns the real OS surfaces, so the bridge models them as a
//! mailbox: permission state flows in via reports, and display/navigation
//! requests flow out as events the shell drains and performs.

use std::collections::VecDeque;

use anyhow::Result;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;

use siren_domain::notifications::NotificationId;
use siren_domain::{
    NotificationRequest, NotificationSink, PermissionSnapshot, PermissionStatusProvider,
    SettingsNavigator, SettingsSurface,
};

/// An OS-side action the host shell still has to perform.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostEvent {
    ShowAlert { request: NotificationRequest },
    ShowOngoingStatus { request: NotificationRequest },
    CancelNotification { id: NotificationId },
    OpenSettings { surface: SettingsSurface },
}

pub struct HostPlatform {
    state: RwLock<PermissionSnapshot>,
    events: Mutex<VecDeque<HostEvent>>,
}

impl HostPlatform {
    pub fn new() -> Self {
        Self {
            // Until the host reports otherwise, assume everything is granted
            // so a fresh process can start monitoring.
            state: RwLock::new(PermissionSnapshot {
                notifications_enabled: true,
                location_enabled: true,
            }),
            events: Mutex::new(VecDeque::new()),
        }
    }

    pub fn report_state(&self, snapshot: PermissionSnapshot) {
        tracing::debug!(?snapshot, "host reported permission state");
        *self.state.write() = snapshot;
    }

    pub fn snapshot(&self) -> PermissionSnapshot {
        *self.state.read()
    }

    pub fn drain_events(&self) -> Vec<HostEvent> {
        self.events.lock().drain(..).collect()
    }

    fn push(&self, event: HostEvent) {
        self.events.lock().push_back(event);
    }
}

impl Default for HostPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl PermissionStatusProvider for HostPlatform {
    fn notifications_enabled(&self) -> Result<bool> {
        Ok(self.state.read().notifications_enabled)
    }

    fn location_provider_enabled(&self) -> Result<bool> {
        Ok(self.state.read().location_enabled)
    }
}

impl NotificationSink for HostPlatform {
    fn show_alert(&self, request: NotificationRequest) -> Result<()> {
        self.push(HostEvent::ShowAlert { request });
        Ok(())
    }

    fn show_ongoing_status(&self, request: NotificationRequest) -> Result<()> {
        self.push(HostEvent::ShowOngoingStatus { request });
        Ok(())
    }

    fn cancel(&self, id: NotificationId) -> Result<()> {
        self.push(HostEvent::CancelNotification { id });
        Ok(())
    }
}

impl SettingsNavigator for HostPlatform {
    fn open(&self, surface: SettingsSurface) -> Result<()> {
        self.push(HostEvent::OpenSettings { surface });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use siren_domain::notifications::ACTION_REQUIRED_ID;

    #[test]
    fn reported_state_answers_queries() {
        let platform = HostPlatform::new();
        platform.report_state(PermissionSnapshot {
            notifications_enabled: false,
            location_enabled: true,
        });
        assert!(!platform.notifications_enabled().unwrap());
        assert!(platform.location_provider_enabled().unwrap());
    }

    #[test]
    fn sink_and_navigator_calls_queue_events_in_order() {
        let platform = HostPlatform::new();
        platform
            .show_alert(NotificationRequest {
                id: ACTION_REQUIRED_ID,
                title: "Action required".into(),
                body: "body".into(),
                tap_action: None,
            })
            .unwrap();
        platform.cancel(ACTION_REQUIRED_ID).unwrap();
        platform.open(SettingsSurface::LocationSettings).unwrap();

        let events = platform.drain_events();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], HostEvent::ShowAlert { .. }));
        assert!(matches!(
            events[1],
            HostEvent::CancelNotification {
                id: ACTION_REQUIRED_ID
            }
        ));
        assert!(matches!(
            events[2],
            HostEvent::OpenSettings {
                surface: SettingsSurface::LocationSettings
            }
        ));
        assert!(platform.drain_events().is_empty(), "drain empties the queue");
    }
}
