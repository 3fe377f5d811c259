//! N-API control surface for the UI shell.
//!
//! Thin pass-throughs around one process-wide [`PermissionReminder`]: start
//! and stop commands, boolean permission queries answered from the host's
//! last report, settings navigation, and the push display helpers. Nothing
//! here holds logic beyond marshalling.

mod host;

pub use host::{HostEvent, HostPlatform};

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use napi_derive::napi;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde_json::json;

use siren_domain::{
    NotificationSink, PermissionReminder, PermissionSnapshot, PermissionStatusProvider,
    SettingsNavigator, SettingsSurface, StartError,
};
use siren_push::{build_display, parse_payload, route_click, ClientHandle, PushAction};

struct BridgeState {
    platform: Arc<HostPlatform>,
    reminder: Option<PermissionReminder>,
}

impl BridgeState {
    fn new() -> Self {
        Self {
            platform: Arc::new(HostPlatform::new()),
            reminder: None,
        }
    }
}

static BRIDGE: Lazy<RwLock<BridgeState>> = Lazy::new(|| RwLock::new(BridgeState::new()));

#[napi(object)]
#[derive(Clone, Debug, Default)]
pub struct ReminderBridgeConfig {
    /// Overrides the 6 hour default. Applies to the first start only.
    pub check_interval_secs: Option<u32>,
    /// Whether start must be refused while notifications are disabled.
    pub require_notifications: Option<bool>,
}

#[napi(object)]
#[derive(Clone, Debug)]
pub struct PushClient {
    pub id: String,
    pub url: String,
}

#[napi]
pub fn ping() -> String {
    "siren-bridge".to_owned()
}

/// The host shell reports fresh OS permission state whenever it changes.
#[napi]
pub fn report_permission_state(notifications_enabled: bool, location_enabled: bool) {
    BRIDGE.read().platform.report_state(PermissionSnapshot {
        notifications_enabled,
        location_enabled,
    });
}

#[napi]
pub fn notifications_permission_granted() -> bool {
    BRIDGE.read().platform.snapshot().notifications_enabled
}

#[napi]
pub fn location_permission_granted() -> bool {
    BRIDGE.read().platform.snapshot().location_enabled
}

/// Starts the permission monitor. Returns `false` when platform policy
/// refuses the start (the settings redirect has already been queued).
#[napi]
pub fn start_permission_reminder(config: Option<ReminderBridgeConfig>) -> napi::Result<bool> {
    let mut guard = BRIDGE.write();
    if guard.reminder.is_none() {
        let reminder =
            build_reminder(Arc::clone(&guard.platform), config.as_ref()).map_err(to_napi_error)?;
        guard.reminder = Some(reminder);
    }
    let Some(reminder) = guard.reminder.as_ref() else {
        return Ok(false);
    };
    match reminder.start() {
        Ok(_) => Ok(true),
        Err(StartError::NotificationsBlocked) => Ok(false),
    }
}

#[napi]
pub fn stop_permission_reminder() {
    if let Some(reminder) = BRIDGE.read().reminder.as_ref() {
        reminder.stop();
    }
}

#[napi]
pub fn reminder_status() -> napi::Result<serde_json::Value> {
    let guard = BRIDGE.read();
    match guard.reminder.as_ref() {
        Some(reminder) => {
            serde_json::to_value(reminder.status()).map_err(|err| to_napi_error(err.into()))
        }
        None => Ok(json!({
            "running": false,
            "cycles_completed": 0,
            "last_cycle_at": null,
        })),
    }
}

/// OS-side actions (notification shows/cancels, settings opens) queued for
/// the host shell to perform.
#[napi]
pub fn drain_host_events() -> napi::Result<Vec<serde_json::Value>> {
    let events = BRIDGE.read().platform.drain_events();
    events
        .into_iter()
        .map(|event| serde_json::to_value(event).map_err(|err| to_napi_error(err.into())))
        .collect()
}

#[napi]
pub fn open_notification_settings() -> napi::Result<()> {
    BRIDGE
        .read()
        .platform
        .open(SettingsSurface::AppNotificationSettings)
        .map_err(to_napi_error)
}

#[napi]
pub fn open_location_settings() -> napi::Result<()> {
    BRIDGE
        .read()
        .platform
        .open(SettingsSurface::LocationSettings)
        .map_err(to_napi_error)
}

/// Resolves a raw push payload into the notification the host should render.
#[napi]
pub fn describe_push_payload(payload: serde_json::Value) -> napi::Result<serde_json::Value> {
    let payload = parse_payload(payload).map_err(to_napi_error)?;
    serde_json::to_value(build_display(&payload)).map_err(|err| to_napi_error(err.into()))
}

/// Click routing for a rendered push notification. `action` is absent for a
/// bare click on the notification body.
#[napi]
pub fn route_push_click(
    action: Option<String>,
    clients: Vec<PushClient>,
) -> napi::Result<serde_json::Value> {
    let action = action.as_deref().map(|name| match name {
        "view" => PushAction::View,
        "close" => PushAction::Close,
        other => {
            tracing::debug!(action = other, "unrecognized push action");
            PushAction::Close
        }
    });
    let clients: Vec<ClientHandle> = clients
        .into_iter()
        .map(|client| ClientHandle {
            id: client.id,
            url: client.url,
        })
        .collect();
    serde_json::to_value(route_click(action, &clients)).map_err(|err| to_napi_error(err.into()))
}

fn build_reminder(
    platform: Arc<HostPlatform>,
    config: Option<&ReminderBridgeConfig>,
) -> Result<PermissionReminder> {
    let mut builder = PermissionReminder::builder()
        .with_status_provider(Arc::clone(&platform) as Arc<dyn PermissionStatusProvider>)
        .with_notification_sink(Arc::clone(&platform) as Arc<dyn NotificationSink>)
        .with_settings_navigator(platform);
    if let Some(config) = config {
        if let Some(secs) = config.check_interval_secs {
            builder = builder.with_check_interval(Duration::from_secs(u64::from(secs)));
        }
        if let Some(required) = config.require_notifications {
            builder = builder.require_notifications_for_foreground(required);
        }
    }
    builder.build()
}

fn to_napi_error(err: anyhow::Error) -> napi::Error {
    napi::Error::new(napi::Status::GenericFailure, err.to_string())
}
