use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info};

use siren_domain::reminder::DEFAULT_CHECK_INTERVAL;
use siren_domain::PermissionReminder;

use crate::platform::{DesktopNotificationSink, DesktopSettingsNavigator, FilePermissionProvider};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub(crate) check_interval: Duration,
    pub(crate) state_file: Option<PathBuf>,
    pub(crate) require_notifications: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(secs) = std::env::var("SIREN_CHECK_INTERVAL_SECS") {
            if let Ok(value) = secs.trim().parse::<u64>() {
                if value > 0 {
                    config.check_interval = Duration::from_secs(value);
                }
            }
        }
        if let Ok(path) = std::env::var("SIREN_PERMISSION_STATE_FILE") {
            if !path.trim().is_empty() {
                config.state_file = Some(PathBuf::from(path));
            }
        }
        if let Ok(flag) = std::env::var("SIREN_REQUIRE_NOTIFICATIONS") {
            config.require_notifications = matches!(flag.trim(), "1" | "true" | "yes");
        }
        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            check_interval: DEFAULT_CHECK_INTERVAL,
            state_file: None,
            require_notifications: false,
        }
    }
}

pub fn run(config: AppConfig) -> Result<()> {
    let reminder = PermissionReminder::builder()
        .with_status_provider(Arc::new(FilePermissionProvider::new(
            config.state_file.clone(),
        )))
        .with_notification_sink(Arc::new(DesktopNotificationSink::new()))
        .with_settings_navigator(Arc::new(DesktopSettingsNavigator))
        .with_check_interval(config.check_interval)
        .require_notifications_for_foreground(config.require_notifications)
        .build()?;

    let outcome = reminder.start()?;
    info!(?outcome, interval_secs = config.check_interval.as_secs(), "permission monitor running");

    loop {
        std::thread::sleep(Duration::from_secs(60));
        let status = reminder.status();
        debug!(
            cycles = status.cycles_completed,
            last_cycle_at = ?status.last_cycle_at,
            "monitor heartbeat"
        );
    }
}
