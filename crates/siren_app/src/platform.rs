//! Desktop implementations of the monitor's capability traits.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use notify_rust::{Notification, Timeout};
use serde::Deserialize;

use siren_domain::notifications::NotificationId;
use siren_domain::{
    NotificationRequest, NotificationSink, PermissionStatusProvider, SettingsNavigator,
    SettingsSurface,
};

/// Desktop stand-in for the OS permission switches: an optional JSON state
/// file maintained by the host environment, re-read on every query so each
/// cycle sees fresh state. A missing file means both toggles are granted.
pub struct FilePermissionProvider {
    state_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct PermissionStateFile {
    #[serde(default = "granted")]
    notifications_enabled: bool,
    #[serde(default = "granted")]
    location_enabled: bool,
}

fn granted() -> bool {
    true
}

impl PermissionStateFile {
    fn all_granted() -> Self {
        Self {
            notifications_enabled: true,
            location_enabled: true,
        }
    }
}

impl FilePermissionProvider {
    pub fn new(state_file: Option<PathBuf>) -> Self {
        Self { state_file }
    }

    fn load(&self) -> Result<PermissionStateFile> {
        let Some(path) = &self.state_file else {
            return Ok(PermissionStateFile::all_granted());
        };
        if !path.exists() {
            return Ok(PermissionStateFile::all_granted());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("unable to read {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("malformed permission state in {}", path.display()))
    }
}

impl PermissionStatusProvider for FilePermissionProvider {
    fn notifications_enabled(&self) -> Result<bool> {
        Ok(self.load()?.notifications_enabled)
    }

    fn location_provider_enabled(&self) -> Result<bool> {
        Ok(self.load()?.location_enabled)
    }
}

/// notify-rust adapter. Desktop notification servers do not expose retraction
/// by our slot ids, so cancellation is best effort only.
#[derive(Default)]
pub struct DesktopNotificationSink;

impl DesktopNotificationSink {
    pub fn new() -> Self {
        Self
    }
}

impl NotificationSink for DesktopNotificationSink {
    fn show_alert(&self, request: NotificationRequest) -> Result<()> {
        Notification::new()
            .summary(&request.title)
            .body(&request.body)
            .show()
            .context("notification daemon rejected alert")?;
        Ok(())
    }

    fn show_ongoing_status(&self, request: NotificationRequest) -> Result<()> {
        Notification::new()
            .summary(&request.title)
            .body(&request.body)
            .timeout(Timeout::Never)
            .show()
            .context("notification daemon rejected status display")?;
        Ok(())
    }

    fn cancel(&self, id: NotificationId) -> Result<()> {
        tracing::debug!(id = id.0, "notification server cannot retract by slot");
        Ok(())
    }
}

/// Desktops have no portable deep link into permission panels; surface the
/// request in the log instead.
pub struct DesktopSettingsNavigator;

impl SettingsNavigator for DesktopSettingsNavigator {
    fn open(&self, surface: SettingsSurface) -> Result<()> {
        tracing::info!(?surface, "review the corresponding system settings panel");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_state_file_means_everything_granted() {
        let provider = FilePermissionProvider::new(None);
        assert!(provider.notifications_enabled().unwrap());
        assert!(provider.location_provider_enabled().unwrap());
    }

    #[test]
    fn state_file_is_reread_on_every_query() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("permissions.json");
        fs::write(&path, r#"{"notifications_enabled": false}"#).expect("write state");

        let provider = FilePermissionProvider::new(Some(path.clone()));
        assert!(!provider.notifications_enabled().unwrap());
        assert!(
            provider.location_provider_enabled().unwrap(),
            "unspecified toggle defaults to granted"
        );

        fs::write(
            &path,
            r#"{"notifications_enabled": true, "location_enabled": false}"#,
        )
        .expect("rewrite state");
        assert!(provider.notifications_enabled().unwrap());
        assert!(!provider.location_provider_enabled().unwrap());
    }

    #[test]
    fn malformed_state_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("permissions.json");
        fs::write(&path, "not json").expect("write state");

        let provider = FilePermissionProvider::new(Some(path));
        assert!(provider.notifications_enabled().is_err());
    }
}
