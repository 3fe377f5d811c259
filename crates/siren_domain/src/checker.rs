//! The periodic permission monitor.
//!
//! One worker thread per monitoring run evaluates a fresh
//! [`PermissionSnapshot`] at a fixed interval and surfaces at most one
//! reminder per cycle. Collaborator failures never terminate the schedule.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use parking_lot::{Condvar, Mutex};
use serde::Serialize;
use thiserror::Error;

use crate::notifications::{
    NotificationSink, SettingsNavigator, SettingsSurface, ONGOING_STATUS_ID,
};
use crate::permissions::{PermissionSnapshot, PermissionStatusProvider};
use crate::reminder::{self, DEFAULT_CHECK_INTERVAL};

#[derive(Debug, Error)]
pub enum StartError {
    /// Platform policy forbids running the monitor while notifications are
    /// globally disabled. The caller has already been redirected to the
    /// notification settings surface, best effort.
    #[error("notifications are disabled; permission monitoring cannot start")]
    NotificationsBlocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
}

/// Point-in-time diagnostics for the host UI.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CheckerStatus {
    pub running: bool,
    pub cycles_completed: u64,
    pub last_cycle_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct CycleStats {
    cycles_completed: u64,
    last_cycle_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct StopSignal {
    stopped: Mutex<bool>,
    condvar: Condvar,
}

impl StopSignal {
    fn trigger(&self) {
        *self.stopped.lock() = true;
        self.condvar.notify_all();
    }

    /// Sleeps until the interval elapses or stop is requested, whichever
    /// comes first. Returns whether stop was requested.
    fn wait_for(&self, interval: Duration) -> bool {
        let deadline = Instant::now() + interval;
        let mut stopped = self.stopped.lock();
        while !*stopped {
            if self.condvar.wait_until(&mut stopped, deadline).timed_out() {
                break;
            }
        }
        *stopped
    }
}

struct Worker {
    stop: Arc<StopSignal>,
    handle: JoinHandle<()>,
}

pub struct PermissionReminder {
    provider: Arc<dyn PermissionStatusProvider>,
    sink: Arc<dyn NotificationSink>,
    navigator: Arc<dyn SettingsNavigator>,
    interval: Duration,
    require_notifications: bool,
    worker: Mutex<Option<Worker>>,
    stats: Arc<Mutex<CycleStats>>,
}

pub struct PermissionReminderBuilder {
    provider: Option<Arc<dyn PermissionStatusProvider>>,
    sink: Option<Arc<dyn NotificationSink>>,
    navigator: Option<Arc<dyn SettingsNavigator>>,
    interval: Duration,
    require_notifications: bool,
}

impl PermissionReminderBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            sink: None,
            navigator: None,
            interval: DEFAULT_CHECK_INTERVAL,
            require_notifications: true,
        }
    }

    pub fn with_status_provider(mut self, provider: Arc<dyn PermissionStatusProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_notification_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_settings_navigator(mut self, navigator: Arc<dyn SettingsNavigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn with_check_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Whether foreground operation requires notifications to be enabled.
    /// Mirrors the Android 13+ foreground-service restriction; platforms
    /// without that policy pass `false`.
    pub fn require_notifications_for_foreground(mut self, required: bool) -> Self {
        self.require_notifications = required;
        self
    }

    pub fn build(self) -> Result<PermissionReminder> {
        Ok(PermissionReminder {
            provider: self
                .provider
                .ok_or_else(|| anyhow!("permission status provider not configured"))?,
            sink: self
                .sink
                .ok_or_else(|| anyhow!("notification sink not configured"))?,
            navigator: self
                .navigator
                .ok_or_else(|| anyhow!("settings navigator not configured"))?,
            interval: self.interval,
            require_notifications: self.require_notifications,
            worker: Mutex::new(None),
            stats: Arc::new(Mutex::new(CycleStats::default())),
        })
    }
}

impl Default for PermissionReminderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PermissionReminder {
    pub fn builder() -> PermissionReminderBuilder {
        PermissionReminderBuilder::new()
    }

    /// Begins monitoring. Idempotent: a second call while running is a no-op.
    ///
    /// The first check runs immediately on the worker thread; subsequent
    /// checks follow at the configured interval.
    pub fn start(&self) -> Result<StartOutcome, StartError> {
        let mut worker = self.worker.lock();
        if worker.is_some() {
            tracing::debug!("permission monitor already running");
            return Ok(StartOutcome::AlreadyRunning);
        }

        if self.require_notifications && !self.notifications_enabled_best_effort() {
            if let Err(err) = self.navigator.open(SettingsSurface::AppNotificationSettings) {
                tracing::warn!(%err, "settings redirect failed");
            }
            return Err(StartError::NotificationsBlocked);
        }

        if let Err(err) = self.sink.show_ongoing_status(reminder::ongoing_status()) {
            tracing::warn!(%err, "unable to display ongoing status");
        }

        let stop = Arc::new(StopSignal::default());
        let provider = Arc::clone(&self.provider);
        let sink = Arc::clone(&self.sink);
        let stats = Arc::clone(&self.stats);
        let worker_stop = Arc::clone(&stop);
        let interval = self.interval;
        let handle = thread::spawn(move || loop {
            if let Err(err) = run_cycle(provider.as_ref(), sink.as_ref()) {
                tracing::warn!(%err, "permission check failed; next cycle will retry");
            }
            {
                let mut stats = stats.lock();
                stats.cycles_completed += 1;
                stats.last_cycle_at = Some(Utc::now());
            }
            if worker_stop.wait_for(interval) {
                break;
            }
        });

        *worker = Some(Worker { stop, handle });
        tracing::info!(interval_secs = interval.as_secs(), "permission monitor started");
        Ok(StartOutcome::Started)
    }

    /// Cancels the schedule and retracts the ongoing status display.
    /// Idempotent; after return no further check fires.
    pub fn stop(&self) {
        let taken = self.worker.lock().take();
        let Some(worker) = taken else {
            return;
        };
        worker.stop.trigger();
        if worker.handle.join().is_err() {
            tracing::error!("permission monitor worker panicked");
        }
        if let Err(err) = self.sink.cancel(ONGOING_STATUS_ID) {
            tracing::warn!(%err, "unable to retract ongoing status");
        }
        tracing::info!("permission monitor stopped");
    }

    pub fn is_running(&self) -> bool {
        self.worker.lock().is_some()
    }

    pub fn status(&self) -> CheckerStatus {
        let running = self.is_running();
        let stats = self.stats.lock();
        CheckerStatus {
            running,
            cycles_completed: stats.cycles_completed,
            last_cycle_at: stats.last_cycle_at,
        }
    }

    fn notifications_enabled_best_effort(&self) -> bool {
        self.provider.notifications_enabled().unwrap_or_else(|err| {
            tracing::warn!(%err, "notification status query failed during start; assuming enabled");
            true
        })
    }
}

impl Drop for PermissionReminder {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_cycle(provider: &dyn PermissionStatusProvider, sink: &dyn NotificationSink) -> Result<()> {
    let notifications_enabled = provider.notifications_enabled()?;
    // An unreadable location provider counts as switched off.
    let location_enabled = provider.location_provider_enabled().unwrap_or_else(|err| {
        tracing::warn!(%err, "location status query failed; treating provider as disabled");
        false
    });
    let snapshot = PermissionSnapshot {
        notifications_enabled,
        location_enabled,
    };
    match reminder::reminder_for(&snapshot) {
        Some(request) => {
            tracing::debug!(body = %request.body, "surfacing permission reminder");
            sink.show_alert(request)?;
        }
        None => tracing::debug!("all permissions granted"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_signal_wakes_waiter_immediately() {
        let signal = Arc::new(StopSignal::default());
        let waiter = Arc::clone(&signal);
        let handle = thread::spawn(move || waiter.wait_for(Duration::from_secs(3600)));
        thread::sleep(Duration::from_millis(20));
        signal.trigger();
        let started = Instant::now();
        assert!(handle.join().expect("waiter thread"));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn stop_signal_times_out_when_untriggered() {
        let signal = StopSignal::default();
        assert!(!signal.wait_for(Duration::from_millis(10)));
    }
}
