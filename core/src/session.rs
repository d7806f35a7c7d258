//! Session lifecycle monitor.
//!
//! Keeps the authentication session fresh while the app is in the
//! foreground. The monitor is a small state machine driven by platform
//! lifecycle signals: entering the active state starts a periodic
//! refresh task, leaving it stops the task. The task is owned by the
//! monitor, not global; dropping the monitor stops refreshing.

use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::storage::traits::AuthGateway;

/// Platform lifecycle signal driving the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppLifecycle {
    /// App is in the foreground; credentials are kept fresh.
    Active,
    /// App is backgrounded; refreshing is paused.
    Background,
}

/// Owns the credential-refresh task for the active session.
pub struct SessionMonitor {
    auth: Arc<dyn AuthGateway>,
    refresh_interval: Duration,
    state: AppLifecycle,
    refresh_task: Option<JoinHandle<()>>,
}

impl SessionMonitor {
    /// Create a monitor in the background state; nothing runs until the
    /// first [`AppLifecycle::Active`] signal.
    pub fn new(auth: Arc<dyn AuthGateway>, refresh_interval: Duration) -> Self {
        Self {
            auth,
            refresh_interval,
            state: AppLifecycle::Background,
            refresh_task: None,
        }
    }

    pub fn state(&self) -> AppLifecycle {
        self.state
    }

    /// Apply a lifecycle transition. Re-applying the current state is a
    /// no-op.
    pub fn set_state(&mut self, next: AppLifecycle) {
        if next == self.state {
            return;
        }

        match next {
            AppLifecycle::Active => {
                info!("Session monitor active; starting credential refresh");
                let auth = self.auth.clone();
                let interval = self.refresh_interval;
                self.refresh_task = Some(tokio::spawn(async move {
                    let mut ticker = tokio::time::interval(interval);
                    loop {
                        ticker.tick().await;
                        if let Err(e) = auth.refresh_session().await {
                            warn!("Session refresh failed: {}", e);
                        }
                    }
                }));
            }
            AppLifecycle::Background => {
                info!("Session monitor backgrounded; stopping credential refresh");
                self.stop_refresh_task();
            }
        }

        self.state = next;
    }

    fn stop_refresh_task(&mut self) {
        if let Some(task) = self.refresh_task.take() {
            task.abort();
        }
    }
}

impl Drop for SessionMonitor {
    fn drop(&mut self) {
        self.stop_refresh_task();
    }
}
