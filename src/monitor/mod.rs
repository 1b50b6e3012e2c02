//! Activity and error monitor.
//!
//! One `Monitor` exists per process and is shared (`Arc<Monitor>`) between
//! the update handlers and the keep-alive server.
//!
//! ## Error streak
//!
//! Every logged error bumps a counter. When it reaches `max_errors` and
//! alerting is enabled, an alert is sent and the counter goes back to zero.
//! Any processed update also resets it. `error_window` is reported but does
//! not evict old errors.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{error, info};

use crate::alert::AlertSink;

/// Alert threshold settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorSettings {
    pub max_errors: u32,
    pub error_window: Duration,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            max_errors: 5,
            error_window: Duration::from_secs(300), // 5 minutes
        }
    }
}

/// Point-in-time view of the monitor, used by the keep-alive server.
#[derive(Debug, Clone)]
pub struct MonitorSnapshot {
    pub started_at: DateTime<Utc>,
    pub uptime: Duration,
    pub last_activity: DateTime<Utc>,
    pub error_count: u32,
}

/// Process-wide activity and error tracking.
pub struct Monitor {
    sink: Arc<dyn AlertSink>,
    settings: MonitorSettings,
    error_count: AtomicU32,
    last_activity: Mutex<DateTime<Utc>>,
    started_at: DateTime<Utc>,
    started: Instant,
}

impl Monitor {
    pub fn new(sink: Arc<dyn AlertSink>, settings: MonitorSettings) -> Self {
        let now = Utc::now();
        Self {
            sink,
            settings: MonitorSettings {
                max_errors: settings.max_errors.max(1),
                ..settings
            },
            error_count: AtomicU32::new(0),
            last_activity: Mutex::new(now),
            started_at: now,
            started: Instant::now(),
        }
    }

    /// Record that an update was processed and clear the error streak.
    pub fn update_activity(&self) {
        *self.last_activity.lock() = Utc::now();
        self.error_count.store(0, Ordering::Release);
    }

    /// Log an error and alert the operator if the streak hits the threshold.
    pub async fn log_error<E>(&self, error: &E, context: Option<&str>)
    where
        E: fmt::Display + fmt::Debug + Sync + ?Sized,
    {
        let count = self.error_count.fetch_add(1, Ordering::AcqRel).wrapping_add(1);

        let error_msg = match context {
            Some(ctx) => format!("{}: Error: {}", ctx, error),
            None => format!("Error: {}", error),
        };

        error!(error_count = count, details = ?error, "{}", error_msg);

        if count < self.settings.max_errors || !self.sink.is_enabled() {
            return;
        }

        // Only the caller that resets the counter fires the alert.
        if self
            .error_count
            .compare_exchange(count, 0, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            self.send_alert(&format!(
                "Critical: Bot experiencing high error rate\n{}",
                error_msg
            ))
            .await;
        }
    }

    /// Send an alert through the configured sink.
    ///
    /// Failures are logged here and never counted as bot errors.
    pub async fn send_alert(&self, message: &str) {
        if !self.sink.is_enabled() {
            return;
        }

        match self.sink.send(message).await {
            Ok(()) => info!("Alert SMS sent successfully"),
            Err(e) => error!("Failed to send SMS alert: {}", e),
        }
    }

    pub fn error_count(&self) -> u32 {
        self.error_count.load(Ordering::Acquire)
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        *self.last_activity.lock()
    }

    pub fn settings(&self) -> MonitorSettings {
        self.settings
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            started_at: self.started_at,
            uptime: self.started.elapsed(),
            last_activity: self.last_activity(),
            error_count: self.error_count(),
        }
    }
}

impl fmt::Debug for Monitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Monitor")
            .field("settings", &self.settings)
            .field("error_count", &self.error_count())
            .field("alerts_enabled", &self.sink.is_enabled())
            .finish()
    }
}
