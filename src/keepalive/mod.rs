//! Keep-alive HTTP server.
//!
//! Runs in its own task for the lifetime of the process and shares nothing
//! with the bot except the `Monitor`.
//!
//! - `GET /` - JSON status (uptime, start time, resident memory)
//! - `GET /ping` - plain `OK`

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::monitor::Monitor;

/// Body of `GET /`.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub status: &'static str,
    pub uptime: String,
    pub started_at: String,
    pub memory_usage_mb: f64,
    pub last_activity: String,
    pub error_count: u32,
}

/// Build the keep-alive router.
pub fn router(monitor: Arc<Monitor>) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/ping", get(ping))
        .with_state(monitor)
}

/// Serve the keep-alive endpoints on `0.0.0.0:<port>` in the background.
///
/// Failing to bind is logged, the bot keeps running.
pub fn spawn(port: u16, monitor: Arc<Monitor>) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = serve(port, monitor).await {
            error!("Failed to start monitoring server: {}", e);
        }
    })
}

async fn serve(port: u16, monitor: Arc<Monitor>) -> std::io::Result<()> {
    let address = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(address).await?;
    info!("Monitoring server started on port {}", port);
    axum::serve(listener, router(monitor)).await
}

async fn status(State(monitor): State<Arc<Monitor>>) -> Json<StatusReport> {
    let snapshot = monitor.snapshot();
    let rss = resident_memory_bytes().unwrap_or(0);

    Json(StatusReport {
        status: "Bot is running",
        uptime: format_uptime(snapshot.uptime),
        started_at: snapshot.started_at.to_rfc3339(),
        memory_usage_mb: bytes_to_mb(rss),
        last_activity: snapshot.last_activity.to_rfc3339(),
        error_count: snapshot.error_count,
    })
}

async fn ping() -> &'static str {
    "OK"
}

/// `H:MM:SS`, hours unbounded.
fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Megabytes rounded to two decimals.
fn bytes_to_mb(bytes: u64) -> f64 {
    (bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0
}

#[cfg(target_os = "linux")]
fn resident_memory_bytes() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    parse_vm_rss(&status)
}

#[cfg(not(target_os = "linux"))]
fn resident_memory_bytes() -> Option<u64> {
    None
}

/// Read `VmRSS` (in kB) from a `/proc/<pid>/status` dump, as bytes.
#[cfg_attr(not(any(target_os = "linux", test)), allow(dead_code))]
fn parse_vm_rss(status: &str) -> Option<u64> {
    status
        .lines()
        .find(|line| line.starts_with("VmRSS:"))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|kb| kb.parse::<u64>().ok())
        .map(|kb| kb * 1024)
}
