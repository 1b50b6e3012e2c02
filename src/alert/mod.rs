//! Out-of-band operator alerts.
//!
//! The sink is chosen once at startup from configuration and never changes:
//!
//! - `DisabledSink` - alerting not configured, every send is a no-op
//! - `SmsSink` - sends the alert as an SMS through Twilio

mod sms;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info};

use crate::config::AlertCredentials;

pub use sms::SmsSink;

/// Alert delivery errors.
#[derive(Debug, Error)]
pub enum AlertError {
    #[error("SMS request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("SMS provider rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// A destination for operator alerts.
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Whether alerts are actually delivered anywhere.
    fn is_enabled(&self) -> bool {
        true
    }

    async fn send(&self, message: &str) -> Result<(), AlertError>;
}

/// Sink used when alerting is not configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledSink;

#[async_trait]
impl AlertSink for DisabledSink {
    fn is_enabled(&self) -> bool {
        false
    }

    async fn send(&self, _message: &str) -> Result<(), AlertError> {
        Ok(())
    }
}

/// Pick the alert sink for the given credentials.
///
/// Falls back to `DisabledSink` if the SMS client cannot be built.
pub fn build_alert_sink(credentials: Option<AlertCredentials>) -> Arc<dyn AlertSink> {
    let Some(credentials) = credentials else {
        info!("SMS notifications disabled (Twilio credentials not configured)");
        return Arc::new(DisabledSink);
    };

    match SmsSink::new(credentials) {
        Ok(sink) => {
            info!("SMS notifications enabled");
            Arc::new(sink)
        }
        Err(e) => {
            error!("Failed to initialize SMS client: {}", e);
            Arc::new(DisabledSink)
        }
    }
}
