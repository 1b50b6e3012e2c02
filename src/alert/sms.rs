//! Twilio SMS alert sink.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{AlertError, AlertSink};
use crate::config::AlertCredentials;

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Sends alerts as SMS through the Twilio Messages API.
#[derive(Debug, Clone)]
pub struct SmsSink {
    client: Client,
    credentials: AlertCredentials,
}

impl SmsSink {
    pub fn new(credentials: AlertCredentials) -> Result<Self, AlertError> {
        let client = Client::builder().timeout(Duration::from_secs(15)).build()?;
        Ok(Self {
            client,
            credentials,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            TWILIO_API_BASE, self.credentials.account_sid
        )
    }

    fn form<'a>(&'a self, message: &'a str) -> [(&'static str, &'a str); 3] {
        [
            ("To", self.credentials.to_number.as_str()),
            ("From", self.credentials.from_number.as_str()),
            ("Body", message),
        ]
    }
}

#[async_trait]
impl AlertSink for SmsSink {
    async fn send(&self, message: &str) -> Result<(), AlertError> {
        let response = self
            .client
            .post(self.endpoint())
            .basic_auth(
                &self.credentials.account_sid,
                Some(&self.credentials.auth_token),
            )
            .form(&self.form(message))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(AlertError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink() -> SmsSink {
        SmsSink::new(AlertCredentials {
            account_sid: "AC0001".to_string(),
            auth_token: "token".to_string(),
            from_number: "+15550001".to_string(),
            to_number: "+15550002".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_uses_account_sid() {
        assert_eq!(
            sink().endpoint(),
            "https://api.twilio.com/2010-04-01/Accounts/AC0001/Messages.json"
        );
    }

    #[test]
    fn test_form_fields() {
        let sink = sink();
        let form = sink.form("Critical: boom");

        assert_eq!(
            form,
            [
                ("To", "+15550002"),
                ("From", "+15550001"),
                ("Body", "Critical: boom"),
            ]
        );
    }
}
