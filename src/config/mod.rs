//! Configuration module for the sticker guard bot.
//!
//! Loads configuration from environment variables (optionally via `.env`).

use std::env;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Upper bound for `PERMISSION_CACHE_TTL` (one week).
pub const MAX_PERMISSION_CACHE_TTL: Duration = Duration::from_secs(7 * 24 * 3600);

/// Sticker set banned when `BANNED_STICKER_SETS` is not set.
pub const DEFAULT_BANNED_SET: &str = "t_me_gfjojnlo_by_fStikBot";

/// Printed to stderr when the bot token is missing.
pub const TOKEN_GUIDANCE: &str = "Please set it using: export TELEGRAM_BOT_TOKEN='your_bot_token_here'\n\
You can get a bot token from @BotFather on Telegram";

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("TELEGRAM_BOT_TOKEN not found in environment variables")]
    MissingToken,

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Twilio credentials for SMS alerts.
#[derive(Clone, PartialEq, Eq)]
pub struct AlertCredentials {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender number (`TWILIO_PHONE_NUMBER`).
    pub from_number: String,
    /// Recipient number (`ADMIN_PHONE_NUMBER`).
    pub to_number: String,
}

impl fmt::Debug for AlertCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertCredentials")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("from_number", &self.from_number)
            .field("to_number", &self.to_number)
            .finish()
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    // Telegram
    pub bot_token: String,

    /// Banned sticker set names, in configured order.
    pub banned_sticker_sets: Vec<String>,

    /// Log verbosity (`trace`, `debug`, `info`, `warn`, `error`).
    pub log_level: String,

    /// Pause before deleting a banned sticker.
    pub deletion_delay: Duration,

    /// Port of the keep-alive HTTP server.
    pub keepalive_port: u16,

    /// How long a membership lookup is trusted. Zero disables caching.
    pub permission_cache_ttl: Duration,

    // Monitoring
    pub max_errors: u32,
    pub error_window: Duration,

    /// Present only when all four Twilio variables are set.
    pub alert: Option<AlertCredentials>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"<redacted>")
            .field("banned_sticker_sets", &self.banned_sticker_sets)
            .field("log_level", &self.log_level)
            .field("deletion_delay", &self.deletion_delay)
            .field("keepalive_port", &self.keepalive_port)
            .field("permission_cache_ttl", &self.permission_cache_ttl)
            .field("max_errors", &self.max_errors)
            .field("error_window", &self.error_window)
            .field("alert", &self.alert)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bot_token = get("TELEGRAM_BOT_TOKEN")
            .or_else(|| get("BOT_TOKEN"))
            .ok_or(ConfigError::MissingToken)?;

        let banned_sticker_sets = match get("BANNED_STICKER_SETS") {
            Some(raw) => parse_list(&raw),
            None => vec![DEFAULT_BANNED_SET.to_string()],
        };

        let log_level = match get("LOG_LEVEL") {
            Some(raw) => normalize_log_level(&raw).ok_or(ConfigError::Invalid {
                key: "LOG_LEVEL",
                value: raw,
            })?,
            None => "info".to_string(),
        };

        let deletion_delay = match get("DELETION_DELAY") {
            Some(raw) => parse_seconds(&raw).ok_or(ConfigError::Invalid {
                key: "DELETION_DELAY",
                value: raw,
            })?,
            None => Duration::from_millis(100),
        };

        let keepalive_port = parse_or("KEEPALIVE_PORT", get("KEEPALIVE_PORT"), 5000u16)?;
        let permission_cache_ttl = match get("PERMISSION_CACHE_TTL") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .map(Duration::from_secs)
                .filter(|ttl| *ttl <= MAX_PERMISSION_CACHE_TTL)
                .ok_or(ConfigError::Invalid {
                    key: "PERMISSION_CACHE_TTL",
                    value: raw,
                })?,
            None => Duration::from_secs(60),
        };
        let max_errors = parse_or("MAX_ERRORS", get("MAX_ERRORS"), 5u32)?;
        let error_window =
            Duration::from_secs(parse_or("ERROR_WINDOW", get("ERROR_WINDOW"), 300u64)?);

        let alert = match (
            get("TWILIO_ACCOUNT_SID"),
            get("TWILIO_AUTH_TOKEN"),
            get("TWILIO_PHONE_NUMBER"),
            get("ADMIN_PHONE_NUMBER"),
        ) {
            (Some(account_sid), Some(auth_token), Some(from_number), Some(to_number)) => {
                Some(AlertCredentials {
                    account_sid,
                    auth_token,
                    from_number,
                    to_number,
                })
            }
            _ => None,
        };

        Ok(Self {
            bot_token,
            banned_sticker_sets,
            log_level,
            deletion_delay,
            keepalive_port,
            permission_cache_ttl,
            max_errors,
            error_window,
            alert,
        })
    }
}

/// Split a comma-separated list, dropping blank entries.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Accepts tracing level names plus the `WARNING`/`CRITICAL` spellings.
fn normalize_log_level(raw: &str) -> Option<String> {
    let level = match raw.to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" | "warning" => "warn",
        "error" | "critical" | "fatal" => "error",
        _ => return None,
    };
    Some(level.to_string())
}

/// Parse fractional seconds such as `0.1`.
fn parse_seconds(raw: &str) -> Option<Duration> {
    let secs: f64 = raw.parse().ok()?;
    // Rejects negative, NaN, infinite and overflowing values.
    Duration::try_from_secs_f64(secs).ok()
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
