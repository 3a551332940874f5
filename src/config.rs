use clap::{Args, Parser, ValueEnum};
use ipnetwork::IpNetwork;
use std::time::Duration;

/// Value shipped in the sample environment file; treated the same as an unset key.
pub const RESEND_API_KEY_PLACEHOLDER: &str = "your_resend_api_key_here";

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub rate_limit: RateLimitConfig,

    #[command(flatten)]
    pub form: FormConfig,

    #[command(flatten)]
    pub mail: MailConfig,

    #[command(flatten)]
    pub delivery: DeliveryConfig,

    #[command(flatten)]
    pub resend: ResendConfig,

    #[command(flatten)]
    pub smtp: SmtpConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "CONTACT_RELAY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port for the public API
    #[arg(long, env = "CONTACT_RELAY_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Port for the management server (health probes)
    #[arg(long, env = "CONTACT_RELAY_MGMT_PORT", default_value_t = 9090)]
    pub mgmt_port: u16,

    /// Seconds to wait for in-flight work after a shutdown signal
    #[arg(long, env = "CONTACT_RELAY_SHUTDOWN_TIMEOUT_SECS", default_value_t = 5)]
    pub shutdown_timeout_secs: u64,

    /// Comma-separated list of CIDRs to trust for X-Forwarded-For IP extraction
    #[arg(
        long,
        env = "CONTACT_RELAY_TRUSTED_PROXIES",
        default_value = "10.0.0.0/8,172.16.0.0/12,192.168.0.0/16,127.0.0.1/32",
        value_delimiter = ','
    )]
    pub trusted_proxies: Vec<IpNetwork>,
}

#[derive(Clone, Debug, Args)]
pub struct RateLimitConfig {
    /// Sustained submissions per minute allowed from one client IP
    #[arg(
        long = "rate-limit-per-minute",
        env = "CONTACT_RELAY_RATE_LIMIT_PER_MINUTE",
        default_value_t = 6,
        value_parser = clap::value_parser!(u32).range(1..=60_000)
    )]
    pub per_minute: u32,

    /// Burst allowance per client IP
    #[arg(long = "rate-limit-burst", env = "CONTACT_RELAY_RATE_LIMIT_BURST", default_value_t = 3)]
    pub burst: u32,
}

#[derive(Clone, Debug, Args)]
pub struct FormConfig {
    /// Maximum length of the inquiry message, in characters
    #[arg(long, env = "CONTACT_RELAY_MAX_MESSAGE_CHARS", default_value_t = 500)]
    pub max_message_chars: usize,
}

#[derive(Clone, Debug, Args)]
pub struct MailConfig {
    /// Address that receives every notification
    #[arg(long, env = "CONTACT_RELAY_RECIPIENT")]
    pub recipient: String,

    /// Sender identity used by the HTTP email API
    #[arg(long, env = "CONTACT_RELAY_SENDER", default_value = "AI House Dev <noreply@aihousedev.com>")]
    pub sender: String,

    /// Brand name used in the subject line and footer
    #[arg(long, env = "CONTACT_RELAY_BRAND", default_value = "AI House Dev")]
    pub brand: String,
}

#[derive(Clone, Debug, Args)]
pub struct DeliveryConfig {
    /// Upper bound for a single transport attempt, in milliseconds
    #[arg(long, env = "CONTACT_RELAY_ATTEMPT_TIMEOUT_MS", default_value_t = 15_000)]
    pub attempt_timeout_ms: u64,
}

impl DeliveryConfig {
    #[must_use]
    pub const fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }
}

#[derive(Clone, Debug, Args)]
pub struct ResendConfig {
    /// API key for the HTTP email API
    #[arg(long, env = "CONTACT_RELAY_RESEND_API_KEY")]
    pub resend_api_key: Option<String>,

    /// Endpoint that accepts outgoing emails
    #[arg(long, env = "CONTACT_RELAY_RESEND_API_URL", default_value = "https://api.resend.com/emails")]
    pub resend_api_url: String,

    /// Request timeout for the HTTP email API, in milliseconds
    #[arg(long, env = "CONTACT_RELAY_RESEND_TIMEOUT_MS", default_value_t = 10_000)]
    pub resend_timeout_ms: u64,
}

impl ResendConfig {
    /// Returns the API key if one is set and is not the sample placeholder.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.resend_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != RESEND_API_KEY_PLACEHOLDER)
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }
}

#[derive(Clone, Debug, Args)]
pub struct SmtpConfig {
    /// Relay account identity (also used as the sender address)
    #[arg(long, env = "CONTACT_RELAY_SMTP_USERNAME")]
    pub smtp_username: Option<String>,

    /// App-specific password for the relay account; whitespace is ignored
    #[arg(long, env = "CONTACT_RELAY_SMTP_APP_PASSWORD")]
    pub smtp_app_password: Option<String>,

    /// Relay host; derived from the account domain when unset
    #[arg(long, env = "CONTACT_RELAY_SMTP_HOST")]
    pub smtp_host: Option<String>,

    /// Relay port
    #[arg(long, env = "CONTACT_RELAY_SMTP_PORT", default_value_t = 465)]
    pub smtp_port: u16,

    /// Connection security; implicit TLS on port 465 and STARTTLS elsewhere when unset
    #[arg(long, env = "CONTACT_RELAY_SMTP_SECURITY", value_enum)]
    pub smtp_security: Option<SmtpSecurity>,

    /// Connection and command timeout for the relay, in milliseconds
    #[arg(long, env = "CONTACT_RELAY_SMTP_TIMEOUT_MS", default_value_t = 10_000)]
    pub smtp_timeout_ms: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SmtpSecurity {
    /// TLS from the first byte
    Implicit,
    /// Plain connection upgraded with STARTTLS, which the relay must offer
    Starttls,
    /// No encryption; only for relays on a trusted local network
    Plain,
}

impl SmtpConfig {
    #[must_use]
    pub fn security(&self) -> SmtpSecurity {
        match self.smtp_security {
            Some(security) => security,
            None if self.smtp_port == 465 => SmtpSecurity::Implicit,
            None => SmtpSecurity::Starttls,
        }
    }

    /// Returns the account identity and the whitespace-stripped app password
    /// when both are present.
    #[must_use]
    pub fn credentials(&self) -> Option<(String, String)> {
        let username = self.smtp_username.as_deref().map(str::trim).filter(|u| !u.is_empty())?;
        let password: String = self
            .smtp_app_password
            .as_deref()?
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        if password.is_empty() {
            return None;
        }

        Some((username.to_string(), password))
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.credentials().is_some()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// OTLP collector endpoint; exporting is disabled when unset
    #[arg(long, env = "CONTACT_RELAY_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    /// Log output format
    #[arg(long, env = "CONTACT_RELAY_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}
