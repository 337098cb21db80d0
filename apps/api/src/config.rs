use anyhow::{Context, Result};

use crate::mail::{MailerConfig, TlsMode};

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_CORS_ORIGIN: &str = "https://pending-oo5r.onrender.com";
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 465;
const DEFAULT_SMTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_UPLOAD_DIR: &str = "./uploads";
/// 5 MiB, the largest résumé accepted.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub cors_origin: String,
    /// Sender identity for the applicant confirmation.
    pub applicant_mailer: MailerConfig,
    /// Sender identity for the administrator notification.
    pub admin_mailer: MailerConfig,
    pub admin_email: String,
    pub upload_dir: String,
    pub max_upload_bytes: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let smtp_host = optional_env("SMTP_HOST", DEFAULT_SMTP_HOST.to_string());
        let smtp_port = parse_env("SMTP_PORT", DEFAULT_SMTP_PORT)?;
        let smtp_tls: TlsMode = std::env::var("SMTP_TLS")
            .unwrap_or_else(|_| "tls".to_string())
            .parse()
            .context("SMTP_TLS must be one of 'tls', 'starttls' or 'none'")?;
        let smtp_timeout_secs = parse_env("SMTP_TIMEOUT_SECS", DEFAULT_SMTP_TIMEOUT_SECS)?;

        let smtp_account = |user_key: &str, pass_key: &str| -> Result<MailerConfig> {
            Ok(MailerConfig {
                host: smtp_host.clone(),
                port: smtp_port,
                username: require_env(user_key)?,
                password: require_env(pass_key)?,
                tls: smtp_tls,
                timeout_secs: smtp_timeout_secs,
            })
        };

        Ok(Config {
            port: parse_env("PORT", DEFAULT_PORT)?,
            cors_origin: optional_env("CORS_ORIGIN", DEFAULT_CORS_ORIGIN.to_string()),
            applicant_mailer: smtp_account("GMAIL_USER", "GMAIL_PASS")?,
            admin_mailer: smtp_account("GMAIL_USER2", "GMAIL_PASS2")?,
            admin_email: require_env("ADMIN_EMAIL")?,
            upload_dir: optional_env("UPLOAD_DIR", DEFAULT_UPLOAD_DIR.to_string()),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            rust_log: optional_env("RUST_LOG", "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|_| anyhow::anyhow!("{key} has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}
