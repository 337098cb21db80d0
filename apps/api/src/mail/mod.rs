//! Outbound email.
//!
//! A thin layer over [lettre](https://lettre.rs): [`Email`] describes a message,
//! [`Mailer`] sends it, and [`SmtpMailer`] is the production implementation.
//! Each sender identity gets its own `SmtpMailer`, built once at startup and
//! shared through `AppState`.

mod mailer;
mod message;

pub use mailer::{Mailer, MailerConfig, SmtpMailer, TlsMode};
pub use message::{Email, EmailAttachment};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Smtp(String),
}
