pub mod email_notifier;

pub use email_notifier::{EmailNotifier, EmailNotifierConfig, SmtpTls, DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT};
