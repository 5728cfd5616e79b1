use async_trait::async_trait;
use interfaces::defs::{Digest, Notifier};
use interfaces::error::{MonitorError, Result};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, info};
use url::Url;

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpTls {
    /// Plain connection upgraded with STARTTLS (port 587).
    StartTls,
    /// TLS from the first byte (port 465).
    Wrapper,
    /// No encryption. Local relays and test servers only.
    None,
}

impl FromStr for SmtpTls {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "starttls" => Ok(SmtpTls::StartTls),
            "wrapper" | "tls" | "ssl" => Ok(SmtpTls::Wrapper),
            "none" | "plain" => Ok(SmtpTls::None),
            other => Err(format!("unknown SMTP TLS mode '{}' (expected starttls, wrapper or none)", other)),
        }
    }
}

impl fmt::Display for SmtpTls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SmtpTls::StartTls => "starttls",
            SmtpTls::Wrapper => "wrapper",
            SmtpTls::None => "none",
        })
    }
}

#[derive(Clone)]
pub struct EmailNotifierConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub tls: SmtpTls,
    /// SMTP login; the sender address unless the relay wants something else.
    pub username: String,
    pub password: String,
    pub from_address: String,
    pub to_address: String,
    pub timeout_seconds: u64,
}

impl fmt::Debug for EmailNotifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailNotifierConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("tls", &self.tls)
            .field("username", &self.username)
            .field("password", &"***")
            .field("from_address", &self.from_address)
            .field("to_address", &self.to_address)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl EmailNotifierConfig {
    /// Gmail-style defaults: STARTTLS on smtp.gmail.com:587, logging in as the sender.
    pub fn new(from_address: &str, to_address: &str, password: &str) -> Self {
        Self {
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            tls: SmtpTls::StartTls,
            username: from_address.to_string(),
            password: password.to_string(),
            from_address: from_address.to_string(),
            to_address: to_address.to_string(),
            timeout_seconds: 30,
        }
    }

    pub fn with_server(mut self, host: &str, port: u16, tls: SmtpTls) -> Self {
        self.smtp_host = host.to_string();
        self.smtp_port = port;
        self.tls = tls;
        self
    }

    /// Parse the relay from a URI and combine it with the credentials.
    /// Expected URI format: smtp://[login@]host[:port][?tls=starttls|wrapper|none]
    /// `smtps://` implies `tls=wrapper` and port 465.
    pub fn from_uri(uri: &str, from_address: &str, to_address: &str, password: &str) -> Result<Self> {
        let parsed = Url::parse(uri)
            .map_err(|e| MonitorError::Config(format!("Invalid SMTP URI '{}': {}", uri, e)))?;

        let (default_tls, default_port) = match parsed.scheme() {
            "smtp" => (SmtpTls::StartTls, DEFAULT_SMTP_PORT),
            "smtps" => (SmtpTls::Wrapper, 465),
            other => {
                return Err(MonitorError::Config(format!(
                    "SMTP URI must use 'smtp://' or 'smtps://', got: {}",
                    other
                )))
            }
        };

        let host = parsed
            .host_str()
            .ok_or_else(|| MonitorError::Config(format!("No host specified in SMTP URI: {}", uri)))?;

        let tls = match parsed.query_pairs().find(|(key, _)| key == "tls") {
            Some((_, value)) => value.parse().map_err(MonitorError::Config)?,
            None => default_tls,
        };

        let mut config = Self::new(from_address, to_address, password).with_server(
            host,
            parsed.port().unwrap_or(default_port),
            tls,
        );

        let login = parsed.username();
        if !login.is_empty() {
            config.username = urlencoding::decode(login)
                .map_err(|e| MonitorError::Config(format!("SMTP login in URI is not valid UTF-8: {}", e)))?
                .into_owned();
        }

        Ok(config)
    }
}

/// Sends digests as plain-text email over SMTP.
pub struct EmailNotifier {
    config: EmailNotifierConfig,
    from: Mailbox,
    to: Mailbox,
}

impl EmailNotifier {
    pub fn new(config: EmailNotifierConfig) -> Result<Self> {
        let from = parse_mailbox("sender", &config.from_address)?;
        let to = parse_mailbox("recipient", &config.to_address)?;
        Ok(Self { config, from, to })
    }

    pub fn config(&self) -> &EmailNotifierConfig {
        &self.config
    }

    pub fn build_message(&self, digest: &Digest) -> Result<Message> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(digest.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(digest.body.clone())
            .map_err(|e| MonitorError::Notify(format!("Failed to build message: {}", e)))
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let host = self.config.smtp_host.as_str();
        let builder = match self.config.tls {
            SmtpTls::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host),
            SmtpTls::Wrapper => AsyncSmtpTransport::<Tokio1Executor>::relay(host),
            SmtpTls::None => Ok(AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)),
        }
        .map_err(|e| MonitorError::Notify(format!("SMTP setup failed: {}", e)))?;

        let builder = builder
            .port(self.config.smtp_port)
            .timeout(Some(Duration::from_secs(self.config.timeout_seconds)));

        let builder = if self.config.password.is_empty() {
            builder
        } else {
            builder.credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ))
        };

        Ok(builder.build())
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, digest: &Digest) -> Result<()> {
        let message = self.build_message(digest)?;
        let transport = self.transport()?;

        match transport.send(message).await {
            Ok(_) => {
                info!(
                    "Sent '{}' to {} via {}:{}",
                    digest.subject, self.config.to_address, self.config.smtp_host, self.config.smtp_port
                );
                Ok(())
            }
            Err(e) => {
                error!("SMTP delivery via {} failed: {}", self.config.smtp_host, e);
                Err(MonitorError::Notify(format!("SMTP delivery failed: {}", e)))
            }
        }
    }
}

fn parse_mailbox(role: &str, address: &str) -> Result<Mailbox> {
    address
        .parse()
        .map_err(|e| MonitorError::Config(format!("Invalid {} address '{}': {}", role, address, e)))
}
