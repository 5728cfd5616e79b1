// Shared fixtures for the email-notifier tests
use email_notifier::{EmailNotifierConfig, SmtpTls};
use interfaces::defs::Digest;
use std::net::TcpListener;

pub const TEST_FROM: &str = "alerts@example.com";
pub const TEST_TO: &str = "investor@example.com";

pub fn sample_digest() -> Digest {
    Digest {
        subject: "New Congressional Trades ≥ $50,000 (2)".to_string(),
        body: "Legislator: Jane Doe (D - CA)\nTicker: NVDA\nTransaction: Purchase\nAmount: $50,001 - $100,000\nFiled: 2026-10-15\n\
               ----------------------------------------\n\
               Legislator: John Roe (R - TX)\nTicker: XOM\nTransaction: Sale\nAmount: $100,001 - $250,000\nFiled: 2026-10-14\n"
            .to_string(),
        record_count: 2,
    }
}

/// A localhost port with nothing listening on it.
pub fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    port
}

/// Plain-text relay on localhost, short timeout.
pub fn local_config(port: u16) -> EmailNotifierConfig {
    let mut config = EmailNotifierConfig::new(TEST_FROM, TEST_TO, "")
        .with_server("127.0.0.1", port, SmtpTls::None);
    config.timeout_seconds = 2;
    config
}
