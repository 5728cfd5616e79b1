use email_notifier::{EmailNotifier, EmailNotifierConfig};
use interfaces::defs::Notifier;
use interfaces::error::MonitorError;
use std::env;

mod common;
use common::{closed_port, local_config, sample_digest};

#[tokio::test]
async fn test_unreachable_relay_reports_notify_error() {
    let notifier = EmailNotifier::new(local_config(closed_port())).expect("valid config");

    let result = notifier.notify(&sample_digest()).await;

    match result {
        Err(MonitorError::Notify(message)) => assert!(message.contains("SMTP")),
        Err(other) => panic!("expected notify error, got {}", other),
        Ok(()) => panic!("delivery to a closed port cannot succeed"),
    }
}

/// Manual Gmail delivery test - IGNORED BY DEFAULT
///
/// Sends one sample digest through smtp.gmail.com with STARTTLS.
///
/// ## Setup Instructions:
///
/// 1. **Create App Password** (accounts with 2FA):
///    - Google Account → Security → 2-Step Verification → App passwords
///
/// 2. **Set Environment Variables**:
///    ```bash
///    export EMAIL_FROM="your-email@gmail.com"
///    export EMAIL_TO="where-alerts-go@example.com"
///    export EMAIL_PASSWORD="your-app-password"
///    ```
///
/// 3. **Run the test**:
///    ```bash
///    cargo test gmail_manual_delivery_test -- --ignored --nocapture
///    ```
#[tokio::test]
#[ignore = "Manual test - requires Gmail credentials"]
async fn gmail_manual_delivery_test() {
    let (from, to, password) = match (env::var("EMAIL_FROM"), env::var("EMAIL_TO"), env::var("EMAIL_PASSWORD")) {
        (Ok(from), Ok(to), Ok(password)) => (from, to, password),
        _ => panic!("Set EMAIL_FROM, EMAIL_TO and EMAIL_PASSWORD to run this test"),
    };

    let notifier = EmailNotifier::new(EmailNotifierConfig::new(&from, &to, &password)).expect("valid config");
    notifier
        .notify(&sample_digest())
        .await
        .expect("Gmail accepted the digest");

    println!("✓ Sample digest sent to {}", to);
}
