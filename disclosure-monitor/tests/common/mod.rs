// Shared fixtures for the disclosure-monitor integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use disclosure_monitor::parser::parse_filed_date;
use disclosure_monitor::{
    Digest, DigestComposer, DisclosureRecord, Extractor, MemorySeenStore, MonitorError, Notifier,
    RecordFilter, Result, SourceJob, TransactionKind,
};
use std::sync::{Arc, Mutex, Once};

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).expect("valid date")
}

pub fn days_ago(days: i64) -> String {
    (today() - chrono::Duration::days(days)).format("%Y-%m-%d").to_string()
}

/// A record shaped like the congress extractor's output.
pub fn record(name: &str, ticker: &str, filed: &str, transaction: &str, amount: &str) -> DisclosureRecord {
    DisclosureRecord {
        filed_date: parse_filed_date(filed).ok(),
        filed_raw: filed.to_string(),
        subject_name: name.to_string(),
        subject_id: ticker.to_string(),
        subject_meta: vec![("party".to_string(), "I".to_string())],
        transaction_kind: TransactionKind::normalize(transaction),
        amount: if amount.is_empty() { None } else { Some(amount.to_string()) },
        display_fields: vec![
            ("Legislator".to_string(), name.to_string()),
            ("Ticker".to_string(), ticker.to_string()),
            ("Amount".to_string(), amount.to_string()),
            ("Filed".to_string(), filed.to_string()),
        ],
        event_detail: Vec::new(),
    }
}

/// Extractor returning a fixed snapshot that tests can swap between runs.
pub struct StaticExtractor {
    id: String,
    snapshot: Mutex<Vec<DisclosureRecord>>,
}

impl StaticExtractor {
    pub fn new(id: &str, records: Vec<DisclosureRecord>) -> Self {
        Self {
            id: id.to_string(),
            snapshot: Mutex::new(records),
        }
    }
}

#[async_trait]
impl Extractor for StaticExtractor {
    fn source_id(&self) -> &str {
        &self.id
    }

    fn source_name(&self) -> String {
        format!("static source {}", self.id)
    }

    async fn extract(&self) -> Result<Vec<DisclosureRecord>> {
        Ok(self.snapshot.lock().expect("snapshot lock").clone())
    }
}

pub struct FailingExtractor {
    id: String,
}

impl FailingExtractor {
    pub fn new(id: &str) -> Self {
        Self { id: id.to_string() }
    }
}

#[async_trait]
impl Extractor for FailingExtractor {
    fn source_id(&self) -> &str {
        &self.id
    }

    fn source_name(&self) -> String {
        format!("failing source {}", self.id)
    }

    async fn extract(&self) -> Result<Vec<DisclosureRecord>> {
        Err(MonitorError::Fetch {
            url: format!("https://{}.invalid/", self.id),
            reason: "connection refused".to_string(),
        })
    }
}

/// Records every digest it is handed, and how many commits the watched store
/// had seen at that moment.
pub struct RecordingNotifier {
    sent: Mutex<Vec<Digest>>,
    commits_at_notify: Mutex<Vec<usize>>,
    watched_store: Option<Arc<MemorySeenStore>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            commits_at_notify: Mutex::new(Vec::new()),
            watched_store: None,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn watching(store: Arc<MemorySeenStore>) -> Self {
        Self {
            watched_store: Some(store),
            ..Self::new()
        }
    }

    pub fn sent(&self) -> Vec<Digest> {
        self.sent.lock().expect("sent lock").clone()
    }

    pub fn commits_at_notify(&self) -> Vec<usize> {
        self.commits_at_notify.lock().expect("commit lock").clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, digest: &Digest) -> Result<()> {
        if let Some(store) = &self.watched_store {
            self.commits_at_notify
                .lock()
                .expect("commit lock")
                .push(store.commit_count());
        }
        if self.fail {
            return Err(MonitorError::Notify("relay rejected the message".to_string()));
        }
        self.sent.lock().expect("sent lock").push(digest.clone());
        Ok(())
    }
}

pub fn job(extractor: impl Extractor + 'static, store: Arc<MemorySeenStore>) -> SourceJob {
    SourceJob {
        extractor: Box::new(extractor),
        store,
        filter: RecordFilter::default(),
        composer: DigestComposer::new("Test Digest"),
    }
}
