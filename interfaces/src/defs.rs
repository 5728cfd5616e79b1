use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::MonitorError;

/// Normalized classification of a disclosed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    Purchase,
    Sale,
    Other(String),
}

impl TransactionKind {
    /// Map a source label ("P - Purchase", "Sale (Partial)", "buy", ...) onto a kind.
    pub fn normalize(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();
        if lowered.contains("purchase") || lowered == "buy" || lowered == "p" {
            TransactionKind::Purchase
        } else if lowered.contains("sale") || lowered == "sell" || lowered == "s" {
            TransactionKind::Sale
        } else {
            TransactionKind::Other(lowered)
        }
    }

    pub fn label(&self) -> &str {
        match self {
            TransactionKind::Purchase => "purchase",
            TransactionKind::Sale => "sale",
            TransactionKind::Other(label) => label,
        }
    }
}

/// One reported transaction event pulled from a public source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisclosureRecord {
    pub filed_date: Option<NaiveDate>,
    pub filed_raw: String,
    pub subject_name: String,
    pub subject_id: String,
    pub subject_meta: Vec<(String, String)>,
    pub transaction_kind: TransactionKind,
    pub amount: Option<String>,
    pub display_fields: Vec<(String, String)>,
    /// Extra immutable fields a source needs to tell apart events that share
    /// subject, ticker, filing day and kind. Appended to the identity key.
    #[serde(default)]
    pub event_detail: Vec<String>,
}

impl DisclosureRecord {
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.subject_meta
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A composed notification ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub subject: String,
    pub body: String,
    pub record_count: usize,
}

// Object style note:
// Extractors and notifiers are collaborators of the pipeline. Each source gets
// its own Extractor implementation; the pipeline never branches on source.

#[async_trait]
pub trait Extractor: Send + Sync {
    /// Stable identifier, also used to scope identity keys.
    fn source_id(&self) -> &str;

    /// Human-readable name for logs.
    fn source_name(&self) -> String;

    /// Pull the full current snapshot. Fails as a whole, never partially.
    async fn extract(&self) -> Result<Vec<DisclosureRecord>, MonitorError>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver the digest. `Ok` means the transport accepted it.
    async fn notify(&self, digest: &Digest) -> Result<(), MonitorError>;
}
