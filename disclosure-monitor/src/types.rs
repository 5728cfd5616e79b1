use serde::{Deserialize, Serialize};
// Use the interfaces crate for core types
pub use interfaces::defs::{Digest, DisclosureRecord, Extractor, Notifier, TransactionKind};
pub use interfaces::error::{MonitorError, Result};
pub use interfaces::state::{MemorySeenStore, SeenSet, SeenStore};

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_seconds: u64,
    pub max_page_size_mb: usize,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            // Both sources serve a reduced page to non-browser agents
            user_agent: "Mozilla/5.0".to_string(),
            timeout_seconds: 20,
            max_retries: 2,
            retry_delay_seconds: 2,
            max_page_size_mb: 10,
            max_redirects: 5,
        }
    }
}

/// Which records get emailed once at least one new record exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum ScopePolicy {
    /// Send the whole recency window, mark only the new records as seen.
    #[value(name = "all-recent")]
    AllRecentOnAnyNew,
    /// Send only the records not seen before.
    #[value(name = "new-only")]
    NewOnly,
}

impl Default for ScopePolicy {
    fn default() -> Self {
        ScopePolicy::AllRecentOnAnyNew
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum KindFilter {
    Any,
    Purchase,
    Sale,
}

impl KindFilter {
    pub fn accepts(&self, kind: &TransactionKind) -> bool {
        match self {
            KindFilter::Any => true,
            KindFilter::Purchase => *kind == TransactionKind::Purchase,
            KindFilter::Sale => *kind == TransactionKind::Sale,
        }
    }
}

/// Outcome of one source run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    NoNewRecords,
    Notified,
    /// Digest was produced but the seen-set was left as-is.
    DryRun,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub source_id: String,
    pub fetched: usize,
    pub recent: usize,
    pub new: usize,
    pub notified: usize,
    pub outcome: RunOutcome,
}

impl std::fmt::Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.outcome {
            RunOutcome::NoNewRecords => write!(
                f,
                "{}: no new records ({} recent)",
                self.source_id, self.recent
            ),
            RunOutcome::Notified => write!(
                f,
                "{}: emailed {} records ({} new)",
                self.source_id, self.notified, self.new
            ),
            RunOutcome::DryRun => write!(
                f,
                "{}: dry run, would email {} records ({} new)",
                self.source_id, self.notified, self.new
            ),
        }
    }
}
