use crate::digest::DigestComposer;
use crate::filter::{within_window, RecordFilter};
use crate::identity::identity_key;
use crate::types::{
    DisclosureRecord, Extractor, Notifier, Result, RunOutcome, RunReport, ScopePolicy, SeenSet,
    SeenStore,
};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, Instrument};

/// One monitored source: where records come from, where its seen-set lives,
/// how its records are pre-filtered and how its digest is titled.
pub struct SourceJob {
    pub extractor: Box<dyn Extractor>,
    pub store: Arc<dyn SeenStore>,
    pub filter: RecordFilter,
    pub composer: DigestComposer,
}

impl SourceJob {
    pub fn source_id(&self) -> &str {
        self.extractor.source_id()
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub window_days: u32,
    pub scope: ScopePolicy,
    /// Compose and hand off the digest but never commit the seen-set.
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            window_days: 7,
            scope: ScopePolicy::default(),
            dry_run: false,
        }
    }
}

/// Recent records split by whether their identity key was already reported.
#[derive(Debug, Default)]
pub struct Partition {
    /// Every recent record, one per identity key, in source order.
    pub recent: Vec<DisclosureRecord>,
    pub new: Vec<DisclosureRecord>,
    pub new_keys: Vec<String>,
}

impl Partition {
    /// Records the digest should carry under `policy`.
    pub fn scope(&self, policy: ScopePolicy) -> &[DisclosureRecord] {
        match policy {
            ScopePolicy::AllRecentOnAnyNew => &self.recent,
            ScopePolicy::NewOnly => &self.new,
        }
    }
}

/// Key every record and split into seen/new. A key repeated within the batch
/// counts once; the first occurrence wins.
pub fn partition(source_id: &str, records: Vec<DisclosureRecord>, seen: &SeenSet) -> Partition {
    let mut batch_keys = HashSet::new();
    let mut result = Partition::default();

    for record in records {
        let key = identity_key(source_id, &record);
        if !batch_keys.insert(key.clone()) {
            debug!("Duplicate row within batch: {}", key);
            continue;
        }
        if !seen.contains(&key) {
            result.new.push(record.clone());
            result.new_keys.push(key);
        }
        result.recent.push(record);
    }

    result
}

/// Runs sources through extract, filter, partition, notify, commit.
pub struct MonitorPipeline {
    notifier: Arc<dyn Notifier>,
    options: RunOptions,
}

impl MonitorPipeline {
    pub fn new(notifier: Arc<dyn Notifier>, options: RunOptions) -> Self {
        Self { notifier, options }
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// One run for one source. Any error aborts before the seen-set is touched;
    /// the seen-set is committed only after the notifier accepted the digest.
    pub async fn run_source(&self, job: &SourceJob, today: NaiveDate) -> Result<RunReport> {
        let source_id = job.source_id().to_string();
        info!("Running source {}", job.extractor.source_name());

        let records = job.extractor.extract().await?;
        let fetched = records.len();

        let candidates = job.filter.apply(records);
        let recent = within_window(candidates, today, self.options.window_days);
        debug!(
            "{} fetched, {} within the last {} days",
            fetched,
            recent.len(),
            self.options.window_days
        );

        let seen = job.store.load();
        let split = partition(&source_id, recent, &seen);

        let mut report = RunReport {
            source_id,
            fetched,
            recent: split.recent.len(),
            new: split.new.len(),
            notified: 0,
            outcome: RunOutcome::NoNewRecords,
        };

        if split.new.is_empty() {
            info!("No new records ({} recent already reported)", report.recent);
            return Ok(report);
        }

        let scoped = split.scope(self.options.scope);
        let digest = job.composer.compose(scoped);
        self.notifier.notify(&digest).await?;
        report.notified = scoped.len();

        if self.options.dry_run {
            info!("Dry run: leaving seen-set untouched ({} new keys)", split.new_keys.len());
            report.outcome = RunOutcome::DryRun;
            return Ok(report);
        }

        job.store.commit(&split.new_keys, &seen)?;
        report.outcome = RunOutcome::Notified;
        info!("Notified {} records ({} new)", report.notified, report.new);
        Ok(report)
    }

    /// Run every job in turn. Each is its own failure domain: an error in one
    /// is logged and returned, and the remaining jobs still run and commit.
    pub async fn run_all(&self, jobs: &[SourceJob], today: NaiveDate) -> Vec<(String, Result<RunReport>)> {
        let mut results = Vec::with_capacity(jobs.len());

        for job in jobs {
            let source_id = job.source_id().to_string();
            let span = info_span!("source", id = %source_id);
            let result = self.run_source(job, today).instrument(span).await;
            if let Err(e) = &result {
                error!("Source {} failed: {}", source_id, e);
            }
            results.push((source_id, result));
        }

        results
    }
}
