use crate::parser::amount_floor;
use crate::types::{DisclosureRecord, KindFilter};
use chrono::{Duration, NaiveDate};
use tracing::debug;

/// Source-specific pre-filter applied before the recency window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFilter {
    pub kind: KindFilter,
    pub min_amount: Option<i64>,
}

impl Default for RecordFilter {
    fn default() -> Self {
        Self {
            kind: KindFilter::Any,
            min_amount: None,
        }
    }
}

impl RecordFilter {
    pub fn new(kind: KindFilter, min_amount: Option<i64>) -> Self {
        Self { kind, min_amount }
    }

    pub fn accepts(&self, record: &DisclosureRecord) -> bool {
        if !self.kind.accepts(&record.transaction_kind) {
            return false;
        }

        match self.min_amount {
            None => true,
            Some(threshold) => match record.amount.as_deref().and_then(amount_floor) {
                Some(floor) => floor >= threshold,
                None => {
                    debug!(
                        "Dropping {} ({}): amount {:?} has no numeric floor",
                        record.subject_name, record.subject_id, record.amount
                    );
                    false
                }
            },
        }
    }

    pub fn apply(&self, records: Vec<DisclosureRecord>) -> Vec<DisclosureRecord> {
        records.into_iter().filter(|record| self.accepts(record)).collect()
    }
}

/// Keep records filed on or after `today - window_days`. Undated records are
/// dropped without error.
pub fn within_window(
    records: Vec<DisclosureRecord>,
    today: NaiveDate,
    window_days: u32,
) -> Vec<DisclosureRecord> {
    // A window reaching past the earliest representable date has no lower bound
    let cutoff = today.checked_sub_signed(Duration::days(i64::from(window_days)));

    records
        .into_iter()
        .filter(|record| match record.filed_date {
            Some(filed) => cutoff.map_or(true, |cutoff| filed >= cutoff),
            None => {
                debug!(
                    "Dropping undated record {} ({}): filed {:?}",
                    record.subject_name, record.subject_id, record.filed_raw
                );
                false
            }
        })
        .collect()
}
