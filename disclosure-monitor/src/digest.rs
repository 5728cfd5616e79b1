use crate::types::{Digest, DisclosureRecord};
use tracing::debug;

const RECORD_SEPARATOR: &str = "----------------------------------------";
const EMPTY_BODY: &str = "No disclosures to report.\n";

/// Renders a batch of records into a plain-text digest. Pure formatting: the
/// caller decides which records belong in it.
pub struct DigestComposer {
    title: String,
}

impl DigestComposer {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn compose(&self, records: &[DisclosureRecord]) -> Digest {
        debug!("Composing digest '{}' for {} records", self.title, records.len());

        Digest {
            subject: format!("{} ({})", self.title, records.len()),
            body: compose_body(records),
            record_count: records.len(),
        }
    }
}

fn compose_body(records: &[DisclosureRecord]) -> String {
    if records.is_empty() {
        return EMPTY_BODY.to_string();
    }

    let mut body = String::new();
    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            body.push_str(RECORD_SEPARATOR);
            body.push('\n');
        }
        for (label, value) in &record.display_fields {
            body.push_str(&format!("{}: {}\n", label, value));
        }
    }
    body
}
