use crate::parser::clean_text;
use crate::types::DisclosureRecord;

/// Composite identity of a disclosure event, built only from fields that do
/// not change between scrapes of the same event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    fields: Vec<String>,
}

impl IdentityKey {
    pub fn for_record(source_id: &str, record: &DisclosureRecord) -> Self {
        let filed = match record.filed_date {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => record.filed_raw.trim().to_string(),
        };

        let mut fields = vec![
            source_id.to_string(),
            clean_text(&record.subject_name),
            clean_text(&record.subject_id).to_uppercase(),
            filed,
            record.transaction_kind.label().to_string(),
        ];
        fields.extend(record.event_detail.iter().map(|detail| clean_text(detail)));

        Self { fields }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Stored form: a JSON array of the fields. String escaping keeps the
    /// encoding injective whatever characters the fields contain.
    pub fn encode(&self) -> String {
        serde_json::to_string(&self.fields).unwrap_or_else(|_| self.fields.join("\u{1f}"))
    }
}

impl std::fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Stored key string for `record` under `source_id`.
pub fn identity_key(source_id: &str, record: &DisclosureRecord) -> String {
    IdentityKey::for_record(source_id, record).encode()
}
