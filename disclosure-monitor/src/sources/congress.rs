use crate::fetcher::Fetcher;
use crate::parser::{clean_text, parse_filed_date};
use crate::types::{DisclosureRecord, Extractor, MonitorError, Result, TransactionKind};
use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

pub const CONGRESS_SOURCE_ID: &str = "congress";
pub const CONGRESS_DEFAULT_URL: &str = "https://www.quiverquant.com/congresstrading/";

const NUXT_STATE_PATTERN: &str = r"(?s)window\.__NUXT__\s*=\s*(\{.*?\});";

/// Congressional trades from the state blob embedded in the QuiverQuant page.
pub struct CongressTradesSource {
    url: String,
    fetcher: Arc<Fetcher>,
}

impl CongressTradesSource {
    pub fn new(url: impl Into<String>, fetcher: Arc<Fetcher>) -> Self {
        Self {
            url: url.into(),
            fetcher,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Extractor for CongressTradesSource {
    fn source_id(&self) -> &str {
        CONGRESS_SOURCE_ID
    }

    fn source_name(&self) -> String {
        "QuiverQuant congress trading".to_string()
    }

    async fn extract(&self) -> Result<Vec<DisclosureRecord>> {
        info!("Pulling congressional trades: {}", self.url);
        let page = self.fetcher.fetch_page(&self.url).await?;
        let records = parse_trades_page(&page)?;
        info!("Extracted {} congressional trades", records.len());
        Ok(records)
    }
}

/// Pull the `window.__NUXT__` object out of the page and read its trades.
pub fn parse_trades_page(page: &str) -> Result<Vec<DisclosureRecord>> {
    let pattern = Regex::new(NUXT_STATE_PATTERN)
        .map_err(|e| MonitorError::Parse(format!("Invalid state pattern: {}", e)))?;

    let blob = pattern
        .captures(page)
        .and_then(|captures| captures.get(1))
        .ok_or_else(|| MonitorError::Parse("Embedded page state (window.__NUXT__) not found".to_string()))?;

    let data: Value = serde_json::from_str(blob.as_str())
        .map_err(|e| MonitorError::Parse(format!("Embedded page state is not valid JSON: {}", e)))?;

    parse_trades_state(&data)
}

/// Find the first store in `state` that carries a `trades` array.
pub fn parse_trades_state(data: &Value) -> Result<Vec<DisclosureRecord>> {
    let state = data
        .get("state")
        .and_then(Value::as_object)
        .ok_or_else(|| MonitorError::Parse("Embedded page state has no 'state' object".to_string()))?;

    let trades = state
        .values()
        .filter_map(|store| store.get("trades"))
        .find_map(Value::as_array)
        .ok_or_else(|| MonitorError::Parse("Trade data not found in embedded state".to_string()))?;

    Ok(trades.iter().filter_map(trade_to_record).collect())
}

fn field(trade: &Value, key: &str) -> String {
    match trade.get(key) {
        Some(Value::String(s)) => clean_text(s),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn trade_to_record(trade: &Value) -> Option<DisclosureRecord> {
    if !trade.is_object() {
        debug!("Skipping non-object trade entry");
        return None;
    }

    let name = field(trade, "name");
    let party = field(trade, "party");
    let state = field(trade, "state");
    let ticker = field(trade, "ticker");
    let transaction = field(trade, "transaction");
    let amount = field(trade, "amount");
    let filed_raw = field(trade, "filed");

    let filed_date = match parse_filed_date(&filed_raw) {
        Ok(date) => Some(date),
        Err(e) => {
            debug!("Congress trade by {}: {}", name, e);
            None
        }
    };

    let display_fields = vec![
        ("Legislator".to_string(), format!("{} ({} - {})", name, party, state)),
        ("Ticker".to_string(), ticker.clone()),
        ("Transaction".to_string(), transaction.clone()),
        ("Amount".to_string(), amount.clone()),
        ("Filed".to_string(), filed_raw.clone()),
    ];

    Some(DisclosureRecord {
        filed_date,
        filed_raw,
        subject_name: name,
        subject_id: ticker,
        subject_meta: vec![
            ("party".to_string(), party),
            ("state".to_string(), state),
        ],
        transaction_kind: TransactionKind::normalize(&transaction),
        amount: if amount.is_empty() { None } else { Some(amount) },
        display_fields,
        event_detail: Vec::new(),
    })
}
