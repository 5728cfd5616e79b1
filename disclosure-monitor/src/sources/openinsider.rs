use crate::fetcher::Fetcher;
use crate::parser::{clean_text, parse_filed_date};
use crate::types::{DisclosureRecord, Extractor, MonitorError, Result, TransactionKind};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use tracing::{debug, info};

pub const OPENINSIDER_SOURCE_ID: &str = "openinsider";

/// Screener for filings of the last year with value of at least $10k, newest first.
pub const OPENINSIDER_DEFAULT_URL: &str = "http://openinsider.com/screener?s=&o=&pl=&ph=&ll=&lh=&fd=365&fdr=&td=0&tdr=&fdlyl=&fdlyh=&daysago=&xp=1&vl=10000&vh=&ocl=&och=&sic1=-1&sicl=100&sich=9999&grp=0&nfl=&nfh=&nil=&nih=&nol=&noh=&v2l=&v2h=&oc2l=&oc2h=&sortcol=0&cnt=1000&page=1";

/// Insider transactions from the OpenInsider screener table.
pub struct OpenInsiderSource {
    url: String,
    fetcher: Arc<Fetcher>,
}

impl OpenInsiderSource {
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
impl Extractor for OpenInsiderSource {
    fn source_id(&self) -> &str {
        OPENINSIDER_SOURCE_ID
    }

    fn source_name(&self) -> String {
        "OpenInsider screener".to_string()
    }

    async fn extract(&self) -> Result<Vec<DisclosureRecord>> {
        info!("Pulling OpenInsider screener: {}", self.url);
        let html = self.fetcher.fetch_page(&self.url).await?;
        let records = parse_screener(&html)?;
        info!("Extracted {} rows from OpenInsider", records.len());
        Ok(records)
    }
}

const FILED_HEADERS: &[&str] = &["Filing Date", "Filed"];
const TICKER_HEADERS: &[&str] = &["Ticker"];
const TRADE_TYPE_HEADERS: &[&str] = &["Trade Type"];
const INSIDER_HEADERS: &[&str] = &["Insider Name", "Insider"];
const COMPANY_HEADERS: &[&str] = &["Company Name", "Issuer Name", "Company"];

fn find_column(headers: &[String], names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|name| h.eq_ignore_ascii_case(name)))
}

/// Column positions, located by header text so added or reordered columns on
/// the page do not shift the fields we read.
#[derive(Debug)]
struct Columns {
    filed: usize,
    ticker: usize,
    insider: usize,
    trade_type: usize,
    trade_date: Option<usize>,
    company: Option<usize>,
    title: Option<usize>,
    price: Option<usize>,
    qty: Option<usize>,
    value: Option<usize>,
}

impl Columns {
    fn locate(headers: &[String]) -> Result<Self> {
        let require = |names: &[&str]| {
            find_column(headers, names).ok_or_else(|| {
                MonitorError::Parse(format!(
                    "OpenInsider table is missing the '{}' column (headers: {:?})",
                    names[0], headers
                ))
            })
        };

        Ok(Self {
            filed: require(FILED_HEADERS)?,
            ticker: require(TICKER_HEADERS)?,
            insider: require(INSIDER_HEADERS)?,
            trade_type: require(TRADE_TYPE_HEADERS)?,
            trade_date: find_column(headers, &["Trade Date"]),
            company: find_column(headers, COMPANY_HEADERS),
            title: find_column(headers, &["Title"]),
            price: find_column(headers, &["Price"]),
            qty: find_column(headers, &["Qty"]),
            value: find_column(headers, &["Value"]),
        })
    }

    fn required_width(&self) -> usize {
        [self.filed, self.ticker, self.insider, self.trade_type]
            .into_iter()
            .max()
            .unwrap_or(0)
            + 1
    }

    fn to_record(&self, cells: &[String]) -> DisclosureRecord {
        let cell = |index: Option<usize>| {
            index
                .and_then(|i| cells.get(i))
                .filter(|value| !value.is_empty())
                .cloned()
        };

        let filed_raw = cells[self.filed].clone();
        let filed_date = match parse_filed_date(&filed_raw) {
            Ok(date) => Some(date),
            Err(e) => {
                debug!("OpenInsider row: {}", e);
                None
            }
        };
        let ticker = cells[self.ticker].clone();
        let insider = cells[self.insider].clone();
        let trade_type = cells[self.trade_type].clone();
        let company = cell(self.company);
        let title = cell(self.title);
        let value = cell(self.value);
        let trade_date = cell(self.trade_date);

        // One insider can file several Form 4s for a ticker on the same day
        let event_detail = vec![filed_raw.clone(), trade_date.clone().unwrap_or_default()];

        let subject_meta: Vec<(String, String)> = [
            ("company", company.clone()),
            ("title", title.clone()),
            ("trade_date", trade_date),
            ("price", cell(self.price)),
            ("qty", cell(self.qty)),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), v)))
        .collect();

        let mut display_fields = vec![("Ticker".to_string(), ticker.clone())];
        if let Some(company) = &company {
            display_fields.push(("Company".to_string(), company.clone()));
        }
        display_fields.push(("Insider".to_string(), insider.clone()));
        if let Some(title) = &title {
            display_fields.push(("Title".to_string(), title.clone()));
        }
        display_fields.push(("Trade Type".to_string(), trade_type.clone()));
        if let Some(value) = &value {
            display_fields.push(("Value".to_string(), value.clone()));
        }
        display_fields.push(("Filed".to_string(), filed_raw.clone()));

        DisclosureRecord {
            filed_date,
            filed_raw,
            subject_name: insider,
            subject_id: ticker,
            subject_meta,
            transaction_kind: TransactionKind::normalize(&trade_type),
            amount: value,
            display_fields,
            event_detail,
        }
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| MonitorError::Parse(format!("Invalid selector '{}': {}", css, e)))
}

fn element_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<String>())
}

/// Parse the screener page into records. Fails if the results table or one of
/// its required columns is absent; short rows are skipped.
pub fn parse_screener(html: &str) -> Result<Vec<DisclosureRecord>> {
    let document = Html::parse_document(html);
    let table_selector = selector("table.tinytable")?;
    let header_selector = selector("th")?;
    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;

    let table = document
        .select(&table_selector)
        .next()
        .ok_or_else(|| MonitorError::Parse("OpenInsider results table (table.tinytable) not found".to_string()))?;

    let headers: Vec<String> = table.select(&header_selector).map(element_text).collect();
    let columns = Columns::locate(&headers)?;
    let width = columns.required_width();

    let mut records = Vec::new();
    for row in table.select(&row_selector) {
        let cells: Vec<String> = row.select(&cell_selector).map(element_text).collect();
        if cells.is_empty() {
            continue;
        }
        if cells.len() < width {
            debug!("Skipping short OpenInsider row ({} cells)", cells.len());
            continue;
        }
        records.push(columns.to_record(&cells));
    }

    Ok(records)
}
