use crate::digest::DigestComposer;
use crate::fetcher::Fetcher;
use crate::filter::RecordFilter;
use crate::parser::format_thousands;
use crate::pipeline::{RunOptions, SourceJob};
use crate::sources::{
    CongressTradesSource, OpenInsiderSource, CONGRESS_DEFAULT_URL, OPENINSIDER_DEFAULT_URL,
};
use crate::state::JsonFileSeenStore;
use crate::types::{Extractor, FetchConfig, KindFilter, MonitorError, Result, ScopePolicy};
use clap::Parser;
use email_notifier::{EmailNotifierConfig, SmtpTls, DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum SourceKind {
    /// Insider transactions (OpenInsider screener)
    Openinsider,
    /// Congressional trades (QuiverQuant)
    Congress,
}

impl SourceKind {
    pub fn default_kind_filter(&self) -> KindFilter {
        match self {
            SourceKind::Openinsider => KindFilter::Purchase,
            SourceKind::Congress => KindFilter::Any,
        }
    }

    pub fn default_min_amount(&self) -> Option<i64> {
        match self {
            SourceKind::Openinsider => None,
            SourceKind::Congress => Some(50_000),
        }
    }

    pub fn seen_file_name(&self) -> &'static str {
        match self {
            SourceKind::Openinsider => "seen_trades.json",
            SourceKind::Congress => "seen_congress_trades.json",
        }
    }

    pub fn digest_title(&self, window_days: u32, kind: KindFilter, min_amount: Option<i64>) -> String {
        match self {
            SourceKind::Openinsider => {
                let what = match kind {
                    KindFilter::Purchase => "Insider Purchases",
                    KindFilter::Sale => "Insider Sales",
                    KindFilter::Any => "Insider Trades",
                };
                let mut title = format!("{} Filed in Last {} Days", what, window_days);
                if let Some(min) = min_amount {
                    title.push_str(&format!(" ≥ ${}", format_thousands(min)));
                }
                title
            }
            SourceKind::Congress => match min_amount {
                Some(min) => format!("New Congressional Trades ≥ ${}", format_thousands(min)),
                None => "New Congressional Trades".to_string(),
            },
        }
    }
}

/// Watch public disclosure listings and email what is new since the last run.
#[derive(Debug, Clone, Parser)]
#[command(name = "disclosure-monitor", version, about)]
pub struct MonitorConfig {
    /// Sources to poll, comma separated
    #[arg(long = "source", env = "MONITOR_SOURCES", value_enum, value_delimiter = ',',
          default_values_t = [SourceKind::Openinsider, SourceKind::Congress])]
    pub sources: Vec<SourceKind>,

    #[arg(long, env = "OPENINSIDER_URL", default_value = OPENINSIDER_DEFAULT_URL)]
    pub openinsider_url: String,

    #[arg(long, env = "CONGRESS_URL", default_value = CONGRESS_DEFAULT_URL)]
    pub congress_url: String,

    /// Trailing window, in days, a filing must fall in to be reported
    #[arg(long, env = "WINDOW_DAYS", default_value_t = 7)]
    pub window_days: u32,

    /// Minimum amount (lower bound of the range) in dollars; overrides the per-source default
    #[arg(long, env = "MIN_AMOUNT")]
    pub min_amount: Option<i64>,

    /// Transaction kind to keep; overrides the per-source default
    #[arg(long, env = "KIND_FILTER", value_enum)]
    pub kind: Option<KindFilter>,

    /// What to email once something new shows up
    #[arg(long, env = "NOTIFY_SCOPE", value_enum, default_value_t = ScopePolicy::AllRecentOnAnyNew)]
    pub scope: ScopePolicy,

    /// Directory holding the per-source seen-set files
    #[arg(long, env = "STATE_DIR", default_value = ".")]
    pub state_dir: PathBuf,

    #[arg(long, env = "EMAIL_FROM")]
    pub email_from: Option<String>,

    #[arg(long, env = "EMAIL_TO")]
    pub email_to: Option<String>,

    #[arg(long, env = "EMAIL_PASSWORD", hide_env_values = true)]
    pub email_password: Option<String>,

    #[arg(long, env = "SMTP_HOST", default_value = DEFAULT_SMTP_HOST)]
    pub smtp_host: String,

    #[arg(long, env = "SMTP_PORT", default_value_t = DEFAULT_SMTP_PORT)]
    pub smtp_port: u16,

    /// starttls, wrapper or none
    #[arg(long, env = "SMTP_TLS", default_value = "starttls")]
    pub smtp_tls: SmtpTls,

    /// smtp[s]://[login@]host[:port][?tls=...]; takes precedence over host/port/tls
    #[arg(long, env = "SMTP_URL")]
    pub smtp_url: Option<String>,

    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = 20)]
    pub fetch_timeout_secs: u64,

    #[arg(long, env = "FETCH_RETRIES", default_value_t = 2)]
    pub fetch_retries: u32,

    /// Print digests to stdout and leave the seen-sets untouched
    #[arg(long)]
    pub dry_run: bool,
}

impl MonitorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(MonitorError::Config("No sources selected".to_string()));
        }
        if self.window_days == 0 {
            return Err(MonitorError::Config("Window must be at least one day".to_string()));
        }
        for source in &self.sources {
            validate_endpoint(self.source_url(*source))?;
        }
        if !self.dry_run {
            self.email_config()?;
        }
        Ok(())
    }

    pub fn source_url(&self, source: SourceKind) -> &str {
        match source {
            SourceKind::Openinsider => &self.openinsider_url,
            SourceKind::Congress => &self.congress_url,
        }
    }

    pub fn record_filter(&self, source: SourceKind) -> RecordFilter {
        RecordFilter::new(
            self.kind.unwrap_or_else(|| source.default_kind_filter()),
            self.min_amount.or_else(|| source.default_min_amount()),
        )
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            timeout_seconds: self.fetch_timeout_secs,
            max_retries: self.fetch_retries,
            ..FetchConfig::default()
        }
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            window_days: self.window_days,
            scope: self.scope,
            dry_run: self.dry_run,
        }
    }

    pub fn email_config(&self) -> Result<EmailNotifierConfig> {
        let (from, to, password) = match (&self.email_from, &self.email_to, &self.email_password) {
            (Some(from), Some(to), Some(password)) => (from, to, password),
            _ => {
                return Err(MonitorError::Config(
                    "EMAIL_FROM, EMAIL_TO and EMAIL_PASSWORD are required unless --dry-run is set".to_string(),
                ))
            }
        };

        match &self.smtp_url {
            Some(uri) => EmailNotifierConfig::from_uri(uri, from, to, password),
            None => Ok(EmailNotifierConfig::new(from, to, password).with_server(
                &self.smtp_host,
                self.smtp_port,
                self.smtp_tls,
            )),
        }
    }

    /// One job per selected source, each with its own seen-set file.
    pub fn build_jobs(&self, fetcher: Arc<Fetcher>) -> Vec<SourceJob> {
        let mut selected = HashSet::new();

        self.sources
            .iter()
            .copied()
            .filter(|source| selected.insert(*source))
            .map(|source| {
                let url = self.source_url(source).to_string();
                let extractor: Box<dyn Extractor> = match source {
                    SourceKind::Openinsider => Box::new(OpenInsiderSource::new(url, fetcher.clone())),
                    SourceKind::Congress => Box::new(CongressTradesSource::new(url, fetcher.clone())),
                };
                let filter = self.record_filter(source);
                let title = source.digest_title(self.window_days, filter.kind, filter.min_amount);

                SourceJob {
                    extractor,
                    store: Arc::new(JsonFileSeenStore::new(self.state_dir.join(source.seen_file_name()))),
                    filter,
                    composer: DigestComposer::new(title),
                }
            })
            .collect()
    }
}

fn validate_endpoint(url: &str) -> Result<()> {
    let parsed = Url::parse(url)
        .map_err(|e| MonitorError::Config(format!("Invalid source URL '{}': {}", url, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(MonitorError::Config(format!(
            "Source URL '{}' must be http or https, got {}",
            url, other
        ))),
    }
}
