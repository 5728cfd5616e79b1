use crate::types::{FetchConfig, MonitorError, Result};
use backoff::{backoff::Backoff, exponential::ExponentialBackoff};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| MonitorError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// GET `url` and return the body text. Transport failures are retried with
    /// exponential backoff up to `max_retries` times; a 4xx is returned at once.
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        let start_time = Instant::now();
        debug!("Fetching page: {}", url);

        let mut backoff: ExponentialBackoff<backoff::SystemClock> = ExponentialBackoff {
            current_interval: Duration::from_secs(self.config.retry_delay_seconds),
            initial_interval: Duration::from_secs(self.config.retry_delay_seconds),
            max_interval: Duration::from_secs(self.config.retry_delay_seconds * 8),
            multiplier: 2.0,
            // Attempts are bounded by max_retries, not elapsed time
            max_elapsed_time: None,
            ..Default::default()
        };

        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match self.fetch_once(url).await {
                Ok(content) => {
                    info!(
                        "Fetched {} ({} bytes in {}ms)",
                        url,
                        content.len(),
                        start_time.elapsed().as_millis()
                    );
                    return Ok(content);
                }
                Err(FetchFailure::Permanent(e)) => return Err(e),
                Err(FetchFailure::Transient(e)) => {
                    last_error = Some(e);
                    if attempt < self.config.max_retries {
                        if let Some(delay) = backoff.next_backoff() {
                            warn!("Attempt {} failed for {}, retrying in {:?}", attempt + 1, url, delay);
                            tokio::time::sleep(delay).await;
                            continue;
                        }
                    }
                    break;
                }
            }
        }

        Err(last_error.unwrap_or_else(|| fetch_error(url, "Unknown error")))
    }

    async fn fetch_once(&self, url: &str) -> std::result::Result<String, FetchFailure> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchFailure::Transient(fetch_error(url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let error = fetch_error(
                url,
                format!("HTTP {}: {}", status.as_u16(), status.canonical_reason().unwrap_or("Unknown")),
            );
            return Err(if status.is_client_error() {
                FetchFailure::Permanent(error)
            } else {
                FetchFailure::Transient(error)
            });
        }

        if let Some(content_length) = response.content_length() {
            let size_mb = content_length as usize / (1024 * 1024);
            if size_mb > self.config.max_page_size_mb {
                return Err(FetchFailure::Permanent(fetch_error(
                    url,
                    format!("Page too large: {}MB", size_mb),
                )));
            }
        }

        response
            .text()
            .await
            .map_err(|e| FetchFailure::Transient(fetch_error(url, e)))
    }
}

enum FetchFailure {
    Transient(MonitorError),
    Permanent(MonitorError),
}

fn fetch_error(url: &str, reason: impl ToString) -> MonitorError {
    MonitorError::Fetch {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}
