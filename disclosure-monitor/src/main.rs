use anyhow::anyhow;
use chrono::Local;
use clap::Parser;
use disclosure_monitor::{Fetcher, MonitorConfig, MonitorPipeline, Notifier, StdoutNotifier};
use email_notifier::EmailNotifier;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries status lines and dry-run digests
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = MonitorConfig::parse();
    config.validate()?;

    info!(
        "Starting disclosure monitor: sources {:?}, {}-day window, scope {:?}",
        config.sources, config.window_days, config.scope
    );

    let notifier: Arc<dyn Notifier> = if config.dry_run {
        warn!("Dry run: digests go to stdout and seen-sets are not updated");
        Arc::new(StdoutNotifier)
    } else {
        Arc::new(EmailNotifier::new(config.email_config()?)?)
    };

    let fetcher = Arc::new(Fetcher::new(config.fetch_config())?);
    let jobs = config.build_jobs(fetcher);
    let pipeline = MonitorPipeline::new(notifier, config.run_options());

    let today = Local::now().date_naive();
    let results = pipeline.run_all(&jobs, today).await;
    let total = results.len();

    let mut failures = Vec::new();
    for (source_id, result) in results {
        match result {
            Ok(report) => println!("{}", report),
            Err(e) => {
                println!("{}: failed: {}", source_id, e);
                failures.push(format!("{}: {}", source_id, e));
            }
        }
    }

    if failures.is_empty() {
        info!("Disclosure monitor finished");
        Ok(())
    } else {
        Err(anyhow!(
            "{} of {} sources failed: {}",
            failures.len(),
            total,
            failures.join("; ")
        ))
    }
}
