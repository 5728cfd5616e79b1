use crate::types::{Digest, MonitorError, Notifier, Result};
use async_trait::async_trait;
use std::io::Write;

/// Prints digests to stdout instead of sending them. Used for dry runs.
pub struct StdoutNotifier;

#[async_trait]
impl Notifier for StdoutNotifier {
    async fn notify(&self, digest: &Digest) -> Result<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "Subject: {}\n\n{}", digest.subject, digest.body)
            .and_then(|_| out.flush())
            .map_err(|e| MonitorError::Notify(format!("stdout: {}", e)))
    }
}
