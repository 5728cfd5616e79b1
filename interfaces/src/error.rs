use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("Fetch error for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unparseable filed date: {raw:?}")]
    DateParse { raw: String },

    #[error("Notification failed: {0}")]
    Notify(String),

    #[error("Seen-set unreadable at {}: {reason}", path.display())]
    StoreRead { path: PathBuf, reason: String },

    #[error("Seen-set commit failed at {}: {source}", path.display())]
    StoreWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MonitorError>;
