pub mod types;
pub mod config;
pub mod fetcher;
pub mod parser;
pub mod filter;
pub mod identity;
pub mod state;
pub mod digest;
pub mod notifier;
pub mod pipeline;
pub mod sources;

pub use types::*;
pub use config::{MonitorConfig, SourceKind};
pub use fetcher::Fetcher;
pub use filter::{within_window, RecordFilter};
pub use identity::{identity_key, IdentityKey};
pub use state::JsonFileSeenStore;
pub use digest::DigestComposer;
pub use notifier::StdoutNotifier;
pub use pipeline::{partition, MonitorPipeline, Partition, RunOptions, SourceJob};
