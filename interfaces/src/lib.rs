pub mod defs;
pub mod error;
pub mod state;

pub use defs::{Digest, DisclosureRecord, Extractor, Notifier, TransactionKind};
pub use error::{MonitorError, Result};
pub use state::{MemorySeenStore, SeenSet, SeenStore};
