pub mod collector;
pub mod config;
pub mod error;
pub mod folders;
pub mod scanner;
pub mod session;
pub mod store;
pub mod writer;

pub use collector::{
    CollectedFile, CollectionSummary, Collector, CollectorStatus, OutputTarget, RefreshSignal,
};
pub use config::{
    CollectionConfig, FilterUpdate, Settings, parse_extensions, parse_list, parse_max_size_mb,
};
pub use error::{AppError, Result};
pub use folders::{FolderSource, WorkspaceFolders};
pub use scanner::scan;
pub use session::{Notifier, Session, notify_collection};
pub use store::{ConfigStore, JsonFileStore, KeyValueStore, LAST_USED_CONFIG_KEY, MemoryStore};
pub use writer::{SkippedFile, WriteReport};
