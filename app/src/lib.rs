pub mod logger;
pub mod session;
pub mod settings;
pub mod stats;
pub mod storage;

pub use session::{GameSession, GameSessionConfig};
pub use settings::{Settings, SettingsService};
pub use stats::{GameMode, GameStats, MatchRecord, MatchResult, StatsService, StatsTracker};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
