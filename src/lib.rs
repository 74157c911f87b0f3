pub mod board;
pub mod error;
pub mod local_search;
pub mod rng;
pub mod search;
pub mod selection;
pub mod strategy;

// Re-export commonly used types for convenience
pub use board::{Board, Fitness, ScoredBoard};
pub use error::{OptionExt, QueensError, Result};
pub use search::{run_search, LogLevel, Preset, ResultSet, RunResult, SearchConfig, SearchLauncher};
pub use strategy::{SearchStrategy, StrategyKind};
