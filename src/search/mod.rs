//! # Search
//!
//! Everything around a strategy: its configuration, the per-run fitness
//! evaluator, the launcher that drives runs, and the results it returns.
//!
//! ## Example
//!
//! ```rust
//! use queensearch::search::{run_search, SearchConfig};
//! use queensearch::strategy::StrategyKind;
//!
//! let config = SearchConfig::builder(6).seed(7).max_iterations(100).build().unwrap();
//! let results = run_search(StrategyKind::SiteSearch, &config, None, 3).unwrap();
//!
//! assert_eq!(results.runs().len(), 3);
//! assert!(results.solutions().all(|board| board.is_valid()));
//! ```

pub mod config;
pub mod evaluator;
pub mod launcher;
pub mod result;

pub use config::{
    ConstructionParams, GeneticParams, LogLevel, Preset, SearchConfig, SearchConfigBuilder,
    SiteSearchParams, SwarmParams, MIN_BOARD_SIZE,
};
pub use evaluator::FitnessEvaluator;
pub use launcher::{run_search, SearchLauncher};
pub use result::{ResultSet, RunResult};
