//! # SearchConfig
//!
//! `SearchConfig` is the immutable parameter bundle a search consumes: board
//! size, run budget, stagnation handling, seeding, worker pool sizing, log
//! verbosity and the hyperparameters of every strategy.
//!
//! ## Example
//!
//! ```rust
//! use queensearch::search::{LogLevel, Preset, SearchConfig};
//! use queensearch::strategy::StrategyKind;
//!
//! // Fluent construction; `build` validates everything.
//! let config = SearchConfig::builder(8)
//!     .max_iterations(200)
//!     .stagnation_limit(30)
//!     .seed(42)
//!     .log_level(LogLevel::Minimal)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.board_size(), 8);
//!
//! // Named parameter sets.
//! let preset = SearchConfig::preset(12, StrategyKind::Genetic, Preset::Standard).unwrap();
//! assert_eq!(preset.genetic().population_size, 100);
//!
//! // Boards smaller than 4 are rejected.
//! assert!(SearchConfig::builder(3).build().is_err());
//! ```

use std::time::Duration;

use crate::error::{QueensError, Result};
use crate::local_search::Neighborhood;
use crate::strategy::StrategyKind;

/// Smallest board size the search accepts.
pub const MIN_BOARD_SIZE: usize = 4;

/// Verbosity of the tracing events a search emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LogLevel {
    /// Per-run outcomes, diversifications and per-iteration progress.
    Verbose,
    /// Per-run outcomes and diversifications.
    Minimal,
    None,
}

impl LogLevel {
    pub fn reports_runs(self) -> bool {
        !matches!(self, LogLevel::None)
    }

    pub fn reports_iterations(self) -> bool {
        matches!(self, LogLevel::Verbose)
    }
}

/// Named parameter sets of increasing effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Preset {
    Light,
    Standard,
    Intensive,
}

/// Ant colony hyperparameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstructionParams {
    /// Agents building a board per iteration.
    pub num_ants: usize,
    /// Fraction of pheromone removed per iteration, in `[0, 1]`.
    pub evaporation_rate: f64,
    /// Pheromone exponent.
    pub alpha: f64,
    /// Heuristic exponent.
    pub beta: f64,
    /// Added to an agent's cost before inverting it into a deposit.
    pub deposit_epsilon: f64,
    /// Refinement applied to the best agent of each iteration.
    pub neighborhood: Neighborhood,
}

impl Default for ConstructionParams {
    fn default() -> Self {
        Self {
            num_ants: 20,
            evaporation_rate: 0.1,
            alpha: 1.0,
            beta: 2.0,
            deposit_epsilon: 1e-5,
            neighborhood: Neighborhood::FullSwap,
        }
    }
}

/// Bee colony hyperparameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SiteSearchParams {
    /// Total number of sites kept by the colony.
    pub num_sites: usize,
    /// How many of the lowest-cost sites count as best sites.
    pub best_sites: usize,
    /// Bees recruited to each best site.
    pub bees_best: usize,
    /// Bees recruited to each other site.
    pub bees_other: usize,
    /// Starting neighborhood radius of a fresh site.
    pub initial_radius: usize,
    /// Multiplier applied to every radius during a shrink pass, in `(0, 1]`.
    pub shrink_factor: f64,
    /// A shrink pass runs every `shrink_interval` iterations.
    pub shrink_interval: usize,
    /// Sites whose cost stays above this after a fruitless exploration are abandoned.
    pub abandon_above: usize,
}

impl Default for SiteSearchParams {
    fn default() -> Self {
        Self {
            num_sites: 20,
            best_sites: 5,
            bees_best: 8,
            bees_other: 3,
            initial_radius: 3,
            shrink_factor: 0.8,
            shrink_interval: 10,
            abandon_above: 2,
        }
    }
}

/// Genetic algorithm hyperparameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneticParams {
    pub population_size: usize,
    /// Probability that a pair of parents is recombined, in `[0, 1]`.
    pub crossover_rate: f64,
    /// Per-position swap probability, in `[0, 1]`.
    pub mutation_rate: f64,
    /// Refinement applied to every individual each generation.
    pub neighborhood: Neighborhood,
}

impl Default for GeneticParams {
    fn default() -> Self {
        Self {
            population_size: 50,
            crossover_rate: 0.9,
            mutation_rate: 0.2,
            neighborhood: Neighborhood::FullSwap,
        }
    }
}

/// Particle swarm hyperparameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwarmParams {
    pub num_particles: usize,
    /// Inertia weight at the first iteration.
    pub inertia_start: f64,
    /// Inertia weight reached at the last iteration.
    pub inertia_end: f64,
    /// Pull towards the particle's own best position.
    pub cognitive: f64,
    /// Pull towards the swarm's best position.
    pub social: f64,
    /// Chance that a particle is reinitialized when the swarm stagnates.
    pub reinit_probability: f64,
}

impl Default for SwarmParams {
    fn default() -> Self {
        Self {
            num_particles: 50,
            inertia_start: 0.9,
            inertia_end: 0.4,
            cognitive: 1.2,
            social: 2.2,
            reinit_probability: 0.5,
        }
    }
}

/// Immutable configuration of a multi-run search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchConfig {
    board_size: usize,
    max_iterations: usize,
    stagnation_limit: usize,
    max_degenerate_retries: usize,
    seed: Option<u64>,
    time_limit: Option<Duration>,
    workers: Option<usize>,
    /// Minimum batch length evaluated on the worker pool
    parallel_threshold: usize,
    log_level: LogLevel,
    construction: ConstructionParams,
    site_search: SiteSearchParams,
    genetic: GeneticParams,
    swarm: SwarmParams,
}

impl SearchConfig {
    /// Returns a builder pre-filled with defaults for an `n`×`n` board.
    pub fn builder(board_size: usize) -> SearchConfigBuilder {
        SearchConfigBuilder {
            config: Self {
                board_size,
                max_iterations: 500,
                stagnation_limit: 50,
                max_degenerate_retries: 3,
                seed: None,
                time_limit: None,
                workers: None,
                parallel_threshold: 64,
                log_level: LogLevel::None,
                construction: ConstructionParams::default(),
                site_search: SiteSearchParams::default(),
                genetic: GeneticParams::default(),
                swarm: SwarmParams::default(),
            },
        }
    }

    /// Returns a validated named parameter set for `kind`.
    pub fn preset(board_size: usize, kind: StrategyKind, preset: Preset) -> Result<Self> {
        Self::preset_builder(board_size, kind, preset).build()
    }

    /// Like [`SearchConfig::preset`], but returns the builder for further tweaks.
    pub fn preset_builder(
        board_size: usize,
        kind: StrategyKind,
        preset: Preset,
    ) -> SearchConfigBuilder {
        let builder = Self::builder(board_size);
        match (kind, preset) {
            (StrategyKind::Construction, level) => {
                let (num_ants, iterations, evaporation_rate, beta) = match level {
                    Preset::Light => (10, 100, 0.1, 2.0),
                    Preset::Standard => (20, 200, 0.1, 2.0),
                    Preset::Intensive => (40, 400, 0.05, 3.0),
                };
                builder.max_iterations(iterations).construction(ConstructionParams {
                    num_ants,
                    evaporation_rate,
                    beta,
                    ..ConstructionParams::default()
                })
            }
            (StrategyKind::SiteSearch, level) => {
                let (num_sites, best_sites, bees_best, bees_other, iterations) = match level {
                    Preset::Light => (10, 3, 5, 2, 200),
                    Preset::Standard => (20, 5, 8, 3, 400),
                    Preset::Intensive => (40, 10, 10, 4, 800),
                };
                builder.max_iterations(iterations).site_search(SiteSearchParams {
                    num_sites,
                    best_sites,
                    bees_best,
                    bees_other,
                    ..SiteSearchParams::default()
                })
            }
            (StrategyKind::Genetic, level) => {
                let (population_size, iterations, crossover_rate, mutation_rate) = match level {
                    Preset::Light => (50, 500, 0.9, 0.2),
                    Preset::Standard => (100, 600, 0.8, 0.25),
                    Preset::Intensive => (150, 1500, 0.7, 0.3),
                };
                builder.max_iterations(iterations).genetic(GeneticParams {
                    population_size,
                    crossover_rate,
                    mutation_rate,
                    ..GeneticParams::default()
                })
            }
            (StrategyKind::Swarm, level) => {
                let (num_particles, iterations, inertia_start, cognitive, social) = match level {
                    Preset::Light => (50, 500, 0.9, 1.2, 2.2),
                    Preset::Standard => (100, 600, 0.8, 1.3, 2.1),
                    Preset::Intensive => (150, 700, 0.7, 1.4, 2.0),
                };
                builder.max_iterations(iterations).swarm(SwarmParams {
                    num_particles,
                    inertia_start,
                    cognitive,
                    social,
                    ..SwarmParams::default()
                })
            }
        }
    }

    pub fn board_size(&self) -> usize {
        self.board_size
    }

    /// Iteration budget of a single run.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Iterations without global-best improvement before diversifying; 0 disables it.
    pub fn stagnation_limit(&self) -> usize {
        self.stagnation_limit
    }

    /// Consecutive degenerate generations tolerated before a run fails.
    pub fn max_degenerate_retries(&self) -> usize {
        self.max_degenerate_retries
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Wall-clock budget of a single run.
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    /// Worker threads for batch fitness evaluation; `None` lets rayon decide.
    pub fn workers(&self) -> Option<usize> {
        self.workers
    }

    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn construction(&self) -> &ConstructionParams {
        &self.construction
    }

    pub fn site_search(&self) -> &SiteSearchParams {
        &self.site_search
    }

    pub fn genetic(&self) -> &GeneticParams {
        &self.genetic
    }

    pub fn swarm(&self) -> &SwarmParams {
        &self.swarm
    }

    /// Checks every parameter, returning the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.board_size < MIN_BOARD_SIZE {
            return Err(QueensError::Configuration(format!(
                "Board size must be at least {}, got {}",
                MIN_BOARD_SIZE, self.board_size
            )));
        }
        if self.max_iterations == 0 {
            return Err(config_error("Maximum iterations must be greater than 0"));
        }
        if self.workers == Some(0) {
            return Err(config_error("Worker count must be greater than 0"));
        }

        let c = &self.construction;
        if c.num_ants == 0 {
            return Err(config_error("Number of ants must be greater than 0"));
        }
        check_rate("Evaporation rate", c.evaporation_rate)?;
        check_non_negative("Alpha", c.alpha)?;
        check_non_negative("Beta", c.beta)?;
        if !(c.deposit_epsilon.is_finite() && c.deposit_epsilon > 0.0) {
            return Err(config_error("Deposit epsilon must be positive"));
        }
        check_neighborhood(c.neighborhood)?;

        let s = &self.site_search;
        if s.num_sites == 0 {
            return Err(config_error("Number of sites must be greater than 0"));
        }
        if s.best_sites > s.num_sites {
            return Err(QueensError::Configuration(format!(
                "Best sites ({}) cannot exceed the number of sites ({})",
                s.best_sites, s.num_sites
            )));
        }
        if s.bees_best == 0 {
            return Err(config_error("Bees per best site must be greater than 0"));
        }
        if s.initial_radius == 0 {
            return Err(config_error("Initial neighborhood radius must be greater than 0"));
        }
        if !(s.shrink_factor > 0.0 && s.shrink_factor <= 1.0) {
            return Err(config_error("Shrink factor must be in (0.0, 1.0]"));
        }
        if s.shrink_interval == 0 {
            return Err(config_error("Shrink interval must be greater than 0"));
        }

        let g = &self.genetic;
        if g.population_size < 2 {
            return Err(config_error("Population size must be at least 2"));
        }
        check_rate("Crossover rate", g.crossover_rate)?;
        check_rate("Mutation rate", g.mutation_rate)?;
        check_neighborhood(g.neighborhood)?;

        let p = &self.swarm;
        if p.num_particles == 0 {
            return Err(config_error("Number of particles must be greater than 0"));
        }
        check_non_negative("Initial inertia", p.inertia_start)?;
        check_non_negative("Final inertia", p.inertia_end)?;
        check_non_negative("Cognitive coefficient", p.cognitive)?;
        check_non_negative("Social coefficient", p.social)?;
        check_rate("Reinitialization probability", p.reinit_probability)?;

        Ok(())
    }
}

fn config_error(msg: &str) -> QueensError {
    QueensError::Configuration(msg.to_string())
}

fn check_rate(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(QueensError::Configuration(format!(
            "{} must be between 0.0 and 1.0, got {}",
            name, value
        )))
    }
}

fn check_non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(QueensError::Configuration(format!(
            "{} must be finite and non-negative, got {}",
            name, value
        )))
    }
}

fn check_neighborhood(neighborhood: Neighborhood) -> Result<()> {
    match neighborhood {
        Neighborhood::BoundedWindow { radius: 0 } => {
            Err(config_error("Neighborhood radius must be greater than 0"))
        }
        Neighborhood::RandomSwap { trials: 0 } => {
            Err(config_error("Random swap trials must be greater than 0"))
        }
        _ => Ok(()),
    }
}

/// Builder for `SearchConfig`.
///
/// Provides a fluent interface; [`SearchConfigBuilder::build`] validates the result.
#[derive(Debug, Clone)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    pub fn max_iterations(mut self, value: usize) -> Self {
        self.config.max_iterations = value;
        self
    }

    pub fn stagnation_limit(mut self, value: usize) -> Self {
        self.config.stagnation_limit = value;
        self
    }

    pub fn max_degenerate_retries(mut self, value: usize) -> Self {
        self.config.max_degenerate_retries = value;
        self
    }

    pub fn seed(mut self, value: u64) -> Self {
        self.config.seed = Some(value);
        self
    }

    pub fn time_limit(mut self, value: Duration) -> Self {
        self.config.time_limit = Some(value);
        self
    }

    pub fn workers(mut self, value: usize) -> Self {
        self.config.workers = Some(value);
        self
    }

    pub fn parallel_threshold(mut self, value: usize) -> Self {
        self.config.parallel_threshold = value;
        self
    }

    pub fn log_level(mut self, value: LogLevel) -> Self {
        self.config.log_level = value;
        self
    }

    pub fn construction(mut self, value: ConstructionParams) -> Self {
        self.config.construction = value;
        self
    }

    pub fn site_search(mut self, value: SiteSearchParams) -> Self {
        self.config.site_search = value;
        self
    }

    pub fn genetic(mut self, value: GeneticParams) -> Self {
        self.config.genetic = value;
        self
    }

    pub fn swarm(mut self, value: SwarmParams) -> Self {
        self.config.swarm = value;
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> Result<SearchConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SearchConfig::builder(8).build().unwrap();
        assert_eq!(config.board_size(), 8);
        assert_eq!(config.max_iterations(), 500);
        assert_eq!(config.stagnation_limit(), 50);
        assert_eq!(config.log_level(), LogLevel::None);
        assert!(config.seed().is_none());
    }

    #[test]
    fn test_every_preset_is_valid() {
        for kind in StrategyKind::ALL {
            for preset in [Preset::Light, Preset::Standard, Preset::Intensive] {
                assert!(SearchConfig::preset(8, kind, preset).is_ok());
            }
        }
    }

    #[test]
    fn test_genetic_presets_match_parameter_sets() {
        let intensive = SearchConfig::preset(8, StrategyKind::Genetic, Preset::Intensive).unwrap();
        assert_eq!(intensive.genetic().population_size, 150);
        assert_eq!(intensive.max_iterations(), 1500);
        assert_eq!(intensive.genetic().crossover_rate, 0.7);
        assert_eq!(intensive.genetic().mutation_rate, 0.3);
    }

    #[test]
    fn test_small_board_rejected() {
        match SearchConfig::builder(3).build() {
            Err(QueensError::Configuration(msg)) => assert!(msg.contains("at least 4")),
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_rates_outside_unit_interval_rejected() {
        let bad_mutation = SearchConfig::builder(8)
            .genetic(GeneticParams {
                mutation_rate: 1.5,
                ..GeneticParams::default()
            })
            .build();
        assert!(bad_mutation.is_err());

        let bad_evaporation = SearchConfig::builder(8)
            .construction(ConstructionParams {
                evaporation_rate: -0.1,
                ..ConstructionParams::default()
            })
            .build();
        assert!(bad_evaporation.is_err());

        let bad_reinit = SearchConfig::builder(8)
            .swarm(SwarmParams {
                reinit_probability: f64::NAN,
                ..SwarmParams::default()
            })
            .build();
        assert!(bad_reinit.is_err());
    }

    #[test]
    fn test_zero_sizes_rejected() {
        assert!(SearchConfig::builder(8).max_iterations(0).build().is_err());
        assert!(SearchConfig::builder(8).workers(0).build().is_err());
        assert!(SearchConfig::builder(8)
            .site_search(SiteSearchParams {
                best_sites: 30,
                ..SiteSearchParams::default()
            })
            .build()
            .is_err());
        assert!(SearchConfig::builder(8)
            .genetic(GeneticParams {
                neighborhood: Neighborhood::BoundedWindow { radius: 0 },
                ..GeneticParams::default()
            })
            .build()
            .is_err());
    }
}
