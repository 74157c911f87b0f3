//! # SearchStrategy
//!
//! The `SearchStrategy` trait is the seam every metaheuristic plugs into. A
//! strategy owns all of its state (population, pheromone trails, velocities)
//! for exactly one run; the launcher drives it one iteration at a time and
//! decides, uniformly for all strategies, when to stop and when to diversify.
//!
//! Four strategies ship with the crate:
//!
//! - [`ConstructionStrategy`]: ant colony, pheromone-guided incremental construction.
//! - [`SiteSearchStrategy`]: bee colony, recruitment, abandonment and shrinking neighborhoods.
//! - [`GeneticStrategy`]: selection, single-point crossover and swap mutation.
//! - [`SwarmStrategy`]: discrete particle swarm with velocity-driven swaps.

pub mod construction;
pub mod genetic;
pub mod site_search;
pub mod swarm;

use std::fmt::{self, Debug};

use crate::board::{Board, ScoredBoard};
use crate::error::Result;
use crate::rng::RandomNumberGenerator;
use crate::search::config::SearchConfig;
use crate::search::evaluator::FitnessEvaluator;

pub use construction::{ConstructionStrategy, PheromoneMatrix};
pub use genetic::{crossover, mutate, GeneticStrategy, Offspring};
pub use site_search::{Site, SiteSearchStrategy};
pub use swarm::{discretize, inertia_at, Particle, SwarmStrategy};

/// Everything a strategy may use during one run.
///
/// The context is created by the launcher at the start of a run and dropped
/// at its end, which also releases the evaluator's worker pool.
#[derive(Debug)]
pub struct SearchContext<'a> {
    pub config: &'a SearchConfig,
    pub rng: RandomNumberGenerator,
    pub evaluator: FitnessEvaluator,
    /// Zero-based index of the iteration being executed.
    pub iteration: usize,
}

impl<'a> SearchContext<'a> {
    pub fn new(
        config: &'a SearchConfig,
        rng: RandomNumberGenerator,
        evaluator: FitnessEvaluator,
    ) -> Self {
        Self {
            config,
            rng,
            evaluator,
            iteration: 0,
        }
    }

    pub fn board_size(&self) -> usize {
        self.config.board_size()
    }
}

/// A metaheuristic that improves a set of candidate boards iteration by iteration.
pub trait SearchStrategy: Debug + Send {
    /// Short human-readable name used in log events.
    fn name(&self) -> &str;

    /// Creates the initial candidates, seeding from `initial` when given.
    fn initialize(&mut self, initial: Option<&Board>, ctx: &mut SearchContext<'_>) -> Result<()>;

    /// Runs one iteration and returns the best candidate it produced or holds.
    ///
    /// The returned board is a copy; the strategy keeps ownership of its state.
    fn step(&mut self, ctx: &mut SearchContext<'_>) -> Result<ScoredBoard>;

    /// The best candidate the strategy currently holds.
    ///
    /// Called right after `initialize`, so a run that never gets to step
    /// still reports a board.
    fn best(&self) -> Result<ScoredBoard>;

    /// Escapes stagnation by reinitializing part or all of the state.
    fn diversify(&mut self, ctx: &mut SearchContext<'_>) -> Result<()>;

    /// Optional polishing pass after the last iteration of a run.
    fn finish(&mut self, _ctx: &mut SearchContext<'_>) -> Result<Option<ScoredBoard>> {
        Ok(None)
    }
}

impl<S: SearchStrategy + ?Sized> SearchStrategy for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn initialize(&mut self, initial: Option<&Board>, ctx: &mut SearchContext<'_>) -> Result<()> {
        (**self).initialize(initial, ctx)
    }

    fn step(&mut self, ctx: &mut SearchContext<'_>) -> Result<ScoredBoard> {
        (**self).step(ctx)
    }

    fn best(&self) -> Result<ScoredBoard> {
        (**self).best()
    }

    fn diversify(&mut self, ctx: &mut SearchContext<'_>) -> Result<()> {
        (**self).diversify(ctx)
    }

    fn finish(&mut self, ctx: &mut SearchContext<'_>) -> Result<Option<ScoredBoard>> {
        (**self).finish(ctx)
    }
}

/// The strategies that ship with the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StrategyKind {
    Construction,
    SiteSearch,
    Genetic,
    Swarm,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Construction,
        StrategyKind::SiteSearch,
        StrategyKind::Genetic,
        StrategyKind::Swarm,
    ];

    /// Creates a fresh strategy instance configured from `config`.
    pub fn build(self, config: &SearchConfig) -> Box<dyn SearchStrategy> {
        let n = config.board_size();
        match self {
            StrategyKind::Construction => {
                Box::new(ConstructionStrategy::new(config.construction().clone(), n))
            }
            StrategyKind::SiteSearch => {
                Box::new(SiteSearchStrategy::new(config.site_search().clone(), n))
            }
            StrategyKind::Genetic => Box::new(GeneticStrategy::new(config.genetic().clone(), n)),
            StrategyKind::Swarm => Box::new(SwarmStrategy::new(config.swarm().clone(), n)),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyKind::Construction => "construction",
            StrategyKind::SiteSearch => "site-search",
            StrategyKind::Genetic => "genetic",
            StrategyKind::Swarm => "swarm",
        };
        f.write_str(name)
    }
}

/// `size` boards of `n` columns: `initial` first when given, random permutations otherwise.
pub(crate) fn seed_population(
    initial: Option<&Board>,
    size: usize,
    n: usize,
    rng: &mut RandomNumberGenerator,
) -> Vec<Board> {
    let mut population = Vec::with_capacity(size);
    population.extend(initial.cloned());
    while population.len() < size {
        population.push(Board::random(n, rng));
    }
    population.truncate(size);
    population
}

/// Index of the highest fitness, earliest on ties.
pub(crate) fn argmax(fitness: &[usize]) -> Option<usize> {
    fitness
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, usize)>, (i, &f)| match best {
            Some((_, best_f)) if best_f >= f => best,
            _ => Some((i, f)),
        })
        .map(|(i, _)| i)
}
