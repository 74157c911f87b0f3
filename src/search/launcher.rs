use std::time::Instant;

use tracing::{debug, info, info_span, warn};

use super::config::SearchConfig;
use super::evaluator::FitnessEvaluator;
use super::result::{ResultSet, RunResult};
use crate::{
    board::Board,
    error::{QueensError, Result},
    rng::RandomNumberGenerator,
    strategy::{SearchContext, SearchStrategy, StrategyKind},
};

/// Runs a built-in strategy `runs` times and collects the results.
///
/// Shorthand for `SearchLauncher::new(config.clone()).run(kind, initial, runs)`.
pub fn run_search(
    kind: StrategyKind,
    config: &SearchConfig,
    initial: Option<&Board>,
    runs: usize,
) -> Result<ResultSet> {
    SearchLauncher::new(config.clone()).run(kind, initial, runs)
}

/// Drives strategies through independent runs.
///
/// Within a run the launcher owns the stopping rules: the iteration budget,
/// the optional time limit, stopping on the first solution, and diversifying
/// after `stagnation_limit` iterations without improvement. Strategies only
/// decide what one iteration does.
#[derive(Debug, Clone)]
pub struct SearchLauncher {
    config: SearchConfig,
}

impl SearchLauncher {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Runs a built-in strategy.
    ///
    /// # Errors
    ///
    /// See [`SearchLauncher::run_with`].
    pub fn run(
        &self,
        kind: StrategyKind,
        initial: Option<&Board>,
        runs: usize,
    ) -> Result<ResultSet> {
        self.run_with(|config| kind.build(config), initial, runs)
    }

    /// Runs `runs` independent searches, each with a fresh strategy from `factory`.
    ///
    /// # Arguments
    ///
    /// * `factory` - Builds the strategy instance for one run.
    /// * `initial` - Optional starting board; random permutations are used when absent.
    /// * `runs` - Number of independent runs.
    ///
    /// # Errors
    ///
    /// This method will return an error if:
    /// - The configuration is invalid or `runs` is zero
    /// - The initial board does not match the configured board size
    /// - A worker pool cannot be created
    /// - A strategy keeps producing degenerate generations past the retry limit
    pub fn run_with<S, F>(
        &self,
        mut factory: F,
        initial: Option<&Board>,
        runs: usize,
    ) -> Result<ResultSet>
    where
        S: SearchStrategy,
        F: FnMut(&SearchConfig) -> S,
    {
        self.config.validate()?;
        if runs == 0 {
            return Err(QueensError::Configuration(
                "Number of runs must be greater than 0".to_string(),
            ));
        }
        let initial = initial
            .map(|board| Board::checked(board.rows().to_vec(), self.config.board_size()))
            .transpose()?;

        let mut results = ResultSet::default();
        for run in 0..runs {
            let mut strategy = factory(&self.config);
            let result = self.execute(&mut strategy, run, initial.as_ref())?;
            results.record(result);
        }

        if self.config.log_level().reports_runs() {
            info!(
                runs,
                unique_solutions = results.len(),
                failures = results.failures().count(),
                "search finished"
            );
        }
        Ok(results)
    }

    fn rng_for(&self, run: usize) -> RandomNumberGenerator {
        match self.config.seed() {
            Some(seed) => RandomNumberGenerator::from_seed(seed.wrapping_add(run as u64)),
            None => RandomNumberGenerator::new(),
        }
    }

    /// One run. The worker pool lives in `ctx` and is dropped on every exit path.
    fn execute<S: SearchStrategy>(
        &self,
        strategy: &mut S,
        run: usize,
        initial: Option<&Board>,
    ) -> Result<RunResult> {
        let config = &self.config;
        let level = config.log_level();
        let span = info_span!("run", run, strategy = strategy.name());
        let _guard = span.enter();

        let started = Instant::now();
        let evaluator = FitnessEvaluator::new(config)?;
        let mut ctx = SearchContext::new(config, self.rng_for(run), evaluator);
        strategy.initialize(initial, &mut ctx)?;

        // The run's floor: whatever the strategy holds before its first step.
        let (mut best, mut best_iteration) = (strategy.best()?, 0);
        let mut stagnation = 0;
        let mut diversifications = 0;
        let mut degenerate_streak = 0;
        let mut executed = 0;

        for iteration in 0..config.max_iterations() {
            if let Some(limit) = config.time_limit() {
                if started.elapsed() >= limit {
                    if level.reports_runs() {
                        info!(iteration, "time limit reached");
                    }
                    break;
                }
            }
            ctx.iteration = iteration;
            executed = iteration + 1;

            let candidate = match strategy.step(&mut ctx) {
                Ok(candidate) => {
                    degenerate_streak = 0;
                    candidate
                }
                Err(QueensError::DegenerateGeneration { generation })
                    if degenerate_streak < config.max_degenerate_retries() =>
                {
                    degenerate_streak += 1;
                    if level.reports_runs() {
                        warn!(
                            generation,
                            retry = degenerate_streak,
                            "degenerate generation, diversifying"
                        );
                    }
                    strategy.diversify(&mut ctx)?;
                    diversifications += 1;
                    stagnation = 0;
                    continue;
                }
                Err(e) => return Err(e),
            };

            if candidate.fitness > best.fitness {
                best = candidate;
                best_iteration = iteration;
                stagnation = 0;
            } else {
                stagnation += 1;
            }

            if level.reports_iterations() {
                debug!(
                    iteration,
                    fitness = best.fitness,
                    stagnation,
                    "iteration finished"
                );
            }

            if best.is_solution() {
                break;
            }

            let limit = config.stagnation_limit();
            if limit > 0 && stagnation >= limit {
                strategy.diversify(&mut ctx)?;
                diversifications += 1;
                stagnation = 0;
                if level.reports_runs() {
                    info!(iteration, diversifications, "stagnated, diversifying");
                }
            }
        }

        if let Some(polished) = strategy.finish(&mut ctx)? {
            if polished.fitness > best.fitness {
                best = polished;
                best_iteration = executed.saturating_sub(1);
            }
        }

        let result = RunResult {
            run,
            conflicts: best.conflicts(),
            is_solution: best.board.is_valid(),
            fitness: best.fitness,
            board: best.board,
            iteration: best_iteration,
            diversifications,
            elapsed: started.elapsed(),
        };

        if level.reports_runs() {
            info!(
                fitness = result.fitness,
                conflicts = result.conflicts,
                solved = result.is_solution,
                iteration = result.iteration,
                "run finished"
            );
        }
        Ok(result)
    }
}
