//! # FitnessEvaluator
//!
//! Batch fitness evaluation, the one place the search runs in parallel. The
//! evaluator owns a `rayon` thread pool for the duration of a single run; the
//! pool is released when the evaluator is dropped at the end of the run, on
//! success and on error alike.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::board::{Board, Fitness};
use crate::error::Result;
use crate::search::config::SearchConfig;

/// Evaluates batches of boards, in parallel when the batch is large enough.
///
/// Workers only read boards and return numbers; every mutation of search
/// state happens on the caller's thread after a batch returns.
#[derive(Debug)]
pub struct FitnessEvaluator {
    pool: Option<ThreadPool>,
    parallel_threshold: usize,
}

impl FitnessEvaluator {
    /// Creates the evaluator for one run.
    ///
    /// A worker count of 1 disables the pool entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread pool cannot be created.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let pool = match config.workers() {
            Some(1) => None,
            workers => Some(
                ThreadPoolBuilder::new()
                    .num_threads(workers.unwrap_or(0))
                    .thread_name(|i| format!("queens-eval-{}", i))
                    .build()?,
            ),
        };
        Ok(Self {
            pool,
            parallel_threshold: config.parallel_threshold(),
        })
    }

    /// An evaluator that always works on the calling thread.
    pub fn sequential() -> Self {
        Self {
            pool: None,
            parallel_threshold: usize::MAX,
        }
    }

    pub fn is_parallel(&self) -> bool {
        self.pool.is_some()
    }

    /// Fitness of every board, in input order.
    pub fn evaluate(&self, boards: &[Board]) -> Vec<Fitness> {
        self.evaluate_by(boards, |board| board)
    }

    /// Fitness of the board `project` extracts from each item, in input order.
    pub fn evaluate_by<T, F>(&self, items: &[T], project: F) -> Vec<Fitness>
    where
        T: Sync,
        F: Fn(&T) -> &Board + Sync,
    {
        match &self.pool {
            Some(pool) if items.len() >= self.parallel_threshold => pool.install(|| {
                items
                    .par_iter()
                    .map(|item| project(item).fitness())
                    .collect()
            }),
            _ => items.iter().map(|item| project(item).fitness()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RandomNumberGenerator;

    #[test]
    fn test_parallel_matches_sequential() {
        let config = SearchConfig::builder(10)
            .workers(4)
            .parallel_threshold(1)
            .build()
            .unwrap();
        let parallel = FitnessEvaluator::new(&config).unwrap();
        assert!(parallel.is_parallel());

        let mut rng = RandomNumberGenerator::from_seed(21);
        let boards: Vec<Board> = (0..200).map(|_| Board::random(10, &mut rng)).collect();

        let expected: Vec<Fitness> = boards.iter().map(Board::fitness).collect();
        assert_eq!(parallel.evaluate(&boards), expected);
        assert_eq!(FitnessEvaluator::sequential().evaluate(&boards), expected);
    }

    #[test]
    fn test_single_worker_has_no_pool() {
        let config = SearchConfig::builder(8).workers(1).build().unwrap();
        let evaluator = FitnessEvaluator::new(&config).unwrap();
        assert!(!evaluator.is_parallel());
        assert!(evaluator.evaluate(&[]).is_empty());
    }

    #[test]
    fn test_evaluate_by_projection() {
        let pairs = vec![
            (1, Board::from_one_indexed(&[2, 4, 1, 3]).unwrap()),
            (2, Board::from_one_indexed(&[1, 2, 3, 4]).unwrap()),
        ];
        let fitness = FitnessEvaluator::sequential().evaluate_by(&pairs, |(_, board)| board);
        assert_eq!(fitness, vec![6, 0]);
    }
}
