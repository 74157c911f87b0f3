use std::collections::BTreeSet;
use std::time::Duration;

use crate::board::{Board, Fitness};

/// The outcome of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunResult {
    /// Zero-based run index.
    pub run: usize,
    /// The best board found during the run.
    pub board: Board,
    pub fitness: Fitness,
    pub conflicts: usize,
    /// Iteration at which `board` was first reached.
    pub iteration: usize,
    pub is_solution: bool,
    /// How many times the run was diversified.
    pub diversifications: usize,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

/// Results of a multi-run search.
///
/// Every run is kept in `runs`, while `solutions` holds each distinct valid
/// board once no matter how many runs found it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResultSet {
    runs: Vec<RunResult>,
    solutions: BTreeSet<Board>,
}

impl ResultSet {
    pub(crate) fn record(&mut self, result: RunResult) {
        if result.is_solution {
            self.solutions.insert(result.board.clone());
        }
        self.runs.push(result);
    }

    /// Distinct solutions in canonical (lexicographic) order.
    pub fn solutions(&self) -> impl Iterator<Item = &Board> {
        self.solutions.iter()
    }

    pub fn contains(&self, board: &Board) -> bool {
        self.solutions.contains(board)
    }

    /// Number of distinct solutions.
    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    pub fn runs(&self) -> &[RunResult] {
        &self.runs
    }

    /// The fittest run; the earliest one on ties.
    pub fn best(&self) -> Option<&RunResult> {
        self.runs
            .iter()
            .rev()
            .max_by_key(|result| result.fitness)
    }

    /// Runs that ended without a solution.
    pub fn failures(&self) -> impl Iterator<Item = &RunResult> {
        self.runs.iter().filter(|result| !result.is_solution)
    }
}
