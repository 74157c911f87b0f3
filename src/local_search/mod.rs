//! # Local Search
//!
//! This module provides the refinement operator every strategy uses on its
//! candidates. A refinement never makes a board worse: it only ever applies
//! strictly improving transpositions, and it always stops after a bounded
//! number of sweeps.

use std::fmt::Debug;

use crate::board::Board;
use crate::rng::RandomNumberGenerator;

pub mod hill_climbing;

pub use hill_climbing::HillClimbing;

/// Which transpositions a refinement sweep considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Neighborhood {
    /// Every column may swap with every other column.
    FullSwap,
    /// A column may only swap with columns at most `radius` away.
    BoundedWindow { radius: usize },
    /// `trials` random transpositions per sweep.
    RandomSwap { trials: usize },
}

impl Default for Neighborhood {
    fn default() -> Self {
        Self::FullSwap
    }
}

/// What a refinement did to a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefineOutcome {
    /// Whether the board's fitness increased.
    pub improved: bool,
    /// Number of sweeps performed, never more than the sweep cap.
    pub sweeps: usize,
    /// Conflicts of the board after refinement.
    pub conflicts: usize,
}

/// A trait for board refinement algorithms.
///
/// Implementations must guarantee `fitness(after) >= fitness(before)` and must
/// terminate for every input.
pub trait LocalSearch: Debug + Send + Sync {
    /// Refines `board` in place.
    fn refine(&self, board: &mut Board, rng: &mut RandomNumberGenerator) -> RefineOutcome;

    /// Refines a copy of `board` and returns it, leaving the original untouched.
    fn refined(&self, board: &Board, rng: &mut RandomNumberGenerator) -> Board {
        let mut copy = board.clone();
        self.refine(&mut copy, rng);
        copy
    }
}
