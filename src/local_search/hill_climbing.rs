use crate::board::Board;
use crate::error::{QueensError, Result};
use crate::rng::RandomNumberGenerator;

use super::{LocalSearch, Neighborhood, RefineOutcome};

/// Greedy swap hill climbing.
///
/// Each sweep visits the columns in order and, for each column, applies the
/// best strictly improving swap among its candidate partners. Sweeps repeat
/// until one makes no improvement, the board is conflict-free, or the sweep
/// cap is reached.
#[derive(Debug, Clone)]
pub struct HillClimbing {
    neighborhood: Neighborhood,
    max_sweeps: Option<usize>,
}

impl HillClimbing {
    /// Creates a hill climber whose sweep cap defaults to `2 * n`.
    pub fn new(neighborhood: Neighborhood) -> Self {
        Self {
            neighborhood,
            max_sweeps: None,
        }
    }

    /// Creates a hill climber with an explicit sweep cap.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_sweeps` is 0.
    pub fn with_max_sweeps(neighborhood: Neighborhood, max_sweeps: usize) -> Result<Self> {
        if max_sweeps == 0 {
            return Err(QueensError::Configuration(
                "Maximum sweeps must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            neighborhood,
            max_sweeps: Some(max_sweeps),
        })
    }

    pub fn neighborhood(&self) -> Neighborhood {
        self.neighborhood
    }

    /// Sweep cap for a board with `n` columns.
    pub fn sweep_cap(&self, n: usize) -> usize {
        self.max_sweeps.unwrap_or(2 * n).max(1)
    }

    /// Best strictly improving swap for each column whose partner lies in `window`.
    fn greedy_sweep<W>(board: &mut Board, mut conflicts: usize, window: W) -> (usize, bool)
    where
        W: Fn(usize) -> std::ops::RangeInclusive<usize>,
    {
        let mut improved = false;
        for i in 0..board.len() {
            let mut best: Option<(usize, usize)> = None;
            for j in window(i) {
                if j == i {
                    continue;
                }
                board.swap(i, j);
                let candidate = board.conflicts();
                board.swap(i, j);
                if candidate < best.map_or(conflicts, |(_, c)| c) {
                    best = Some((j, candidate));
                }
            }
            if let Some((j, candidate)) = best {
                board.swap(i, j);
                conflicts = candidate;
                improved = true;
                if conflicts == 0 {
                    break;
                }
            }
        }
        (conflicts, improved)
    }

    fn random_sweep(
        board: &mut Board,
        mut conflicts: usize,
        trials: usize,
        rng: &mut RandomNumberGenerator,
    ) -> (usize, bool) {
        let n = board.len();
        let mut improved = false;
        for _ in 0..trials {
            let (i, j) = (rng.index(n), rng.index(n));
            if i == j {
                continue;
            }
            board.swap(i, j);
            let candidate = board.conflicts();
            if candidate < conflicts {
                conflicts = candidate;
                improved = true;
                if conflicts == 0 {
                    break;
                }
            } else {
                board.swap(i, j);
            }
        }
        (conflicts, improved)
    }
}

impl Default for HillClimbing {
    fn default() -> Self {
        Self::new(Neighborhood::FullSwap)
    }
}

impl LocalSearch for HillClimbing {
    fn refine(&self, board: &mut Board, rng: &mut RandomNumberGenerator) -> RefineOutcome {
        let n = board.len();
        let initial = board.conflicts();
        let mut conflicts = initial;
        let mut sweeps = 0;

        if n < 2 {
            return RefineOutcome {
                improved: false,
                sweeps,
                conflicts,
            };
        }

        while conflicts > 0 && sweeps < self.sweep_cap(n) {
            sweeps += 1;
            let (after, improved) = match self.neighborhood {
                Neighborhood::FullSwap => Self::greedy_sweep(board, conflicts, |_| 0..=n - 1),
                Neighborhood::BoundedWindow { radius } => {
                    let radius = radius.max(1);
                    Self::greedy_sweep(board, conflicts, |i| {
                        i.saturating_sub(radius)..=(i + radius).min(n - 1)
                    })
                }
                Neighborhood::RandomSwap { trials } => {
                    Self::random_sweep(board, conflicts, trials, rng)
                }
            };
            conflicts = after;
            if !improved {
                break;
            }
        }

        RefineOutcome {
            improved: conflicts < initial,
            sweeps,
            conflicts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighborhoods() -> Vec<Neighborhood> {
        vec![
            Neighborhood::FullSwap,
            Neighborhood::BoundedWindow { radius: 2 },
            Neighborhood::RandomSwap { trials: 10 },
        ]
    }

    #[test]
    fn test_refine_is_monotonic() {
        let mut rng = RandomNumberGenerator::from_seed(1234);
        for neighborhood in neighborhoods() {
            let climber = HillClimbing::new(neighborhood);
            for &n in &[4usize, 5, 8, 12] {
                for _ in 0..1000 {
                    let board = Board::random(n, &mut rng);
                    let before = board.fitness();
                    let after = climber.refined(&board, &mut rng);
                    assert!(
                        after.fitness() >= before,
                        "{:?} made {} worse",
                        neighborhood,
                        board
                    );
                }
            }
        }
    }

    #[test]
    fn test_refine_preserves_row_multiset() {
        let mut rng = RandomNumberGenerator::from_seed(8);
        let climber = HillClimbing::default();
        let mut board = Board::random(10, &mut rng);
        climber.refine(&mut board, &mut rng);
        assert!(board.is_permutation());
    }

    #[test]
    fn test_refine_respects_sweep_cap() {
        let mut rng = RandomNumberGenerator::from_seed(77);
        for neighborhood in neighborhoods() {
            let capped = HillClimbing::with_max_sweeps(neighborhood, 3).unwrap();
            let uncapped = HillClimbing::new(neighborhood);
            for _ in 0..100 {
                let mut board = Board::random(12, &mut rng);
                assert!(capped.refine(&mut board, &mut rng).sweeps <= 3);

                let mut board = Board::random(12, &mut rng);
                assert!(uncapped.refine(&mut board, &mut rng).sweeps <= 24);
            }
        }
    }

    #[test]
    fn test_refine_stops_on_solution() {
        let mut rng = RandomNumberGenerator::from_seed(0);
        let mut board = Board::from_one_indexed(&[2, 4, 1, 3]).unwrap();
        let outcome = HillClimbing::default().refine(&mut board, &mut rng);
        assert_eq!(outcome.sweeps, 0);
        assert!(!outcome.improved);
        assert_eq!(board, Board::from_one_indexed(&[2, 4, 1, 3]).unwrap());
    }

    #[test]
    fn test_full_swap_improves_diagonal() {
        let mut rng = RandomNumberGenerator::from_seed(0);
        let mut board = Board::new(vec![0, 1, 2, 3, 4, 5, 6, 7]);
        let outcome = HillClimbing::default().refine(&mut board, &mut rng);
        assert!(outcome.improved);
        assert_eq!(outcome.conflicts, board.conflicts());
        assert!(board.conflicts() < 28);
    }

    #[test]
    fn test_bounded_window_only_swaps_nearby_columns() {
        let mut rng = RandomNumberGenerator::from_seed(0);
        let original = Board::new(vec![0, 1, 2, 3, 4, 5, 6, 7]);
        let climber = HillClimbing::with_max_sweeps(Neighborhood::BoundedWindow { radius: 1 }, 1)
            .unwrap();
        let mut board = original.clone();
        let outcome = climber.refine(&mut board, &mut rng);
        assert!(outcome.improved);
        assert_eq!(outcome.sweeps, 1);
        assert!(board.fitness() > original.fitness());
        assert!(board.is_permutation());
        // Column 0 can only have exchanged its queen with column 1.
        assert!(board.rows()[0] <= 1);
    }

    #[test]
    fn test_zero_sweeps_rejected() {
        assert!(HillClimbing::with_max_sweeps(Neighborhood::FullSwap, 0).is_err());
    }

    #[test]
    fn test_tiny_boards() {
        let mut rng = RandomNumberGenerator::from_seed(0);
        let mut empty = Board::new(vec![]);
        assert_eq!(HillClimbing::default().refine(&mut empty, &mut rng).sweeps, 0);
        let mut single = Board::new(vec![0]);
        assert_eq!(HillClimbing::default().refine(&mut single, &mut rng).sweeps, 0);
    }
}
