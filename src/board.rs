//! # Board
//!
//! A `Board` is one candidate placement: `rows()[col]` is the row of the queen
//! standing in column `col`. Every strategy in the crate ranks candidates with
//! the same two functions, [`Board::conflicts`] and [`Board::fitness`].
//!
//! ## Example
//!
//! ```rust
//! use queensearch::board::Board;
//!
//! let board = Board::from_one_indexed(&[2, 4, 1, 3]).unwrap();
//! assert!(board.is_valid());
//! assert_eq!(board.fitness(), board.max_pairs());
//!
//! let diagonal = Board::from_one_indexed(&[1, 2, 3, 4]).unwrap();
//! assert!(!diagonal.is_valid());
//! assert_eq!(diagonal.conflicts(), 6);
//! ```

use std::fmt;

use crate::error::{QueensError, Result};
use crate::rng::RandomNumberGenerator;

/// Number of non-attacking queen pairs.
pub type Fitness = usize;

/// Number of queen pairs on an `n`-column board, `n * (n - 1) / 2`.
pub fn max_pairs(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// A queen placement with one queen per column.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    rows: Vec<usize>,
}

impl Board {
    /// Wraps a row sequence without checking it.
    ///
    /// The conflict oracle accepts any sequence; use [`Board::checked`] for
    /// input coming from outside the search.
    pub fn new(rows: Vec<usize>) -> Self {
        Self { rows }
    }

    /// Builds a board from 0-indexed rows, requiring exactly `n` values in `[0, n)`.
    pub fn checked(rows: Vec<usize>, n: usize) -> Result<Self> {
        if rows.len() != n {
            return Err(QueensError::Configuration(format!(
                "Initial board has {} positions, expected {}",
                rows.len(),
                n
            )));
        }
        if let Some((col, &row)) = rows.iter().enumerate().find(|(_, &row)| row >= n) {
            return Err(QueensError::Configuration(format!(
                "Row {} in column {} is out of range for a {}x{} board",
                row, col, n, n
            )));
        }
        Ok(Self { rows })
    }

    /// Builds a board from 1-indexed rows (`1..=n`), the way users enter them.
    pub fn from_one_indexed(rows: &[usize]) -> Result<Self> {
        let n = rows.len();
        let zero_indexed = rows
            .iter()
            .enumerate()
            .map(|(col, &row)| {
                if row == 0 || row > n {
                    Err(QueensError::Configuration(format!(
                        "Row {} in column {} is out of range 1..={}",
                        row,
                        col + 1,
                        n
                    )))
                } else {
                    Ok(row - 1)
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(zero_indexed))
    }

    /// A uniformly random permutation board of size `n`.
    pub fn random(n: usize, rng: &mut RandomNumberGenerator) -> Self {
        Self::new(rng.permutation(n))
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Rows shifted to `1..=n` for presentation.
    pub fn to_one_indexed(&self) -> Vec<usize> {
        self.rows.iter().map(|row| row + 1).collect()
    }

    /// Swaps the queens of two columns.
    pub fn swap(&mut self, a: usize, b: usize) {
        self.rows.swap(a, b);
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [usize] {
        &mut self.rows
    }

    /// `n * (n - 1) / 2` for this board's size.
    pub fn max_pairs(&self) -> usize {
        max_pairs(self.rows.len())
    }

    /// Counts attacking pairs: equal rows or equal row and column distance.
    ///
    /// Each pair is counted at most once, so the result never exceeds
    /// [`Board::max_pairs`].
    pub fn conflicts(&self) -> usize {
        let rows = &self.rows;
        let mut conflicts = 0;
        for i in 0..rows.len() {
            for j in (i + 1)..rows.len() {
                if attacks(i, rows[i], j, rows[j]) {
                    conflicts += 1;
                }
            }
        }
        conflicts
    }

    /// Non-attacking pairs: `max_pairs - conflicts`.
    pub fn fitness(&self) -> Fitness {
        self.max_pairs() - self.conflicts()
    }

    /// True when every value appears exactly once and lies in `[0, n)`.
    pub fn is_permutation(&self) -> bool {
        let n = self.rows.len();
        let mut seen = vec![false; n];
        for &row in &self.rows {
            if row >= n || seen[row] {
                return false;
            }
            seen[row] = true;
        }
        true
    }

    /// True iff the board is a permutation and no two queens attack each other.
    pub fn is_valid(&self) -> bool {
        self.is_permutation() && self.conflicts() == 0
    }

    /// Plain-text grid, one line per column, with `Q` at the queen's row.
    pub fn render(&self) -> String {
        let n = self.rows.len();
        let line = "─".repeat(4 * n + 1);
        let mut out = String::new();
        for &row in &self.rows {
            out.push_str(&line);
            out.push('\n');
            let cells: Vec<&str> = (0..n)
                .map(|cell| if cell == row { " Q " } else { "   " })
                .collect();
            out.push('|');
            out.push_str(&cells.join("|"));
            out.push_str("|\n");
        }
        out.push_str(&line);
        out.push('\n');
        out
    }
}

/// Whether queens at `(col_a, row_a)` and `(col_b, row_b)` attack each other.
pub(crate) fn attacks(col_a: usize, row_a: usize, col_b: usize, row_b: usize) -> bool {
    row_a == row_b || row_a.abs_diff(row_b) == col_a.abs_diff(col_b)
}

impl From<Vec<usize>> for Board {
    fn from(rows: Vec<usize>) -> Self {
        Self::new(rows)
    }
}

/// Formats the board 1-indexed, e.g. `[2, 4, 1, 3]`.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_one_indexed())
    }
}

/// A board together with its fitness at the time it was scored.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoredBoard {
    pub board: Board,
    pub fitness: Fitness,
}

impl ScoredBoard {
    /// Scores a copy of `board`.
    pub fn new(board: Board) -> Self {
        let fitness = board.fitness();
        Self { board, fitness }
    }

    pub fn conflicts(&self) -> usize {
        self.board.max_pairs() - self.fitness
    }

    /// Fitness is maximal, i.e. no two queens attack each other.
    pub fn is_solution(&self) -> bool {
        self.fitness == self.board.max_pairs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_four_queens() {
        let valid = Board::from_one_indexed(&[2, 4, 1, 3]).unwrap();
        assert!(valid.is_valid());
        assert_eq!(valid.conflicts(), 0);

        let invalid = Board::from_one_indexed(&[1, 2, 3, 4]).unwrap();
        assert!(!invalid.is_valid());
        assert_eq!(invalid.conflicts(), 6);
        assert_eq!(invalid.fitness(), 0);
    }

    #[test]
    fn test_known_eight_queens() {
        let board = Board::from_one_indexed(&[1, 5, 8, 6, 3, 7, 2, 4]).unwrap();
        assert!(board.is_valid());
        assert_eq!(board.fitness(), 28);

        let other = Board::from_one_indexed(&[4, 6, 8, 2, 7, 1, 3, 5]).unwrap();
        assert!(other.is_valid());
    }

    #[test]
    fn test_row_duplicates_are_conflicts() {
        // Same row, no shared diagonal.
        let board = Board::new(vec![0, 3, 0, 2]);
        assert!(!board.is_permutation());
        assert!(board.conflicts() >= 1);
        assert!(!board.is_valid());

        let all_same = Board::new(vec![2; 6]);
        assert_eq!(all_same.conflicts(), max_pairs(6));
        assert_eq!(all_same.fitness(), 0);
    }

    #[test]
    fn test_out_of_range_values_do_not_panic() {
        let board = Board::new(vec![10, 20, 30, 40]);
        assert!(!board.is_permutation());
        assert!(!board.is_valid());
        assert_eq!(board.conflicts(), 0);
    }

    #[test]
    fn test_trivial_boards() {
        assert!(Board::new(vec![]).is_valid());
        assert!(Board::new(vec![0]).is_valid());
        assert_eq!(Board::new(vec![]).fitness(), 0);
    }

    #[test]
    fn test_fitness_matches_conflicts_on_random_boards() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        for n in 4..=12 {
            for _ in 0..50 {
                let board = Board::random(n, &mut rng);
                assert_eq!(board.fitness(), max_pairs(n) - board.conflicts());
                assert_eq!(board.is_valid(), board.conflicts() == 0);
            }
        }
    }

    fn count_valid_permutations(rows: &mut Vec<usize>, k: usize) -> usize {
        if k == rows.len() {
            return usize::from(Board::new(rows.clone()).is_valid());
        }
        let mut count = 0;
        for i in k..rows.len() {
            rows.swap(k, i);
            count += count_valid_permutations(rows, k + 1);
            rows.swap(k, i);
        }
        count
    }

    #[test]
    fn test_counts_known_solution_totals() {
        for (n, expected) in [(4usize, 2usize), (5, 10), (6, 4), (8, 92)] {
            let mut rows: Vec<usize> = (0..n).collect();
            assert_eq!(count_valid_permutations(&mut rows, 0), expected, "n = {}", n);
        }
    }

    #[test]
    fn test_anti_diagonal_conflicts() {
        let board = Board::new(vec![3, 2, 1, 0]);
        assert!(board.is_permutation());
        assert_eq!(board.conflicts(), 6);
        assert_eq!(board.fitness(), 0);

        // Only columns 0 and 1 share a diagonal.
        assert_eq!(Board::new(vec![0, 1, 3, 5, 2, 4]).conflicts(), 1);
    }

    #[test]
    fn test_checked_rejects_malformed_input() {
        assert!(Board::checked(vec![0, 1, 2], 4).is_err());
        assert!(Board::checked(vec![0, 1, 2, 4], 4).is_err());
        assert!(Board::checked(vec![0, 1, 2, 3], 4).is_ok());
        assert!(Board::from_one_indexed(&[0, 1, 2, 3]).is_err());
        assert!(Board::from_one_indexed(&[1, 2, 3, 5]).is_err());
    }

    #[test]
    fn test_display_and_render() {
        let board = Board::from_one_indexed(&[2, 4, 1, 3]).unwrap();
        assert_eq!(board.to_string(), "[2, 4, 1, 3]");

        let grid = board.render();
        assert_eq!(grid.matches('Q').count(), 4);
        assert_eq!(grid.lines().count(), 9);
        assert!(grid.lines().nth(1).unwrap().starts_with("|   | Q |"));
    }

    #[test]
    fn test_scored_board() {
        let scored = ScoredBoard::new(Board::from_one_indexed(&[1, 2, 3, 4]).unwrap());
        assert_eq!(scored.conflicts(), 6);
        assert!(!scored.is_solution());

        let solved = ScoredBoard::new(Board::from_one_indexed(&[3, 1, 4, 2]).unwrap());
        assert!(solved.is_solution());
    }
}
