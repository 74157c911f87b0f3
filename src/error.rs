//! # Error Types
//!
//! This module defines the error type shared by the whole crate. Configuration
//! problems are reported immediately; a degenerate generation is the only
//! recoverable failure and is handled by the launcher before it ever reaches
//! the caller.
//!
//! ## Examples
//!
//! ```rust
//! use queensearch::error::{QueensError, Result};
//! use queensearch::board::Board;
//!
//! fn parse_user_rows(rows: &[usize]) -> Result<Board> {
//!     Board::from_one_indexed(rows)
//! }
//!
//! match parse_user_rows(&[1, 2, 9, 4]) {
//!     Err(QueensError::Configuration(msg)) => assert!(msg.contains("out of range")),
//!     _ => panic!("expected a configuration error"),
//! }
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use queensearch::error::{OptionExt, QueensError};
//!
//! fn first_row(rows: &[usize]) -> queensearch::error::Result<usize> {
//!     rows.first().copied().ok_or_else_queens(|| QueensError::EmptyPopulation)
//! }
//! ```

use thiserror::Error;

/// Represents errors that can occur while configuring or running a search.
#[derive(Error, Debug)]
pub enum QueensError {
    /// An invalid configuration or initial board was provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Every individual of a generation had non-positive fitness, so no
    /// parents can be drawn by fitness-weighted selection.
    #[error("Degenerate generation {generation}: no viable parents (all fitness values <= 0)")]
    DegenerateGeneration {
        /// Iteration of the run in which the degenerate generation occurred.
        generation: usize,
    },

    /// An operation needed at least one candidate but got none.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// Weighted selection could not be performed on the given weights.
    #[error("Selection error: {0}")]
    Selection(String),

    /// The per-run worker pool could not be created.
    #[error("Worker pool error: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// A specialized Result type for search operations.
pub type Result<T> = std::result::Result<T, QueensError>;

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` into a `Result<T>` using a closure to build the error.
    fn ok_or_else_queens<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> QueensError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_queens<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> QueensError,
    {
        self.ok_or_else(err_fn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_generation_message() {
        let err = QueensError::DegenerateGeneration { generation: 7 };
        let msg = err.to_string();
        assert!(msg.contains("generation 7"));
        assert!(msg.contains("no viable parents"));
    }

    #[test]
    fn test_option_ext() {
        let some: Option<u8> = Some(3);
        assert_eq!(some.ok_or_else_queens(|| QueensError::EmptyPopulation).unwrap(), 3);

        let none: Option<u8> = None;
        assert!(matches!(
            none.ok_or_else_queens(|| QueensError::EmptyPopulation),
            Err(QueensError::EmptyPopulation)
        ));
    }
}
