use crate::error::{QueensError, Result};
use crate::rng::RandomNumberGenerator;

/// Fitness-proportionate (roulette wheel) sampling over a set of weights.
///
/// The wheel is built once per batch of draws. Its cumulative distribution is
/// normalized and pinned to exactly 1.0 at the last positive weight, so
/// rounding can never leave that index unreachable.
///
/// # Examples
///
/// ```
/// use queensearch::selection::RouletteWheel;
/// use queensearch::rng::RandomNumberGenerator;
///
/// let wheel = RouletteWheel::new(&[0.5, 0.8, 0.3]).unwrap();
/// let mut rng = RandomNumberGenerator::from_seed(42);
/// let picked = wheel.spin(&mut rng);
/// assert!(picked < 3);
/// ```
#[derive(Debug, Clone)]
pub struct RouletteWheel {
    cumulative: Vec<f64>,
}

impl RouletteWheel {
    /// Builds the wheel from non-negative weights.
    ///
    /// # Errors
    ///
    /// Returns an error if `weights` is empty, contains a negative or
    /// non-finite value, or sums to zero.
    pub fn new(weights: &[f64]) -> Result<Self> {
        if weights.is_empty() {
            return Err(QueensError::EmptyPopulation);
        }

        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(QueensError::Selection(
                "Roulette wheel selection requires finite, non-negative weights".to_string(),
            ));
        }

        let sum: f64 = weights.iter().sum();
        if sum <= 0.0 || !sum.is_finite() {
            return Err(QueensError::Selection(
                "Roulette wheel selection requires at least one positive weight".to_string(),
            ));
        }

        let mut cumulative = Vec::with_capacity(weights.len());
        let mut running = 0.0;
        for &weight in weights {
            running += weight / sum;
            cumulative.push(running);
        }

        // Pin 1.0 from the last positive weight on; trailing zero weights stay unreachable.
        if let Some(last_positive) = weights.iter().rposition(|&w| w > 0.0) {
            cumulative[last_positive..].iter_mut().for_each(|p| *p = 1.0);
        }

        Ok(Self { cumulative })
    }

    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Draws one index with probability proportional to its weight.
    pub fn spin(&self, rng: &mut RandomNumberGenerator) -> usize {
        self.index_for(rng.unit())
    }

    /// Index of the first cumulative entry reaching `r`.
    fn index_for(&self, r: f64) -> usize {
        self.cumulative
            .iter()
            .position(|&prob| r <= prob)
            // Only reachable through floating-point error: fall back to the last index
            .unwrap_or(self.cumulative.len() - 1)
    }
}
