use tracing::trace;

use crate::board::{attacks, Board, ScoredBoard};
use crate::error::{QueensError, Result};
use crate::local_search::{HillClimbing, LocalSearch};
use crate::rng::RandomNumberGenerator;
use crate::search::config::ConstructionParams;
use crate::selection::RouletteWheel;

use super::{argmax, SearchContext, SearchStrategy};

/// Pheromone trails, one per (column, row) cell.
#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneMatrix {
    n: usize,
    trails: Vec<f64>,
}

impl PheromoneMatrix {
    /// An `n`×`n` matrix with every trail set to 1.
    pub fn uniform(n: usize) -> Self {
        Self {
            n,
            trails: vec![1.0; n * n],
        }
    }

    pub fn get(&self, col: usize, row: usize) -> f64 {
        self.trails[col * self.n + row]
    }

    /// Multiplies every trail by `1 - rate`.
    pub fn evaporate(&mut self, rate: f64) {
        let keep = 1.0 - rate;
        self.trails.iter_mut().for_each(|t| *t *= keep);
    }

    /// Adds `amount` along the cells a board occupies. Out-of-range rows are ignored.
    pub fn deposit(&mut self, board: &Board, amount: f64) {
        for (col, &row) in board.rows().iter().enumerate().take(self.n) {
            if row < self.n {
                self.trails[col * self.n + row] += amount;
            }
        }
    }

    pub fn reset(&mut self) {
        self.trails.iter_mut().for_each(|t| *t = 1.0);
    }
}

/// Ant colony construction.
///
/// Each ant places one queen per column, drawing the row from
/// `τ^α · η^β`, where `η = 1 / (1 + conflicts with the queens already placed)`.
#[derive(Debug)]
pub struct ConstructionStrategy {
    params: ConstructionParams,
    n: usize,
    pheromone: PheromoneMatrix,
    local_search: HillClimbing,
    incumbent: Option<ScoredBoard>,
}

impl ConstructionStrategy {
    pub fn new(params: ConstructionParams, n: usize) -> Self {
        let local_search = HillClimbing::new(params.neighborhood);
        Self {
            params,
            n,
            pheromone: PheromoneMatrix::uniform(n),
            local_search,
            incumbent: None,
        }
    }

    pub fn pheromone(&self) -> &PheromoneMatrix {
        &self.pheromone
    }

    /// Selection weight of every row for the next column after `prefix`.
    pub fn row_weights(&self, prefix: &[usize]) -> Vec<f64> {
        let col = prefix.len();
        (0..self.n)
            .map(|row| {
                let clashes = prefix
                    .iter()
                    .enumerate()
                    .filter(|&(c, &r)| attacks(c, r, col, row))
                    .count();
                let heuristic = 1.0 / (1.0 + clashes as f64);
                self.pheromone.get(col, row).powf(self.params.alpha)
                    * heuristic.powf(self.params.beta)
            })
            .collect()
    }

    /// Builds one complete board, column by column.
    pub fn construct(&self, rng: &mut RandomNumberGenerator) -> Board {
        let mut rows = Vec::with_capacity(self.n);
        for _ in 0..self.n {
            let weights = self.row_weights(&rows);
            let row = match RouletteWheel::new(&weights) {
                Ok(wheel) => wheel.spin(rng),
                // Trails underflowed or overflowed: pick uniformly.
                Err(_) => rng.index(self.n),
            };
            rows.push(row);
        }
        Board::new(rows)
    }

    /// Deposit for one ant: the inverse of its cost (conflicts), not of its fitness.
    fn deposit_for(&self, board: &Board, fitness: usize) -> f64 {
        let cost = board.max_pairs().saturating_sub(fitness);
        1.0 / (cost as f64 + self.params.deposit_epsilon)
    }
}

impl SearchStrategy for ConstructionStrategy {
    fn name(&self) -> &str {
        "construction"
    }

    fn initialize(&mut self, initial: Option<&Board>, ctx: &mut SearchContext<'_>) -> Result<()> {
        self.pheromone.reset();
        let seed = match initial {
            Some(board) => {
                self.pheromone.deposit(board, 1.0);
                board.clone()
            }
            None => self.construct(&mut ctx.rng),
        };
        self.incumbent = Some(ScoredBoard::new(seed));
        Ok(())
    }

    fn step(&mut self, ctx: &mut SearchContext<'_>) -> Result<ScoredBoard> {
        let ants: Vec<Board> = (0..self.params.num_ants)
            .map(|_| self.construct(&mut ctx.rng))
            .collect();
        let fitness = ctx.evaluator.evaluate(&ants);

        self.pheromone.evaporate(self.params.evaporation_rate);
        for (ant, &f) in ants.iter().zip(&fitness) {
            let amount = self.deposit_for(ant, f);
            self.pheromone.deposit(ant, amount);
        }

        let best = argmax(&fitness).ok_or(QueensError::EmptyPopulation)?;
        trace!(
            iteration = ctx.iteration,
            ant_fitness = fitness[best],
            "best ant constructed"
        );
        let refined = ScoredBoard::new(self.local_search.refined(&ants[best], &mut ctx.rng));
        if self
            .incumbent
            .as_ref()
            .map_or(true, |incumbent| refined.fitness > incumbent.fitness)
        {
            self.incumbent = Some(refined.clone());
        }
        Ok(refined)
    }

    fn best(&self) -> Result<ScoredBoard> {
        self.incumbent.clone().ok_or(QueensError::EmptyPopulation)
    }

    fn diversify(&mut self, _ctx: &mut SearchContext<'_>) -> Result<()> {
        self.pheromone.reset();
        Ok(())
    }
}
