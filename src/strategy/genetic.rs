use crate::board::{Board, ScoredBoard};
use crate::error::{QueensError, Result};
use crate::local_search::{HillClimbing, LocalSearch};
use crate::rng::RandomNumberGenerator;
use crate::search::config::GeneticParams;
use crate::selection::RouletteWheel;

use super::{argmax, seed_population, SearchContext, SearchStrategy};

/// The two children of a crossover and the split point used, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offspring {
    pub first: Board,
    pub second: Board,
    /// `None` when the parents were passed through unchanged.
    pub point: Option<usize>,
}

/// Single-point crossover applied with probability `rate`.
///
/// The split point is drawn from `[1, n - 2]`, so both children always take
/// genes from both parents. Boards shorter than 3 cannot be split and are
/// returned unchanged.
pub fn crossover(
    first: &Board,
    second: &Board,
    rate: f64,
    rng: &mut RandomNumberGenerator,
) -> Offspring {
    let n = first.len().min(second.len());
    if n < 3 || !rng.chance(rate) {
        return Offspring {
            first: first.clone(),
            second: second.clone(),
            point: None,
        };
    }

    let point = rng.between(1, n - 2);
    let (a, b) = (first.rows(), second.rows());
    let child_one = a[..point].iter().chain(&b[point..]).copied().collect();
    let child_two = b[..point].iter().chain(&a[point..]).copied().collect();
    Offspring {
        first: Board::new(child_one),
        second: Board::new(child_two),
        point: Some(point),
    }
}

/// Swaps each gene with a random position with probability `rate`.
pub fn mutate(board: &mut Board, rate: f64, rng: &mut RandomNumberGenerator) {
    let n = board.len();
    for i in 0..n {
        if rng.chance(rate) {
            let j = rng.index(n);
            board.swap(i, j);
        }
    }
}

/// Genetic algorithm hybridized with hill climbing.
///
/// Every generation refines each individual, ranks the population, and breeds
/// the next one by fitness-proportionate selection, crossover and mutation.
#[derive(Debug)]
pub struct GeneticStrategy {
    params: GeneticParams,
    n: usize,
    population: Vec<Board>,
    local_search: HillClimbing,
}

impl GeneticStrategy {
    pub fn new(params: GeneticParams, n: usize) -> Self {
        let local_search = HillClimbing::new(params.neighborhood);
        Self {
            params,
            n,
            population: Vec::new(),
            local_search,
        }
    }

    pub fn population(&self) -> &[Board] {
        &self.population
    }

    /// Breeds a full generation from a ranked population.
    ///
    /// # Errors
    ///
    /// Returns an error if no individual has positive fitness.
    fn breed(
        &self,
        ranked: &[Board],
        fitness: &[usize],
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<Board>> {
        let weights: Vec<f64> = fitness.iter().map(|&f| f as f64).collect();
        let wheel = RouletteWheel::new(&weights)?;
        let size = self.params.population_size;

        let mut next = Vec::with_capacity(size);
        while next.len() < size {
            let mother = &ranked[wheel.spin(rng)];
            let father = &ranked[wheel.spin(rng)];
            let Offspring {
                mut first,
                mut second,
                ..
            } = crossover(mother, father, self.params.crossover_rate, rng);
            mutate(&mut first, self.params.mutation_rate, rng);
            next.push(first);
            if next.len() < size {
                mutate(&mut second, self.params.mutation_rate, rng);
                next.push(second);
            }
        }
        Ok(next)
    }
}

impl SearchStrategy for GeneticStrategy {
    fn name(&self) -> &str {
        "genetic"
    }

    fn initialize(&mut self, initial: Option<&Board>, ctx: &mut SearchContext<'_>) -> Result<()> {
        self.population =
            seed_population(initial, self.params.population_size, self.n, &mut ctx.rng);
        Ok(())
    }

    fn step(&mut self, ctx: &mut SearchContext<'_>) -> Result<ScoredBoard> {
        if self.population.is_empty() {
            return Err(QueensError::EmptyPopulation);
        }

        for individual in &mut self.population {
            self.local_search.refine(individual, &mut ctx.rng);
        }

        let fitness = ctx.evaluator.evaluate(&self.population);
        let mut ranked: Vec<(usize, Board)> = fitness
            .into_iter()
            .zip(std::mem::take(&mut self.population))
            .collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0));
        let (fitness, ranked): (Vec<usize>, Vec<Board>) = ranked.into_iter().unzip();

        let best = ScoredBoard {
            board: ranked[0].clone(),
            fitness: fitness[0],
        };

        if best.is_solution() {
            self.population = ranked;
            return Ok(best);
        }

        if fitness.iter().all(|&f| f == 0) {
            self.population = ranked;
            return Err(QueensError::DegenerateGeneration {
                generation: ctx.iteration,
            });
        }

        self.population = self.breed(&ranked, &fitness, &mut ctx.rng)?;
        Ok(best)
    }

    fn best(&self) -> Result<ScoredBoard> {
        let fitness: Vec<usize> = self.population.iter().map(Board::fitness).collect();
        let best = argmax(&fitness).ok_or(QueensError::EmptyPopulation)?;
        Ok(ScoredBoard {
            board: self.population[best].clone(),
            fitness: fitness[best],
        })
    }

    fn diversify(&mut self, ctx: &mut SearchContext<'_>) -> Result<()> {
        self.population = seed_population(None, self.params.population_size, self.n, &mut ctx.rng);
        Ok(())
    }
}
