use crate::board::{Board, Fitness, ScoredBoard};
use crate::error::{OptionExt, QueensError, Result};
use crate::local_search::{HillClimbing, LocalSearch};
use crate::rng::RandomNumberGenerator;
use crate::search::config::SwarmParams;

use super::{argmax, SearchContext, SearchStrategy};

/// A particle: its current board, real-valued velocity and personal best.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Board,
    pub velocity: Vec<f64>,
    pub best_position: Board,
    pub best_fitness: Fitness,
}

impl Particle {
    fn at(position: Board) -> Self {
        let best_fitness = position.fitness();
        Self {
            velocity: vec![0.0; position.len()],
            best_position: position.clone(),
            position,
            best_fitness,
        }
    }
}

/// Turns a velocity into one transposition of `position`.
///
/// Columns `|v[0]| mod n` and `|v[1]| mod n` are swapped, then every row is
/// folded modulo `n` so the board stays in range whatever it held before.
pub fn discretize(position: &mut Board, velocity: &[f64]) {
    let n = position.len();
    if n == 0 {
        return;
    }
    if let [v0, v1, ..] = velocity {
        // `as` saturates, and NaN maps to 0.
        let a = (v0.abs() as usize) % n;
        let b = (v1.abs() as usize) % n;
        position.swap(a, b);
    }
    position.rows_mut().iter_mut().for_each(|row| *row %= n);
}

/// Inertia weight at `iteration`, annealed linearly from start to end.
pub fn inertia_at(params: &SwarmParams, iteration: usize, max_iterations: usize) -> f64 {
    let fraction = if max_iterations == 0 {
        0.0
    } else {
        iteration as f64 / max_iterations as f64
    };
    params.inertia_start - fraction * (params.inertia_start - params.inertia_end)
}

/// Discrete particle swarm optimization.
///
/// Velocities follow the usual inertia, cognitive and social blend on
/// continuous vectors; positions move by the single swap the velocity
/// encodes. The moved swarm is scored as one batch on the evaluator, then
/// personal and global bests are updated in particle order.
#[derive(Debug)]
pub struct SwarmStrategy {
    params: SwarmParams,
    n: usize,
    particles: Vec<Particle>,
    global_best: Option<ScoredBoard>,
}

impl SwarmStrategy {
    pub fn new(params: SwarmParams, n: usize) -> Self {
        Self {
            params,
            n,
            particles: Vec::new(),
            global_best: None,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn global_best(&self) -> Option<&ScoredBoard> {
        self.global_best.as_ref()
    }

    fn offer(&mut self, candidate: &Board, fitness: Fitness) {
        if self
            .global_best
            .as_ref()
            .map_or(true, |best| fitness > best.fitness)
        {
            self.global_best = Some(ScoredBoard {
                board: candidate.clone(),
                fitness,
            });
        }
    }

    fn current_best(&self) -> Result<ScoredBoard> {
        self.global_best
            .clone()
            .ok_or_else_queens(|| QueensError::EmptyPopulation)
    }

    fn fly(&mut self, inertia: f64, rng: &mut RandomNumberGenerator) -> Result<()> {
        let social_target: Vec<f64> = self
            .global_best
            .as_ref()
            .ok_or(QueensError::EmptyPopulation)?
            .board
            .rows()
            .iter()
            .map(|&r| r as f64)
            .collect();
        let (c1, c2) = (self.params.cognitive, self.params.social);

        for particle in &mut self.particles {
            let r1 = rng.unit();
            let r2 = rng.unit();
            let position = particle.position.rows();
            let personal = particle.best_position.rows();
            for (d, v) in particle.velocity.iter_mut().enumerate() {
                let x = position[d] as f64;
                *v = inertia * *v
                    + c1 * r1 * (personal[d] as f64 - x)
                    + c2 * r2 * (social_target[d] - x);
            }
            discretize(&mut particle.position, &particle.velocity);
        }
        Ok(())
    }
}

impl SearchStrategy for SwarmStrategy {
    fn name(&self) -> &str {
        "swarm"
    }

    fn initialize(&mut self, initial: Option<&Board>, ctx: &mut SearchContext<'_>) -> Result<()> {
        let n = self.n;
        let rng = &mut ctx.rng;
        self.particles = (0..self.params.num_particles)
            .map(|_| {
                let position = match initial {
                    Some(board) => {
                        let mut rows = board.rows().to_vec();
                        rng.shuffle(&mut rows);
                        Board::new(rows)
                    }
                    None => Board::random(n, rng),
                };
                Particle::at(position)
            })
            .collect();

        self.global_best = None;
        let fitness: Vec<Fitness> = self.particles.iter().map(|p| p.best_fitness).collect();
        let best = argmax(&fitness).ok_or(QueensError::EmptyPopulation)?;
        let board = self.particles[best].position.clone();
        self.offer(&board, fitness[best]);
        Ok(())
    }

    fn step(&mut self, ctx: &mut SearchContext<'_>) -> Result<ScoredBoard> {
        let inertia = inertia_at(&self.params, ctx.iteration, ctx.config.max_iterations());
        self.fly(inertia, &mut ctx.rng)?;

        let scores = ctx
            .evaluator
            .evaluate_by(&self.particles, |particle| &particle.position);

        for (i, &score) in scores.iter().enumerate() {
            let particle = &mut self.particles[i];
            if score > particle.best_fitness {
                particle.best_fitness = score;
                particle.best_position = particle.position.clone();
            }
            let position = particle.position.clone();
            self.offer(&position, score);
        }

        self.current_best()
    }

    fn best(&self) -> Result<ScoredBoard> {
        self.current_best()
    }

    fn diversify(&mut self, ctx: &mut SearchContext<'_>) -> Result<()> {
        let n = self.n;
        for particle in &mut self.particles {
            if ctx.rng.chance(self.params.reinit_probability) {
                particle.position = Board::random(n, &mut ctx.rng);
                particle.best_position = particle.position.clone();
                particle.best_fitness = particle.position.fitness();
            }
        }
        Ok(())
    }

    fn finish(&mut self, ctx: &mut SearchContext<'_>) -> Result<Option<ScoredBoard>> {
        let climber = HillClimbing::default();
        let mut polished = Vec::new();
        for particle in &mut self.particles {
            climber.refine(&mut particle.best_position, &mut ctx.rng);
            particle.best_fitness = particle.best_position.fitness();
            polished.push((particle.best_position.clone(), particle.best_fitness));
        }
        for (board, fitness) in polished {
            self.offer(&board, fitness);
        }
        Ok(self.global_best.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::config::SearchConfig;
    use crate::search::evaluator::FitnessEvaluator;

    fn context(config: &SearchConfig, seed: u64) -> SearchContext<'_> {
        SearchContext::new(
            config,
            RandomNumberGenerator::from_seed(seed),
            FitnessEvaluator::sequential(),
        )
    }

    #[test]
    fn test_discretize_stays_in_range() {
        let mut rng = RandomNumberGenerator::from_seed(99);
        for n in [4usize, 5, 8, 13] {
            for _ in 0..500 {
                let mut board = Board::random(n, &mut rng);
                let velocity: Vec<f64> = rng.fetch_uniform(-1e6, 1e6, n).into_iter().collect();
                discretize(&mut board, &velocity);
                assert!(board.rows().iter().all(|&r| r < n));
                assert!(board.is_permutation());
            }
        }
    }

    #[test]
    fn test_discretize_folds_out_of_range_rows() {
        let mut board = Board::new(vec![4, 5, 6, 7]);
        discretize(&mut board, &[f64::NAN, f64::INFINITY, 0.0, 0.0]);
        assert!(board.rows().iter().all(|&r| r < 4));
    }

    #[test]
    fn test_discretize_swaps_velocity_indices() {
        let mut board = Board::new(vec![0, 1, 2, 3]);
        discretize(&mut board, &[-1.7, 6.2, 0.0, 0.0]);
        // |-1.7| -> 1, |6.2| -> 6 mod 4 = 2
        assert_eq!(board, Board::new(vec![0, 2, 1, 3]));
    }

    #[test]
    fn test_inertia_anneals_linearly() {
        let params = SwarmParams::default();
        assert_eq!(inertia_at(&params, 0, 100), 0.9);
        assert!((inertia_at(&params, 50, 100) - 0.65).abs() < 1e-12);
        assert!((inertia_at(&params, 100, 100) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_initialize_shuffles_initial_rows() {
        let config = SearchConfig::builder(6).build().unwrap();
        let mut ctx = context(&config, 3);
        let mut strategy = SwarmStrategy::new(config.swarm().clone(), 6);
        let initial = Board::new(vec![0, 0, 1, 1, 2, 2]);
        strategy.initialize(Some(&initial), &mut ctx).unwrap();

        for particle in strategy.particles() {
            let mut rows = particle.position.rows().to_vec();
            rows.sort_unstable();
            assert_eq!(rows, vec![0, 0, 1, 1, 2, 2]);
        }
        assert_eq!(
            strategy.best().unwrap().fitness,
            strategy.particles().iter().map(|p| p.best_fitness).max().unwrap()
        );
    }

    #[test]
    fn test_global_best_never_decreases() {
        let config = SearchConfig::builder(8).max_iterations(40).build().unwrap();
        let mut ctx = context(&config, 8);
        let mut strategy = SwarmStrategy::new(config.swarm().clone(), 8);
        strategy.initialize(None, &mut ctx).unwrap();

        let mut previous = strategy.global_best().unwrap().fitness;
        for iteration in 0..40 {
            ctx.iteration = iteration;
            let best = strategy.step(&mut ctx).unwrap();
            assert!(best.fitness >= previous);
            assert!(strategy
                .particles()
                .iter()
                .all(|p| p.best_fitness == p.best_position.fitness()));
            previous = best.fitness;
        }
    }

    #[test]
    fn test_diversify_with_certain_reinit() {
        let params = SwarmParams {
            reinit_probability: 1.0,
            ..SwarmParams::default()
        };
        let config = SearchConfig::builder(8).swarm(params.clone()).build().unwrap();
        let mut ctx = context(&config, 8);
        let mut strategy = SwarmStrategy::new(params, 8);
        strategy.initialize(None, &mut ctx).unwrap();
        let before: Vec<Board> = strategy.particles().iter().map(|p| p.position.clone()).collect();

        strategy.diversify(&mut ctx).unwrap();
        let after: Vec<Board> = strategy.particles().iter().map(|p| p.position.clone()).collect();
        assert_ne!(before, after);
        assert!(strategy
            .particles()
            .iter()
            .all(|p| p.position == p.best_position));
    }

    #[test]
    fn test_finish_polishes_personal_bests() {
        let config = SearchConfig::builder(8).build().unwrap();
        let mut ctx = context(&config, 21);
        let mut strategy = SwarmStrategy::new(config.swarm().clone(), 8);
        strategy.initialize(None, &mut ctx).unwrap();
        let before = strategy.global_best().unwrap().fitness;

        let polished = strategy.finish(&mut ctx).unwrap().unwrap();
        assert!(polished.fitness >= before);
        assert_eq!(polished.fitness, polished.board.fitness());
    }
}
