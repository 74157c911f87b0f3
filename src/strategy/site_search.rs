use tracing::debug;

use crate::board::{Board, ScoredBoard};
use crate::error::{QueensError, Result};
use crate::local_search::{HillClimbing, LocalSearch, Neighborhood};
use crate::rng::RandomNumberGenerator;
use crate::search::config::SiteSearchParams;

use super::{seed_population, SearchContext, SearchStrategy};

/// A candidate tracked by the colony, with its cost (conflicts) and neighborhood radius.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub board: Board,
    pub cost: usize,
    pub radius: usize,
}

impl Site {
    fn new(board: Board, radius: usize) -> Self {
        let cost = board.conflicts();
        Self {
            board,
            cost,
            radius,
        }
    }
}

/// Bee colony site search.
///
/// Sites are ranked by cost each iteration. The best sites recruit more bees
/// than the others; every bee perturbs its site inside the site's window and
/// refines the result with a bounded-window hill climb. Sites that stay
/// expensive without improving are abandoned for random boards.
#[derive(Debug)]
pub struct SiteSearchStrategy {
    params: SiteSearchParams,
    n: usize,
    sites: Vec<Site>,
}

impl SiteSearchStrategy {
    pub fn new(params: SiteSearchParams, n: usize) -> Self {
        Self {
            params,
            n,
            sites: Vec::new(),
        }
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    fn fresh_site(&self, rng: &mut RandomNumberGenerator) -> Site {
        Site::new(Board::random(self.n, rng), self.params.initial_radius)
    }

    fn regenerate(&mut self, rng: &mut RandomNumberGenerator) {
        self.sites = (0..self.params.num_sites)
            .map(|_| self.fresh_site(rng))
            .collect();
    }

    /// One bee: a random swap within `radius` followed by a bounded-window climb.
    fn forage(site: &Site, rng: &mut RandomNumberGenerator) -> (Board, usize) {
        let mut board = site.board.clone();
        let n = board.len();
        let i = rng.index(n);
        let lo = i.saturating_sub(site.radius);
        let hi = (i + site.radius).min(n - 1);
        if hi > lo {
            // Draw from the window with `i` removed.
            let k = rng.between(lo, hi - 1);
            let j = if k >= i { k + 1 } else { k };
            board.swap(i, j);
        }
        let climber = HillClimbing::new(Neighborhood::BoundedWindow {
            radius: site.radius,
        });
        let outcome = climber.refine(&mut board, rng);
        (board, outcome.conflicts)
    }

    /// Explores every site and returns how many were abandoned.
    fn explore(&mut self, rng: &mut RandomNumberGenerator) -> usize {
        self.sites.sort_by_key(|site| site.cost);

        let mut abandoned = 0;
        for rank in 0..self.sites.len() {
            let bees = if rank < self.params.best_sites {
                self.params.bees_best
            } else {
                self.params.bees_other
            };

            let site = &self.sites[rank];
            let mut best: Option<(Board, usize)> = None;
            for _ in 0..bees {
                let (board, cost) = Self::forage(site, rng);
                if best.as_ref().map_or(true, |(_, c)| cost < *c) {
                    best = Some((board, cost));
                }
            }

            let previous = site.cost;
            let radius = site.radius;
            let improved = match best {
                Some((board, cost)) if cost <= previous => {
                    self.sites[rank] = Site {
                        board,
                        cost,
                        radius,
                    };
                    cost < previous
                }
                _ => false,
            };

            if !improved && self.sites[rank].cost > self.params.abandon_above {
                self.sites[rank] = self.fresh_site(rng);
                abandoned += 1;
            }
        }
        abandoned
    }

    /// Shrinks every radius and intensifies each site inside its smaller window.
    fn shrink(&mut self, rng: &mut RandomNumberGenerator) {
        let factor = self.params.shrink_factor;
        for site in &mut self.sites {
            site.radius = ((site.radius as f64 * factor).floor() as usize).max(1);
            let climber = HillClimbing::new(Neighborhood::BoundedWindow {
                radius: site.radius,
            });
            site.cost = climber.refine(&mut site.board, rng).conflicts;
        }
    }

    fn best_site(&self) -> Result<ScoredBoard> {
        self.sites
            .iter()
            .min_by_key(|site| site.cost)
            .map(|site| ScoredBoard::new(site.board.clone()))
            .ok_or(QueensError::EmptyPopulation)
    }
}

impl SearchStrategy for SiteSearchStrategy {
    fn name(&self) -> &str {
        "site-search"
    }

    fn initialize(&mut self, initial: Option<&Board>, ctx: &mut SearchContext<'_>) -> Result<()> {
        let radius = self.params.initial_radius;
        self.sites = seed_population(initial, self.params.num_sites, self.n, &mut ctx.rng)
            .into_iter()
            .map(|board| Site::new(board, radius))
            .collect();
        Ok(())
    }

    fn step(&mut self, ctx: &mut SearchContext<'_>) -> Result<ScoredBoard> {
        let abandoned = self.explore(&mut ctx.rng);
        if abandoned == self.sites.len() {
            debug!(
                iteration = ctx.iteration,
                "every site abandoned, regenerating the colony"
            );
            self.regenerate(&mut ctx.rng);
        }

        if (ctx.iteration + 1) % self.params.shrink_interval == 0 {
            self.shrink(&mut ctx.rng);
        }

        self.best_site()
    }

    fn best(&self) -> Result<ScoredBoard> {
        self.best_site()
    }

    fn diversify(&mut self, ctx: &mut SearchContext<'_>) -> Result<()> {
        self.regenerate(&mut ctx.rng);
        Ok(())
    }
}
