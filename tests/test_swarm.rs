use queensearch::{
    board::Board,
    rng::RandomNumberGenerator,
    run_search,
    search::{Preset, SearchConfig},
    strategy::{discretize, StrategyKind},
};

#[test]
fn test_swarm_solves_eight_queens() {
    let config = SearchConfig::preset_builder(8, StrategyKind::Swarm, Preset::Light)
        .max_iterations(200)
        .seed(7)
        .build()
        .unwrap();
    let results = run_search(StrategyKind::Swarm, &config, None, 10).unwrap();

    assert!(!results.is_empty());
    assert!(results.solutions().all(Board::is_valid));
}

#[test]
fn test_swarm_with_parallel_evaluation() {
    // 100 particles over a threshold of 16 forces the worker pool.
    let config = SearchConfig::preset_builder(12, StrategyKind::Swarm, Preset::Standard)
        .max_iterations(30)
        .workers(4)
        .parallel_threshold(16)
        .seed(3)
        .build()
        .unwrap();
    let results = run_search(StrategyKind::Swarm, &config, None, 2).unwrap();

    for run in results.runs() {
        assert_eq!(run.board.len(), 12);
        assert_eq!(run.fitness, run.board.fitness());
    }
}

#[test]
fn test_discretize_keeps_rows_in_range() {
    let mut rng = RandomNumberGenerator::from_seed(1);
    for n in [4usize, 8, 16] {
        for _ in 0..1000 {
            let mut board = Board::new((0..n).map(|_| rng.index(3 * n)).collect());
            let velocity: Vec<f64> = (0..n).map(|_| (rng.unit() - 0.5) * 1e9).collect();
            discretize(&mut board, &velocity);
            assert!(board.rows().iter().all(|&r| r < n));
        }
    }
}
