use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use queensearch::{
    board::Board,
    local_search::{HillClimbing, LocalSearch, Neighborhood},
    rng::RandomNumberGenerator,
    search::{FitnessEvaluator, SearchConfig},
};

fn bench_conflicts(c: &mut Criterion) {
    let mut group = c.benchmark_group("conflicts");
    let mut rng = RandomNumberGenerator::from_seed(1);

    for n in [8, 32, 128, 512].iter() {
        let board = Board::random(*n, &mut rng);
        group.bench_with_input(BenchmarkId::from_parameter(n), &board, |b, board| {
            b.iter(|| black_box(board).conflicts())
        });
    }

    group.finish();
}

fn bench_batch_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_evaluation");
    let mut rng = RandomNumberGenerator::from_seed(2);
    let sequential = FitnessEvaluator::sequential();
    let parallel = SearchConfig::builder(64)
        .parallel_threshold(1)
        .build()
        .and_then(|config| FitnessEvaluator::new(&config))
        .unwrap();

    for size in [16, 128, 1024].iter() {
        let boards: Vec<Board> = (0..*size).map(|_| Board::random(64, &mut rng)).collect();

        group.bench_with_input(BenchmarkId::new("sequential", size), &boards, |b, boards| {
            b.iter(|| sequential.evaluate(black_box(boards)))
        });

        group.bench_with_input(BenchmarkId::new("parallel", size), &boards, |b, boards| {
            b.iter(|| parallel.evaluate(black_box(boards)))
        });
    }

    group.finish();
}

fn bench_hill_climbing(c: &mut Criterion) {
    let mut group = c.benchmark_group("hill_climbing");
    let neighborhoods = [
        ("full_swap", Neighborhood::FullSwap),
        ("bounded_window", Neighborhood::BoundedWindow { radius: 3 }),
        ("random_swap", Neighborhood::RandomSwap { trials: 32 }),
    ];

    for (name, neighborhood) in neighborhoods.iter() {
        let climber = HillClimbing::new(*neighborhood);
        for n in [16, 64].iter() {
            group.bench_with_input(BenchmarkId::new(*name, n), n, |b, &n| {
                let mut rng = RandomNumberGenerator::from_seed(3);
                b.iter(|| {
                    let mut board = Board::random(n, &mut rng);
                    climber.refine(&mut board, &mut rng)
                })
            });
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_conflicts,
    bench_batch_evaluation,
    bench_hill_climbing
);
criterion_main!(benches);
