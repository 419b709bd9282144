use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use saferoute_core::{Cell, CellKind};
use saferoute_grid::{normalize, OccupancyGrid};
use saferoute_system_enumeration::{PathEnumerator, SearchBounds};

const SEEDS: [u64; 6] = [1, 7, 42, 1_337, 0x5eed, 0xdead_beef];

fn random_grid(rng: &mut ChaCha8Rng) -> OccupancyGrid {
    let rows = rng.gen_range(1..=5);
    let columns = rng.gen_range(1..=5);
    let raw: Vec<Vec<i64>> = (0..rows)
        .map(|_| (0..columns).map(|_| rng.gen_range(0..=3)).collect())
        .collect();
    normalize(&raw).expect("generated grids are rectangular")
}

fn random_cell(rng: &mut ChaCha8Rng, grid: &OccupancyGrid) -> Cell {
    let row = rng.gen_range(0..grid.rows());
    let column = rng.gen_range(0..grid.columns());
    Cell::new(
        u32::try_from(row).expect("small grid"),
        u32::try_from(column).expect("small grid"),
    )
}

#[test]
fn every_route_is_simple_contiguous_and_walkable() {
    for seed in SEEDS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        for _ in 0..40 {
            let grid = random_grid(&mut rng);
            let start = random_cell(&mut rng, &grid);
            let goal = random_cell(&mut rng, &grid);
            let strict = rng.gen_bool(0.5);
            let bounds = SearchBounds {
                cap: rng.gen_range(1..=200),
                max_depth: rng.gen_range(0..=30),
            };

            let mask = grid.walkability(strict);
            let enumeration = PathEnumerator::new(bounds).enumerate(&mask, start, goal);

            assert!(enumeration.len() <= bounds.cap, "seed {seed}: cap exceeded");
            for path in enumeration.paths() {
                assert!(path.is_simple(), "seed {seed}: repeated cell in {path:?}");
                assert!(path.is_contiguous(), "seed {seed}: jump in {path:?}");
                assert_eq!(path.start(), Some(start));
                assert_eq!(path.goal(), Some(goal));
                assert!(path.steps() <= bounds.max_depth + 1);

                for cell in path.cells() {
                    let kind = grid.kind(*cell).expect("route stays in bounds");
                    assert_ne!(kind, CellKind::Wall, "seed {seed}: route entered a wall");
                    if strict {
                        assert_ne!(kind, CellKind::Hazard, "seed {seed}: strict route hit hazard");
                    }
                }
            }
        }
    }
}

#[test]
fn raising_the_cap_only_appends_routes() {
    for seed in SEEDS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let grid = random_grid(&mut rng);
        let start = random_cell(&mut rng, &grid);
        let goal = random_cell(&mut rng, &grid);
        let mask = grid.walkability(false);

        let small = PathEnumerator::new(SearchBounds {
            cap: 3,
            max_depth: 50,
        })
        .enumerate(&mask, start, goal);
        let large = PathEnumerator::new(SearchBounds {
            cap: 300,
            max_depth: 50,
        })
        .enumerate(&mask, start, goal);

        assert!(small.len() <= large.len());
        assert_eq!(small.paths(), &large.paths()[..small.len()], "seed {seed}");
        assert_eq!(small.reached_cap(), small.len() == 3);
    }
}
