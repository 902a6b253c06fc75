use alloc::vec::Vec;
use rand::prelude::*;

use super::*;

/// Rejection-sampling attempts allowed per board cell before falling back.
const SAMPLING_ATTEMPTS_PER_CELL: u32 = 64;

/// Purely random placement that keeps the first revealed cell and its neighbors safe.
///
/// Cells are drawn uniformly and rejected when they are already mines or lie in the
/// start zone. This only terminates with high probability, so after a fixed attempt
/// budget the remaining mines are drawn from an explicit list of free cells instead.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
    attempt_budget: Option<u32>,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            attempt_budget: None,
        }
    }

    /// Overrides the rejection-sampling attempt budget.
    pub fn with_attempt_budget(mut self, attempts: u32) -> Self {
        self.attempt_budget = Some(attempts);
        self
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, difficulty: Difficulty, start: Coord2) -> Array2<Cell> {
        let size = difficulty.size();
        let (rows, cols) = size;
        let mut grid: Array2<Cell> = Array2::default(size.to_nd_index());
        let mut rng = SmallRng::seed_from_u64(self.seed);

        let budget = self.attempt_budget.unwrap_or_else(|| {
            u32::from(difficulty.total_cells()).saturating_mul(SAMPLING_ATTEMPTS_PER_CELL)
        });
        let mut attempts = 0;
        let mut mines_placed: CellCount = 0;

        log::debug!(
            "Placing {} mines on {}x{} (seed {}, start {:?})",
            difficulty.mines(),
            rows,
            cols,
            self.seed,
            start
        );

        while mines_placed < difficulty.mines() && attempts < budget {
            attempts += 1;
            let coords = (rng.random_range(0..rows), rng.random_range(0..cols));
            if in_start_zone(coords, start) || grid[coords.to_nd_index()].is_mine() {
                continue;
            }
            place_mine(&mut grid, coords, size);
            mines_placed += 1;
        }

        if mines_placed < difficulty.mines() {
            log::warn!(
                "Rejection sampling gave up after {} attempts with {} of {} mines, drawing the rest from free cells",
                attempts,
                mines_placed,
                difficulty.mines()
            );

            let mut free_cells: Vec<Coord2> = (0..rows)
                .flat_map(|row| (0..cols).map(move |col| (row, col)))
                .filter(|&coords| {
                    !in_start_zone(coords, start) && !grid[coords.to_nd_index()].is_mine()
                })
                .collect();

            // difficulty validation guarantees there are enough free cells
            while mines_placed < difficulty.mines() && !free_cells.is_empty() {
                let coords = free_cells.swap_remove(rng.random_range(0..free_cells.len()));
                place_mine(&mut grid, coords, size);
                mines_placed += 1;
            }
        }

        grid
    }
}
