use ndarray::Array2;

use crate::*;
pub use random::*;

mod random;

pub trait MinefieldGenerator {
    /// Builds a fully counted grid for `difficulty`, keeping `start` and its neighbors free of mines.
    fn generate(self, difficulty: Difficulty, start: Coord2) -> Array2<Cell>;
}

/// Whether `coords` is inside the 3x3 block around the first reveal.
pub const fn in_start_zone(coords: Coord2, start: Coord2) -> bool {
    chebyshev_distance(coords, start) <= 1
}

/// Turns `coords` into a mine and bumps the count of every neighbor that is not a mine.
pub(crate) fn place_mine(grid: &mut Array2<Cell>, coords: Coord2, size: Coord2) {
    grid[coords.to_nd_index()] = Cell::Mine;
    for pos in neighbors(coords, size) {
        if let Cell::Count(count) = &mut grid[pos.to_nd_index()] {
            *count += 1;
        }
    }
}
