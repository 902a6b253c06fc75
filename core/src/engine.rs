use alloc::collections::VecDeque;
use ndarray::{Array2, Zip};
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is accepting moves, mines may not be placed yet
    #[default]
    InProgress,
    /// Every safe cell was revealed
    Won,
    /// A mine was revealed
    Lost,
}

impl GameStatus {
    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Represents a game from the first reveal to the end.
///
/// Mines are not placed until the first [`GameEngine::reveal`], which keeps that cell and its
/// neighbors clear. Moves on stale or out-of-range coordinates are silently ignored and
/// reported as `NoChange`.
#[derive(Clone, Debug, PartialEq)]
pub struct GameEngine {
    difficulty: Difficulty,
    seed: u64,
    grid: Array2<Cell>,
    revealed: Array2<bool>,
    flagged: Array2<bool>,
    /// Revealed cells that are not mines.
    revealed_count: CellCount,
    flagged_count: CellCount,
    mines_placed: bool,
    status: GameStatus,
    elapsed: u32,
    triggered_mine: Option<Coord2>,
}

impl GameEngine {
    /// Starts a fresh game, `seed` drives mine placement on the first reveal.
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        let shape = difficulty.size().to_nd_index();
        Self {
            difficulty,
            seed,
            grid: Array2::default(shape),
            revealed: Array2::default(shape),
            flagged: Array2::default(shape),
            revealed_count: 0,
            flagged_count: 0,
            mines_placed: false,
            status: GameStatus::default(),
            elapsed: 0,
            triggered_mine: None,
        }
    }

    /// Validates a custom difficulty and starts a game with it.
    pub fn from_parts(rows: Coord, cols: Coord, mines: CellCount, seed: u64) -> Result<Self> {
        Ok(Self::new(Difficulty::new(rows, cols, mines)?, seed))
    }

    /// Discards the current game and starts over with the same difficulty.
    pub fn reset(&mut self, seed: u64) {
        self.restart(self.difficulty, seed);
    }

    /// Discards the current game and starts over with another difficulty.
    pub fn restart(&mut self, difficulty: Difficulty, seed: u64) {
        log::debug!("new game {} (seed {})", difficulty, seed);
        *self = Self::new(difficulty, seed);
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn size(&self) -> Coord2 {
        self.difficulty.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.difficulty.mines()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    /// Whether the first reveal already happened.
    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    pub fn is_timer_running(&self) -> bool {
        self.mines_placed && !self.status.is_finished()
    }

    /// Ticks counted since the first reveal, frozen once the game ends.
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    /// How many mines have not been flagged yet, negative when over-flagged
    pub fn mines_left(&self) -> isize {
        (self.difficulty.mines() as isize) - (self.flagged_count as isize)
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    /// Number of revealed cells that are not mines.
    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn is_revealed(&self, coords: Coord2) -> bool {
        self.revealed
            .get(coords.to_nd_index())
            .copied()
            .unwrap_or(false)
    }

    pub fn is_flagged(&self, coords: Coord2) -> bool {
        self.flagged
            .get(coords.to_nd_index())
            .copied()
            .unwrap_or(false)
    }

    /// Grid value at `coords`, only once that cell is revealed.
    pub fn revealed_cell(&self, coords: Coord2) -> Option<Cell> {
        self.is_revealed(coords)
            .then(|| self.grid[coords.to_nd_index()])
    }

    /// What the player sees at `coords`; out-of-range coordinates read as hidden.
    pub fn cell_view(&self, coords: Coord2) -> CellView {
        match self.revealed_cell(coords) {
            Some(Cell::Count(count)) => CellView::Revealed(count),
            Some(Cell::Mine) if self.triggered_mine == Some(coords) => CellView::Exploded,
            Some(Cell::Mine) => CellView::Mine,
            None if self.is_flagged(coords) => CellView::Flagged,
            None => CellView::Hidden,
        }
    }

    pub fn revealed_mask(&self) -> &Array2<bool> {
        &self.revealed
    }

    pub fn flag_mask(&self) -> &Array2<bool> {
        &self.flagged
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::from_engine(self)
    }

    pub(crate) fn grid(&self) -> &Array2<Cell> {
        &self.grid
    }

    /// Advances the elapsed counter while the timer runs, returns whether it moved.
    pub fn on_tick(&mut self) -> bool {
        if self.is_timer_running() {
            self.elapsed = self.elapsed.saturating_add(1);
            true
        } else {
            false
        }
    }

    /// Flag or unflag a hidden cell.
    pub fn toggle_flag(&mut self, coords: Coord2) -> MarkOutcome {
        let Some(coords) = self.validate_coords(coords) else {
            return MarkOutcome::NoChange;
        };
        if self.status.is_finished() || self.revealed[coords.to_nd_index()] {
            return MarkOutcome::NoChange;
        }

        let flag = &mut self.flagged[coords.to_nd_index()];
        *flag = !*flag;
        if *flag {
            self.flagged_count += 1;
        } else {
            self.flagged_count -= 1;
        }
        MarkOutcome::Changed
    }

    /// Reveal a hidden, unflagged cell, flood-filling from it when it has no adjacent mines.
    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        use RevealOutcome::*;

        let Some(coords) = self.validate_coords(coords) else {
            return NoChange;
        };
        let index = coords.to_nd_index();
        if self.status.is_finished() || self.revealed[index] || self.flagged[index] {
            return NoChange;
        }

        if !self.mines_placed {
            self.place_mines(coords);
        }

        self.revealed[index] = true;
        match self.grid[index] {
            Cell::Mine => {
                self.triggered_mine = Some(coords);
                self.end_game(false);
                HitMine
            }
            Cell::Count(count) => {
                self.revealed_count += 1;
                log::debug!("Reveal cell at {:?}, mine count: {}", coords, count);

                if count == 0 {
                    self.flood_fill(coords);
                }

                if self.revealed_count == self.difficulty.safe_cells() {
                    self.end_game(true);
                    Won
                } else {
                    Revealed
                }
            }
        }
    }

    fn validate_coords(&self, coords: Coord2) -> Option<Coord2> {
        in_bounds(coords, self.size()).then_some(coords)
    }

    fn place_mines(&mut self, start: Coord2) {
        self.grid = RandomMinefieldGenerator::new(self.seed).generate(self.difficulty, start);
        self.mines_placed = true;
        log::debug!("started at {:?}", start);
    }

    /// Reveals the connected zero region around `origin` and its numbered border.
    ///
    /// The reveal mask doubles as the visited set, flagged cells stay hidden.
    fn flood_fill(&mut self, origin: Coord2) {
        let size = self.size();
        let mut to_visit: VecDeque<Coord2> = neighbors(origin, size).collect();
        log::trace!(
            "Starting flood-fill from {:?}, initial neighbors: {:?}",
            origin,
            to_visit
        );

        while let Some(visit_coords) = to_visit.pop_front() {
            let index = visit_coords.to_nd_index();
            if self.revealed[index] || self.flagged[index] {
                continue;
            }
            // neighbors of a zero cell are never mines
            let Cell::Count(count) = self.grid[index] else {
                continue;
            };

            self.revealed[index] = true;
            self.revealed_count += 1;
            log::trace!("Flood revealed cell at {:?}, mine count: {}", visit_coords, count);

            if count == 0 {
                let revealed = &self.revealed;
                to_visit.extend(
                    neighbors(visit_coords, size).filter(|pos| !revealed[pos.to_nd_index()]),
                );
            }
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.status.is_finished() {
            return;
        }

        self.status = if won {
            GameStatus::Won
        } else {
            GameStatus::Lost
        };
        Zip::from(&mut self.revealed)
            .and(&self.grid)
            .for_each(|revealed, cell| {
                if cell.is_mine() {
                    *revealed = true;
                }
            });
        log::debug!("ended {:?} after {} ticks", self.status, self.elapsed);
    }
}
