use ndarray::{Array2, Zip};
use serde::{Deserialize, Serialize};

use crate::*;

/// Owned, read-only copy of everything the presentation layer needs to redraw.
///
/// Mine positions stay hidden until their cell is revealed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub size: Coord2,
    pub mines: CellCount,
    pub status: GameStatus,
    pub elapsed: u32,
    pub mines_left: isize,
    pub triggered_mine: Option<Coord2>,
    pub revealed: Array2<Option<Cell>>,
    pub flags: Array2<bool>,
}

impl GameSnapshot {
    pub fn from_engine(engine: &GameEngine) -> Self {
        let revealed = Zip::from(engine.revealed_mask())
            .and(engine.grid())
            .map_collect(|&revealed, &cell| revealed.then_some(cell));

        Self {
            size: engine.size(),
            mines: engine.total_mines(),
            status: engine.status(),
            elapsed: engine.elapsed(),
            mines_left: engine.mines_left(),
            triggered_mine: engine.triggered_mine(),
            revealed,
            flags: engine.flag_mask().clone(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let expected = (self.size.0 as usize, self.size.1 as usize);
        if self.revealed.dim() != expected || self.flags.dim() != expected {
            return Err(GameError::InvalidBoardShape);
        }
        Ok(())
    }

    /// Same per-cell view as [`GameEngine::cell_view`].
    pub fn cell_view(&self, coords: Coord2) -> CellView {
        let index = coords.to_nd_index();
        match self.revealed.get(index).copied().flatten() {
            Some(Cell::Count(count)) => CellView::Revealed(count),
            Some(Cell::Mine) if self.triggered_mine == Some(coords) => CellView::Exploded,
            Some(Cell::Mine) => CellView::Mine,
            None if self.flags.get(index).copied().unwrap_or(false) => CellView::Flagged,
            None => CellView::Hidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_coords(size: Coord2) -> impl Iterator<Item = Coord2> {
        (0..size.0).flat_map(move |row| (0..size.1).map(move |col| (row, col)))
    }

    #[test]
    fn snapshot_hides_unrevealed_values() {
        let mut engine = GameEngine::new(Difficulty::MEDIUM, 21);
        engine.toggle_flag((7, 7));
        engine.reveal((0, 0));
        engine.on_tick();

        let snapshot = engine.snapshot();

        assert_eq!(snapshot.size, (16, 16));
        assert_eq!(snapshot.mines, 40);
        assert_eq!(snapshot.elapsed, 1);
        assert_eq!(snapshot.mines_left, 39);
        assert!(snapshot.flags[[7, 7]]);
        assert_eq!(snapshot.revealed[[0, 0]], Some(Cell::Count(0)));
        for coords in all_coords(snapshot.size) {
            assert_eq!(
                snapshot.revealed[coords.to_nd_index()].is_some(),
                engine.is_revealed(coords)
            );
            assert_eq!(snapshot.cell_view(coords), engine.cell_view(coords));
        }
        assert_eq!(snapshot.validate(), Ok(()));
    }

    #[test]
    fn snapshot_shows_mines_after_loss() {
        let mut engine = GameEngine::new(Difficulty::MEDIUM, 4);
        engine.reveal((4, 4));
        let mine = all_coords(engine.size())
            .find(|c| engine.grid()[c.to_nd_index()].is_mine())
            .unwrap();
        engine.reveal(mine);

        let snapshot = engine.snapshot();

        assert_eq!(snapshot.status, GameStatus::Lost);
        assert_eq!(snapshot.cell_view(mine), CellView::Exploded);
        let shown = snapshot
            .revealed
            .iter()
            .filter(|cell| matches!(cell, Some(Cell::Mine)))
            .count();
        assert_eq!(shown, 40);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let mut engine = GameEngine::new(Difficulty::EASY, 5);
        engine.reveal((3, 3));
        let snapshot = engine.snapshot();

        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: GameSnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn validate_rejects_shape_mismatch() {
        let snapshot = GameSnapshot {
            size: (2, 2),
            mines: 1,
            status: GameStatus::InProgress,
            elapsed: 0,
            mines_left: 1,
            triggered_mine: None,
            revealed: Array2::from_elem([2, 2], None),
            flags: Array2::from_elem([1, 2], false),
        };

        assert_eq!(snapshot.validate(), Err(GameError::InvalidBoardShape));
    }
}
