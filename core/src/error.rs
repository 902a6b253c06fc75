use thiserror::Error;

use crate::{CellCount, Coord};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid difficulty: {rows}x{cols} board cannot hold {mines} mines")]
    InvalidDifficulty {
        rows: Coord,
        cols: Coord,
        mines: CellCount,
    },
    #[error("Unrecognized difficulty, expected a preset name or ROWSxCOLSxMINES")]
    ParseDifficulty,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
}

pub type Result<T> = core::result::Result<T, GameError>;
