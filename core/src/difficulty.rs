use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

/// Cells kept free of mines around the first reveal (the 3x3 block).
pub const START_ZONE_CELLS: CellCount = 9;

/// Board dimensions and mine count for one game.
///
/// Always valid: `rows > 0`, `cols > 0` and `0 < mines < rows * cols - 9`, which
/// leaves room for every mine outside the first reveal's 3x3 block.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "DifficultyFields")]
pub struct Difficulty {
    rows: Coord,
    cols: Coord,
    mines: CellCount,
}

impl Difficulty {
    pub const EASY: Self = Self::new_unchecked(8, 8, 10);
    pub const MEDIUM: Self = Self::new_unchecked(16, 16, 40);
    pub const HARD: Self = Self::new_unchecked(16, 30, 99);

    /// Named presets, in increasing order of difficulty.
    pub const PRESETS: [(&'static str, Self); 3] = [
        ("easy", Self::EASY),
        ("medium", Self::MEDIUM),
        ("hard", Self::HARD),
    ];

    const fn new_unchecked(rows: Coord, cols: Coord, mines: CellCount) -> Self {
        Self { rows, cols, mines }
    }

    pub fn new(rows: Coord, cols: Coord, mines: CellCount) -> Result<Self> {
        let max_mines = mult(rows, cols).saturating_sub(START_ZONE_CELLS);
        if rows == 0 || cols == 0 || mines == 0 || mines >= max_mines {
            return Err(GameError::InvalidDifficulty { rows, cols, mines });
        }
        Ok(Self::new_unchecked(rows, cols, mines))
    }

    /// Looks up a preset by name, ignoring ASCII case.
    pub fn preset(name: &str) -> Option<Self> {
        Self::PRESETS
            .iter()
            .find(|(preset, _)| preset.eq_ignore_ascii_case(name))
            .map(|&(_, difficulty)| difficulty)
    }

    /// Name of the matching preset, if any.
    pub fn preset_name(&self) -> Option<&'static str> {
        Self::PRESETS
            .iter()
            .find(|(_, difficulty)| *difficulty == *self)
            .map(|&(name, _)| name)
    }

    pub const fn rows(&self) -> Coord {
        self.rows
    }

    pub const fn cols(&self) -> Coord {
        self.cols
    }

    /// Board size as `(rows, cols)`.
    pub const fn size(&self) -> Coord2 {
        (self.rows, self.cols)
    }

    pub const fn mines(&self) -> CellCount {
        self.mines
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells() - self.mines
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::EASY
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.rows, self.cols, self.mines)
    }
}

/// Accepts a preset name (`"hard"`) or a custom `ROWSxCOLSxMINES` triple (`"9x9x10"`).
impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(preset) = Self::preset(s) {
            return Ok(preset);
        }

        let mut parts = s.split(['x', 'X']).map(str::trim);
        let (Some(rows), Some(cols), Some(mines), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(GameError::ParseDifficulty);
        };

        let rows = rows.parse().map_err(|_| GameError::ParseDifficulty)?;
        let cols = cols.parse().map_err(|_| GameError::ParseDifficulty)?;
        let mines = mines.parse().map_err(|_| GameError::ParseDifficulty)?;
        Self::new(rows, cols, mines)
    }
}

#[derive(Deserialize)]
struct DifficultyFields {
    rows: Coord,
    cols: Coord,
    mines: CellCount,
}

impl TryFrom<DifficultyFields> for Difficulty {
    type Error = GameError;

    fn try_from(fields: DifficultyFields) -> Result<Self> {
        Self::new(fields.rows, fields.cols, fields.mines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn presets_satisfy_invariant() {
        for (name, preset) in Difficulty::PRESETS {
            assert_eq!(
                Difficulty::new(preset.rows(), preset.cols(), preset.mines()),
                Ok(preset),
                "{name}"
            );
        }
    }

    #[test]
    fn preset_sizes() {
        assert_eq!(Difficulty::EASY.size(), (8, 8));
        assert_eq!(Difficulty::EASY.mines(), 10);
        assert_eq!(Difficulty::MEDIUM.size(), (16, 16));
        assert_eq!(Difficulty::MEDIUM.mines(), 40);
        assert_eq!(Difficulty::HARD.size(), (16, 30));
        assert_eq!(Difficulty::HARD.mines(), 99);
        assert_eq!(Difficulty::HARD.safe_cells(), 381);
        assert_eq!(Difficulty::default(), Difficulty::EASY);
    }

    #[test]
    fn rejects_empty_boards_and_mine_counts() {
        assert!(Difficulty::new(0, 8, 10).is_err());
        assert!(Difficulty::new(8, 0, 10).is_err());
        assert!(Difficulty::new(8, 8, 0).is_err());
    }

    #[test]
    fn rejects_mines_that_cannot_fit_outside_start_zone() {
        // 64 cells, 9 reserved for the first reveal: at most 54 mines
        assert!(Difficulty::new(8, 8, 54).is_ok());
        assert_eq!(
            Difficulty::new(8, 8, 55),
            Err(GameError::InvalidDifficulty {
                rows: 8,
                cols: 8,
                mines: 55
            })
        );
    }

    #[test]
    fn three_by_three_cannot_hold_any_mine() {
        assert!(Difficulty::new(3, 3, 1).is_err());
        assert!(Difficulty::new(1, 9, 1).is_err());
        assert!(Difficulty::new(1, 11, 1).is_ok());
    }

    #[test]
    fn preset_lookup_ignores_case() {
        assert_eq!(Difficulty::preset("Medium"), Some(Difficulty::MEDIUM));
        assert_eq!(Difficulty::preset("HARD"), Some(Difficulty::HARD));
        assert_eq!(Difficulty::preset("expert"), None);
        assert_eq!(Difficulty::HARD.preset_name(), Some("hard"));
        assert_eq!(Difficulty::new(9, 9, 10).unwrap().preset_name(), None);
    }

    #[test]
    fn parses_presets_and_custom_triples() {
        assert_eq!(" easy ".parse::<Difficulty>(), Ok(Difficulty::EASY));
        assert_eq!("16x30x99".parse::<Difficulty>(), Ok(Difficulty::HARD));
        assert_eq!("9X9X10".parse::<Difficulty>(), Difficulty::new(9, 9, 10));
        assert_eq!("9 x 9 x 10".parse::<Difficulty>(), Difficulty::new(9, 9, 10));
    }

    #[test]
    fn parse_distinguishes_bad_text_from_bad_values() {
        assert_eq!("9x9".parse::<Difficulty>(), Err(GameError::ParseDifficulty));
        assert_eq!("9x9x10x1".parse::<Difficulty>(), Err(GameError::ParseDifficulty));
        assert_eq!("ninexninexten".parse::<Difficulty>(), Err(GameError::ParseDifficulty));
        assert_eq!("300x9x10".parse::<Difficulty>(), Err(GameError::ParseDifficulty));
        assert!(matches!(
            "3x3x1".parse::<Difficulty>(),
            Err(GameError::InvalidDifficulty { .. })
        ));
    }

    #[test]
    fn display_round_trips_through_parse() {
        let custom = Difficulty::new(12, 20, 33).unwrap();
        assert_eq!(custom.to_string(), "12x20x33");
        assert_eq!(custom.to_string().parse::<Difficulty>(), Ok(custom));
    }

    #[test]
    fn deserialize_validates() {
        let parsed: Difficulty =
            serde_json::from_str(r#"{"rows":16,"cols":30,"mines":99}"#).unwrap();
        assert_eq!(parsed, Difficulty::HARD);

        let json = serde_json::to_string(&Difficulty::MEDIUM).unwrap();
        assert_eq!(json, r#"{"rows":16,"cols":16,"mines":40}"#);

        assert!(serde_json::from_str::<Difficulty>(r#"{"rows":3,"cols":3,"mines":1}"#).is_err());
    }
}
