use serde::{Deserialize, Serialize};

pub const BOARD_SIZE: usize = 3;
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Row-major 3x3 board: row r, column c maps to index 3r + c.
pub type Board = [Mark; CELL_COUNT];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Empty,
    X,
    O,
}

impl Mark {
    pub fn opponent(&self) -> Option<Mark> {
        match self {
            Mark::X => Some(Mark::O),
            Mark::O => Some(Mark::X),
            Mark::Empty => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Probability that the bot plays a uniformly random legal move
    /// instead of the minimax result.
    pub fn random_move_chance(&self) -> f64 {
        match self {
            Difficulty::Easy => 0.7,
            Difficulty::Medium => 0.4,
            Difficulty::Hard => 0.0,
        }
    }
}
