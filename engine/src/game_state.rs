use crate::board::{empty_board, is_full};
use crate::types::{Board, CELL_COUNT, Mark};
use crate::win_detector::check_winner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    XWon,
    OWon,
    Draw,
}

/// One game in progress. Cells only ever go from empty to a mark; the board
/// is re-evaluated after every placement.
#[derive(Debug, Clone)]
pub struct GameState {
    pub board: Board,
    pub current_mark: Mark,
    pub status: GameStatus,
    pub winning_line: Option<[usize; 3]>,
    pub last_move: Option<usize>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Mark::X)
    }
}

impl GameState {
    pub fn new(first_mark: Mark) -> Self {
        Self {
            board: empty_board(),
            current_mark: first_mark,
            status: GameStatus::InProgress,
            winning_line: None,
            last_move: None,
        }
    }

    pub fn place_mark(&mut self, index: usize) -> Result<(), String> {
        if self.status != GameStatus::InProgress {
            return Err("Game is already over".to_string());
        }

        if index >= CELL_COUNT {
            return Err("Position out of bounds".to_string());
        }

        if self.board[index] != Mark::Empty {
            return Err("Cell is already marked".to_string());
        }

        self.board[index] = self.current_mark;
        self.last_move = Some(index);

        self.check_game_over();

        if self.status == GameStatus::InProgress {
            self.switch_turn();
        }

        Ok(())
    }

    fn switch_turn(&mut self) {
        self.current_mark = match self.current_mark {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
            Mark::Empty => unreachable!(),
        };
    }

    fn check_game_over(&mut self) {
        let outcome = check_winner(&self.board);

        if let Some(winner) = outcome.winner {
            self.winning_line = outcome.winning_line;
            self.status = match winner {
                Mark::X => GameStatus::XWon,
                Mark::O => GameStatus::OWon,
                Mark::Empty => unreachable!(),
            };
            return;
        }

        if is_full(&self.board) {
            self.status = GameStatus::Draw;
        }
    }

    pub fn winner(&self) -> Option<Mark> {
        match self.status {
            GameStatus::XWon => Some(Mark::X),
            GameStatus::OWon => Some(Mark::O),
            _ => None,
        }
    }
}
