pub mod board;
pub mod bot;
pub mod game_state;
pub mod session_rng;
pub mod types;
pub mod win_detector;

pub use board::{available_moves, cell_index, empty_board, is_full};
pub use bot::{calculate_minimax_move, calculate_move, minimax};
pub use game_state::{GameState, GameStatus};
pub use session_rng::SessionRng;
pub use types::{BOARD_SIZE, Board, CELL_COUNT, Difficulty, Mark};
pub use win_detector::{Outcome, WIN_LINES, check_winner};
