use crate::board::available_moves;
use crate::session_rng::SessionRng;
use crate::types::{Board, CELL_COUNT, Difficulty, Mark};
use crate::win_detector::check_winner;

/// Picks the bot's move for the given difficulty, or `None` if the board
/// is full. Easy and medium blend in a random move with a fixed probability;
/// hard always plays the minimax result.
pub fn calculate_move(
    board: &Board,
    bot_mark: Mark,
    difficulty: Difficulty,
    rng: &mut SessionRng,
) -> Option<usize> {
    let chance = difficulty.random_move_chance();
    if chance > 0.0 && rng.random::<f64>() < chance {
        return calculate_random_move(board, rng);
    }
    calculate_minimax_move(board, bot_mark)
}

fn calculate_random_move(board: &Board, rng: &mut SessionRng) -> Option<usize> {
    let moves = available_moves(board);
    if moves.is_empty() {
        return None;
    }
    Some(moves[rng.random_range(0..moves.len())])
}

/// Exhaustive search over every empty cell. Ties keep the first cell in
/// index order, so the result is deterministic for a given board.
pub fn calculate_minimax_move(board: &Board, bot_mark: Mark) -> Option<usize> {
    let mut board = *board;
    let mut best_move = None;
    let mut best_score = i32::MIN;

    for index in 0..CELL_COUNT {
        if board[index] != Mark::Empty {
            continue;
        }
        board[index] = bot_mark;
        let score = minimax(&mut board, bot_mark, 0, false);
        board[index] = Mark::Empty;

        if score > best_score {
            best_score = score;
            best_move = Some(index);
        }
    }

    best_move
}

/// Scores `board` from `bot_mark`'s point of view. Wins score `10 - depth`
/// and losses `depth - 10`, so among equally optimal lines the search
/// prefers the fastest win and the slowest loss.
pub fn minimax(board: &mut Board, bot_mark: Mark, depth: i32, is_maximizing: bool) -> i32 {
    let outcome = check_winner(board);
    if let Some(winner) = outcome.winner {
        return if winner == bot_mark {
            10 - depth
        } else {
            depth - 10
        };
    }
    if outcome.is_draw {
        return 0;
    }

    if is_maximizing {
        let mut best_score = i32::MIN;
        for index in 0..CELL_COUNT {
            if board[index] != Mark::Empty {
                continue;
            }
            board[index] = bot_mark;
            let score = minimax(board, bot_mark, depth + 1, false);
            board[index] = Mark::Empty;
            best_score = best_score.max(score);
        }
        best_score
    } else {
        let opponent_mark = bot_mark.opponent().unwrap();
        let mut best_score = i32::MAX;
        for index in 0..CELL_COUNT {
            if board[index] != Mark::Empty {
                continue;
            }
            board[index] = opponent_mark;
            let score = minimax(board, bot_mark, depth + 1, true);
            board[index] = Mark::Empty;
            best_score = best_score.min(score);
        }
        best_score
    }
}
