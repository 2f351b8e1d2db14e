use crate::types::{Board, Mark};

/// Rows, then columns, then the two diagonals. Table order is also the
/// tie-break for which line gets reported.
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Exactly one of `winner`, `is_draw`, or neither (game still in progress)
/// holds for any board produced by legal play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub winner: Option<Mark>,
    pub winning_line: Option<[usize; 3]>,
    pub is_draw: bool,
}

pub fn check_winner(board: &Board) -> Outcome {
    for line in WIN_LINES {
        let [a, b, c] = line;
        let mark = board[a];
        if mark != Mark::Empty && mark == board[b] && mark == board[c] {
            return Outcome {
                winner: Some(mark),
                winning_line: Some(line),
                is_draw: false,
            };
        }
    }

    Outcome {
        winner: None,
        winning_line: None,
        is_draw: board.iter().all(|&cell| cell != Mark::Empty),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::empty_board;

    fn board_from(x_cells: &[usize], o_cells: &[usize]) -> Board {
        let mut board = empty_board();
        for &index in x_cells {
            board[index] = Mark::X;
        }
        for &index in o_cells {
            board[index] = Mark::O;
        }
        board
    }

    #[test]
    fn test_empty_board_is_ongoing() {
        let outcome = check_winner(&empty_board());
        assert_eq!(outcome.winner, None);
        assert_eq!(outcome.winning_line, None);
        assert!(!outcome.is_draw);
    }

    #[test]
    fn test_top_row_win() {
        // X: 0, 1, 2 against O: 4, 5
        let board = board_from(&[0, 1, 2], &[4, 5]);
        let outcome = check_winner(&board);
        assert_eq!(outcome.winner, Some(Mark::X));
        assert_eq!(outcome.winning_line, Some([0, 1, 2]));
        assert!(!outcome.is_draw);
    }

    #[test]
    fn test_column_win() {
        let board = board_from(&[0, 4, 7], &[2, 5, 8]);
        let outcome = check_winner(&board);
        assert_eq!(outcome.winner, Some(Mark::O));
        assert_eq!(outcome.winning_line, Some([2, 5, 8]));
    }

    #[test]
    fn test_diagonal_wins() {
        let main = board_from(&[0, 4, 8], &[1, 2]);
        assert_eq!(check_winner(&main).winning_line, Some([0, 4, 8]));

        let anti = board_from(&[1, 3, 5], &[2, 4, 6]);
        let outcome = check_winner(&anti);
        assert_eq!(outcome.winner, Some(Mark::O));
        assert_eq!(outcome.winning_line, Some([2, 4, 6]));
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        // X O X
        // X O O
        // O X X
        let board = board_from(&[0, 2, 3, 7, 8], &[1, 4, 5, 6]);
        let outcome = check_winner(&board);
        assert_eq!(outcome.winner, None);
        assert_eq!(outcome.winning_line, None);
        assert!(outcome.is_draw);
    }

    #[test]
    fn test_partial_board_without_line_is_not_draw() {
        let board = board_from(&[0, 5], &[4]);
        let outcome = check_winner(&board);
        assert_eq!(outcome.winner, None);
        assert!(!outcome.is_draw);
    }

    #[test]
    fn test_win_on_full_board_is_not_draw() {
        // X completes 2,5,8 with the last move on a full board.
        let board = board_from(&[2, 5, 8, 3, 4], &[0, 1, 6, 7]);
        let outcome = check_winner(&board);
        assert_eq!(outcome.winner, Some(Mark::X));
        assert!(!outcome.is_draw);
    }
}
