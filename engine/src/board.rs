use crate::types::{BOARD_SIZE, Board, CELL_COUNT, Mark};

pub fn empty_board() -> Board {
    [Mark::Empty; CELL_COUNT]
}

pub fn cell_index(row: usize, col: usize) -> usize {
    row * BOARD_SIZE + col
}

pub fn available_moves(board: &Board) -> Vec<usize> {
    let mut moves = Vec::new();
    for (index, &cell) in board.iter().enumerate() {
        if cell == Mark::Empty {
            moves.push(index);
        }
    }
    moves
}

pub fn is_full(board: &Board) -> bool {
    board.iter().all(|&cell| cell != Mark::Empty)
}
