use criterion::{Criterion, SamplingMode, criterion_group, criterion_main};
use engine::{Mark, calculate_minimax_move, check_winner, empty_board};
use std::time::Duration;

fn bench_best_move_empty_board() {
    let board = empty_board();
    calculate_minimax_move(&board, Mark::O);
}

fn bench_best_move_mid_game() {
    let mut board = empty_board();
    for (index, mark) in [(0, Mark::X), (4, Mark::O), (8, Mark::X), (2, Mark::O)] {
        board[index] = mark;
    }
    calculate_minimax_move(&board, Mark::X);
}

fn bench_full_self_play() {
    let mut board = empty_board();
    let mut current_mark = Mark::X;

    loop {
        let outcome = check_winner(&board);
        if outcome.winner.is_some() || outcome.is_draw {
            break;
        }
        let index = calculate_minimax_move(&board, current_mark).unwrap();
        board[index] = current_mark;
        current_mark = current_mark.opponent().unwrap();
    }
}

fn bot_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("bot");

    group
        .sampling_mode(SamplingMode::Flat)
        .sample_size(10)
        .measurement_time(Duration::from_secs(30));

    group.bench_function("best_move_empty_board", |b| {
        b.iter(bench_best_move_empty_board)
    });

    group.bench_function("best_move_mid_game", |b| b.iter(bench_best_move_mid_game));

    group.bench_function("full_self_play", |b| b.iter(bench_full_self_play));

    group.finish();
}

criterion_group!(benches, bot_bench);
criterion_main!(benches);
