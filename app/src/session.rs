use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use engine::{Difficulty, GameState, GameStatus, Mark, SessionRng, calculate_move};
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;

use crate::log;
use crate::stats::GameMode;

pub struct GameSessionConfig {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    /// Artificial pause before the bot's reply so it does not feel instant.
    pub bot_delay: Duration,
    pub first_mark: Mark,
    /// Fixed seed for reproducible bot behavior; `None` picks a random one.
    pub seed: Option<u64>,
}

impl Default for GameSessionConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::Ai,
            difficulty: Difficulty::Medium,
            bot_delay: Duration::from_millis(500),
            first_mark: Mark::X,
            seed: None,
        }
    }
}

/// One human-facing game. The human always plays X; in AI mode the bot
/// plays O and its reply is scheduled on a delayed task. The epoch counter
/// guards against a pending reply landing on a board that was reset in the
/// meantime: `reset` bumps the epoch and every scheduled task re-checks it
/// before touching the state.
pub struct GameSession {
    state: Arc<Mutex<GameState>>,
    mode: GameMode,
    difficulty: Difficulty,
    bot_mark: Mark,
    bot_delay: Duration,
    first_mark: Mark,
    rng: Arc<std::sync::Mutex<SessionRng>>,
    epoch: Arc<AtomicU64>,
    bot_task: std::sync::Mutex<Option<JoinHandle<()>>>,
    game_over: Arc<Notify>,
}

impl GameSession {
    pub fn new(config: GameSessionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SessionRng::new(seed),
            None => SessionRng::from_random(),
        };

        Self {
            state: Arc::new(Mutex::new(GameState::new(config.first_mark))),
            mode: config.mode,
            difficulty: config.difficulty,
            bot_mark: Mark::O,
            bot_delay: config.bot_delay,
            first_mark: config.first_mark,
            rng: Arc::new(std::sync::Mutex::new(rng)),
            epoch: Arc::new(AtomicU64::new(0)),
            bot_task: std::sync::Mutex::new(None),
            game_over: Arc::new(Notify::new()),
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Kicks off the bot when it has the opening move. Call once after
    /// construction and after every reset.
    pub async fn start(&self) {
        if self.mode == GameMode::Ai && self.is_bot_turn().await {
            self.schedule_bot_move();
        }
    }

    /// Applies a human move. In AI mode the bot's reply is scheduled
    /// automatically once the move lands.
    pub async fn place_mark(&self, index: usize) -> Result<GameStatus, String> {
        let status = {
            let mut state = self.state.lock().await;
            if self.mode == GameMode::Ai && state.current_mark == self.bot_mark {
                return Err("Not your turn".to_string());
            }
            state.place_mark(index)?;
            state.status
        };

        if status != GameStatus::InProgress {
            self.game_over.notify_waiters();
        } else if self.mode == GameMode::Ai {
            self.schedule_bot_move();
        }

        Ok(status)
    }

    /// Clears the board and invalidates any pending bot move.
    pub async fn reset(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        if let Some(task) = self.bot_task.lock().unwrap().take() {
            task.abort();
        }

        let mut state = self.state.lock().await;
        *state = GameState::new(self.first_mark);
    }

    pub async fn snapshot(&self) -> GameState {
        self.state.lock().await.clone()
    }

    pub async fn wait_game_over(&self) {
        self.game_over.notified().await;
    }

    async fn is_bot_turn(&self) -> bool {
        let state = self.state.lock().await;
        state.status == GameStatus::InProgress && state.current_mark == self.bot_mark
    }

    fn schedule_bot_move(&self) {
        let state = self.state.clone();
        let rng = self.rng.clone();
        let epoch = self.epoch.clone();
        let game_over = self.game_over.clone();
        let scheduled_epoch = epoch.load(Ordering::SeqCst);
        let bot_mark = self.bot_mark;
        let difficulty = self.difficulty;
        let delay = self.bot_delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            if epoch.load(Ordering::SeqCst) != scheduled_epoch {
                return;
            }

            let board = {
                let state = state.lock().await;
                if state.status != GameStatus::InProgress || state.current_mark != bot_mark {
                    return;
                }
                state.board
            };

            let calculated = tokio::task::spawn_blocking(move || {
                let mut rng = rng.lock().unwrap();
                calculate_move(&board, bot_mark, difficulty, &mut rng)
            })
            .await;

            let index = match calculated {
                Ok(Some(index)) => index,
                Ok(None) => return,
                Err(e) => {
                    log!("Bot move calculation failed: {}", e);
                    return;
                }
            };

            let mut state = state.lock().await;
            if epoch.load(Ordering::SeqCst) != scheduled_epoch {
                return;
            }
            if state.status != GameStatus::InProgress || state.current_mark != bot_mark {
                return;
            }
            if let Err(e) = state.place_mark(index) {
                log!("Bot move rejected: {}", e);
                return;
            }
            if state.status != GameStatus::InProgress {
                game_over.notify_waiters();
            }
        });

        *self.bot_task.lock().unwrap() = Some(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::CELL_COUNT;

    fn ai_session(difficulty: Difficulty, bot_delay: Duration) -> GameSession {
        GameSession::new(GameSessionConfig {
            mode: GameMode::Ai,
            difficulty,
            bot_delay,
            first_mark: Mark::X,
            seed: Some(42),
        })
    }

    fn mark_count(state: &GameState, mark: Mark) -> usize {
        state.board.iter().filter(|&&cell| cell == mark).count()
    }

    async fn wait_for_bot_reply(session: &GameSession) -> GameState {
        for _ in 0..100 {
            let state = session.snapshot().await;
            if mark_count(&state, Mark::O) == 1 {
                return state;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("bot never replied");
    }

    #[tokio::test]
    async fn test_bot_replies_after_delay() {
        let session = ai_session(Difficulty::Hard, Duration::from_millis(10));
        session.place_mark(0).await.unwrap();

        let state = wait_for_bot_reply(&session).await;
        assert_eq!(mark_count(&state, Mark::X), 1);
        assert_eq!(state.current_mark, Mark::X);
    }

    #[tokio::test]
    async fn test_reset_cancels_pending_bot_move() {
        let session = ai_session(Difficulty::Hard, Duration::from_millis(200));
        session.place_mark(0).await.unwrap();
        session.reset().await;

        tokio::time::sleep(Duration::from_millis(500)).await;
        let state = session.snapshot().await;
        assert_eq!(state.board, engine::empty_board());
        assert_eq!(state.current_mark, Mark::X);
    }

    #[tokio::test]
    async fn test_human_cannot_move_during_bot_turn() {
        let session = ai_session(Difficulty::Hard, Duration::from_millis(200));
        session.place_mark(0).await.unwrap();
        assert!(session.place_mark(1).await.is_err());
    }

    #[tokio::test]
    async fn test_pvp_never_schedules_bot() {
        let session = GameSession::new(GameSessionConfig {
            mode: GameMode::Pvp,
            bot_delay: Duration::from_millis(10),
            ..GameSessionConfig::default()
        });
        session.start().await;
        session.place_mark(0).await.unwrap();
        session.place_mark(4).await.unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        let state = session.snapshot().await;
        assert_eq!(mark_count(&state, Mark::Empty), CELL_COUNT - 2);
        assert_eq!(state.board[0], Mark::X);
        assert_eq!(state.board[4], Mark::O);
    }

    #[tokio::test]
    async fn test_bot_opens_when_it_moves_first() {
        let session = GameSession::new(GameSessionConfig {
            mode: GameMode::Ai,
            difficulty: Difficulty::Hard,
            bot_delay: Duration::from_millis(10),
            first_mark: Mark::O,
            seed: Some(7),
        });
        session.start().await;

        let state = wait_for_bot_reply(&session).await;
        assert_eq!(mark_count(&state, Mark::X), 0);
        assert_eq!(state.current_mark, Mark::X);
    }

    #[tokio::test]
    async fn test_wait_game_over_released_on_win() {
        let session = GameSession::new(GameSessionConfig {
            mode: GameMode::Pvp,
            ..GameSessionConfig::default()
        });
        for index in [0, 3, 1, 4] {
            session.place_mark(index).await.unwrap();
        }

        // The waiter registers before the winning move lands.
        let (_, status) = tokio::join!(session.wait_game_over(), async {
            session.place_mark(2).await.unwrap()
        });
        assert_eq!(status, GameStatus::XWon);
    }

    #[tokio::test]
    async fn test_full_game_against_hard_bot_reaches_terminal_state() {
        let session = ai_session(Difficulty::Hard, Duration::from_millis(1));

        loop {
            let state = session.snapshot().await;
            if state.status != GameStatus::InProgress {
                // Hard never loses.
                assert_ne!(state.status, GameStatus::XWon);
                break;
            }
            if state.current_mark == Mark::O {
                tokio::time::sleep(Duration::from_millis(5)).await;
                continue;
            }

            let index = engine::calculate_minimax_move(&state.board, Mark::X).unwrap();
            session.place_mark(index).await.unwrap();
        }
    }
}
