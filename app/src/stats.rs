use chrono::Utc;
use engine::Difficulty;
use rand::Rng;
use ringbuffer::{AllocRingBuffer, RingBuffer};
use serde::{Deserialize, Serialize};

use crate::log;
use crate::storage::{HISTORY_KEY, KeyValueStore, STATS_KEY};

pub const MATCH_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Pvp,
    Ai,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    #[serde(rename = "X")]
    XWon,
    #[serde(rename = "O")]
    OWon,
    #[serde(rename = "draw")]
    Draw,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SideStats {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl SideStats {
    pub fn total(&self) -> u32 {
        self.wins + self.losses + self.draws
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PvpStats {
    pub player_x: SideStats,
    pub player_o: SideStats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiStats {
    pub easy: SideStats,
    pub medium: SideStats,
    pub hard: SideStats,
}

impl AiStats {
    pub fn bucket(&self, difficulty: Difficulty) -> &SideStats {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    fn bucket_mut(&mut self, difficulty: Difficulty) -> &mut SideStats {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Streaks {
    pub current: u32,
    pub best: u32,
}

/// Aggregate counters persisted as one JSON blob. Field names stay
/// camelCase so payloads written by older releases still parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameStats {
    pub pvp: PvpStats,
    pub ai: AiStats,
    pub streaks: Streaks,
    pub total_games: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub mode: GameMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    pub winner: MatchResult,
    pub player_x_name: String,
    pub player_o_name: String,
}

fn generate_record_id(timestamp: i64) -> String {
    let suffix: u32 = rand::rng().random();
    format!("{}-{:08x}", timestamp, suffix)
}

/// In-memory match bookkeeping: aggregate counters plus a bounded,
/// most-recent-first match log. Pure state machine, no I/O.
pub struct StatsTracker {
    stats: GameStats,
    history: AllocRingBuffer<MatchRecord>,
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsTracker {
    pub fn new() -> Self {
        Self::from_parts(GameStats::default(), Vec::new())
    }

    /// `history` is most-recent-first, the order the blob is stored in.
    pub fn from_parts(stats: GameStats, history: Vec<MatchRecord>) -> Self {
        let mut ring = AllocRingBuffer::new(MATCH_HISTORY_LIMIT);
        for record in history.into_iter().rev() {
            ring.enqueue(record);
        }
        Self {
            stats,
            history: ring,
        }
    }

    pub fn record_match(
        &mut self,
        mode: GameMode,
        winner: MatchResult,
        player_x_name: &str,
        player_o_name: &str,
        difficulty: Option<Difficulty>,
    ) -> MatchRecord {
        self.stats.total_games += 1;

        // The streak tracks mark X, the first-moving side. Draws leave it
        // untouched.
        match winner {
            MatchResult::XWon => {
                self.stats.streaks.current += 1;
                if self.stats.streaks.current > self.stats.streaks.best {
                    self.stats.streaks.best = self.stats.streaks.current;
                }
            }
            MatchResult::OWon => self.stats.streaks.current = 0,
            MatchResult::Draw => {}
        }

        match mode {
            GameMode::Pvp => {
                let pvp = &mut self.stats.pvp;
                match winner {
                    MatchResult::XWon => {
                        pvp.player_x.wins += 1;
                        pvp.player_o.losses += 1;
                    }
                    MatchResult::OWon => {
                        pvp.player_o.wins += 1;
                        pvp.player_x.losses += 1;
                    }
                    MatchResult::Draw => {
                        pvp.player_x.draws += 1;
                        pvp.player_o.draws += 1;
                    }
                }
            }
            GameMode::Ai => {
                if let Some(difficulty) = difficulty {
                    // Counted from the human's (X's) perspective: a bot win
                    // is the human's loss.
                    let bucket = self.stats.ai.bucket_mut(difficulty);
                    match winner {
                        MatchResult::XWon => bucket.wins += 1,
                        MatchResult::OWon => bucket.losses += 1,
                        MatchResult::Draw => bucket.draws += 1,
                    }
                }
            }
        }

        let timestamp = Utc::now().timestamp_millis();
        let record = MatchRecord {
            id: generate_record_id(timestamp),
            timestamp,
            mode,
            difficulty,
            winner,
            player_x_name: player_x_name.to_string(),
            player_o_name: player_o_name.to_string(),
        };

        self.history.enqueue(record.clone());
        record
    }

    /// Human (X) win percentage, rounded. Returns 0 before any game has
    /// been recorded for the requested scope.
    pub fn win_rate(&self, mode: GameMode, difficulty: Option<Difficulty>) -> u32 {
        match mode {
            GameMode::Pvp => {
                let side = &self.stats.pvp.player_x;
                percentage(side.wins, side.total())
            }
            GameMode::Ai => match difficulty {
                Some(difficulty) => {
                    let bucket = self.stats.ai.bucket(difficulty);
                    percentage(bucket.wins, bucket.total())
                }
                None => {
                    let ai = &self.stats.ai;
                    let wins = ai.easy.wins + ai.medium.wins + ai.hard.wins;
                    let total = ai.easy.total() + ai.medium.total() + ai.hard.total();
                    percentage(wins, total)
                }
            },
        }
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// Most-recent-first snapshot of the match log.
    pub fn history(&self) -> Vec<MatchRecord> {
        self.history.iter().rev().cloned().collect()
    }

    pub fn reset(&mut self) {
        self.stats = GameStats::default();
        self.history.clear();
    }
}

fn percentage(wins: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * wins as f64 / total as f64).round() as u32
}

/// Statistics aggregator bound to a persistence backend. The in-memory
/// state is updated first; saving is best-effort and a failed save never
/// rolls the counters back.
pub struct StatsService<S: KeyValueStore> {
    store: S,
    tracker: StatsTracker,
}

impl<S: KeyValueStore> StatsService<S> {
    pub async fn load(store: S) -> Self {
        let stats = match store.get(STATS_KEY).await {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(stats) => stats,
                Err(e) => {
                    log!("Failed to parse stats, falling back to defaults: {}", e);
                    GameStats::default()
                }
            },
            Ok(None) => GameStats::default(),
            Err(e) => {
                log!("Failed to load stats, falling back to defaults: {}", e);
                GameStats::default()
            }
        };

        let history = match store.get(HISTORY_KEY).await {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(history) => history,
                Err(e) => {
                    log!("Failed to parse match history, starting empty: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                log!("Failed to load match history, starting empty: {}", e);
                Vec::new()
            }
        };

        Self {
            store,
            tracker: StatsTracker::from_parts(stats, history),
        }
    }

    pub async fn record_match(
        &mut self,
        mode: GameMode,
        winner: MatchResult,
        player_x_name: &str,
        player_o_name: &str,
        difficulty: Option<Difficulty>,
    ) -> MatchRecord {
        let record =
            self.tracker
                .record_match(mode, winner, player_x_name, player_o_name, difficulty);
        self.persist().await;
        record
    }

    pub fn win_rate(&self, mode: GameMode, difficulty: Option<Difficulty>) -> u32 {
        self.tracker.win_rate(mode, difficulty)
    }

    pub fn stats(&self) -> &GameStats {
        self.tracker.stats()
    }

    pub fn history(&self) -> Vec<MatchRecord> {
        self.tracker.history()
    }

    pub async fn reset(&mut self) {
        self.tracker.reset();
        self.persist().await;
    }

    async fn persist(&self) {
        match serde_json::to_string(self.tracker.stats()) {
            Ok(json) => {
                if let Err(e) = self.store.set(STATS_KEY, json).await {
                    log!("Failed to save stats: {}", e);
                }
            }
            Err(e) => log!("Failed to serialize stats: {}", e),
        }

        match serde_json::to_string(&self.tracker.history()) {
            Ok(json) => {
                if let Err(e) = self.store.set(HISTORY_KEY, json).await {
                    log!("Failed to save match history: {}", e);
                }
            }
            Err(e) => log!("Failed to serialize match history: {}", e),
        }
    }
}
