use std::time::Duration;

use serde::Serialize;

/// Points per simultaneous line clear, indexed by cleared-row count.
const SCORE_TABLE: [u32; 5] = [0, 100, 300, 500, 800];
/// Announcement per simultaneous line clear, indexed by cleared-row count.
const CLEAR_MESSAGES: [&str; 5] = ["", "SINGLE!", "DOUBLE!!", "TRIPLE!!!", "TETRIS!!!!"];

/// Adaptive-mode schedule: crossing a score threshold sets the level and
/// shortens the gravity interval.
const LEVEL_SCHEDULE: [(u32, u32, u64); 4] = [
    (1000, 2, 500),
    (2000, 3, 300),
    (3000, 4, 200),
    (5000, 5, 100),
];

pub(crate) const GAME_OVER_MESSAGE: &str = "GAME OVER!";
const LEVEL_UP_MESSAGE: &str = "LEVEL UP!";

/// Running score, line and level counters, plus a transient announcement.
///
/// The message is a plain label for status displays. It is overwritten by
/// each new announcement, never queued, and a zero-line lock leaves it
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: u32,
    lines_cleared: u32,
    level: u32,
    message: String,
}

impl GameStats {
    /// Fresh stats at the given level. Level 0 means levels are not in play
    /// (fixed-gravity mode); adaptive games start at level 1.
    pub(crate) fn new(level: u32) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Records the outcome of one lock: adds the cleared rows to the line
    /// counter and, for 1 to 4 rows, awards points and announces the clear.
    pub(crate) fn record_clears(&mut self, cleared: usize) {
        self.lines_cleared += cleared as u32;
        if (1..SCORE_TABLE.len()).contains(&cleared) {
            self.score += SCORE_TABLE[cleared];
            self.message = CLEAR_MESSAGES[cleared].to_owned();
        }
    }

    /// Applies the adaptive level schedule after a score change. Each
    /// threshold fires exactly once, on the call where the score crosses it;
    /// returns the new gravity interval when one did. A level-up announcement
    /// replaces the clear label from the same lock.
    pub(crate) fn advance_level(&mut self, previous_score: u32) -> Option<Duration> {
        let mut gravity = None;
        for &(threshold, level, millis) in &LEVEL_SCHEDULE {
            if previous_score < threshold && self.score >= threshold {
                self.level = level;
                self.message = LEVEL_UP_MESSAGE.to_owned();
                gravity = Some(Duration::from_millis(millis));
            }
        }
        gravity
    }

    pub(crate) fn set_message(&mut self, message: &str) {
        self.message = message.to_owned();
    }
}
