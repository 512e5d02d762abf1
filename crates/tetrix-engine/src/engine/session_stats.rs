use serde::{Deserialize, Serialize};

use super::session_config::ScoringConfig;

/// Score, level and counters of a session.
///
/// # Scoring
///
/// - Locking a piece scores its hard-drop height plus
///   [`lock_bonus`](ScoringConfig::lock_bonus)
/// - Every removed line scores [`line_score`](ScoringConfig::line_score)
/// - The level starts at 1 and goes up every
///   [`pieces_per_level`](ScoringConfig::pieces_per_level) locked pieces
///
/// # Example
///
/// ```
/// use tetrix_engine::{ScoringConfig, SessionStats};
///
/// let scoring = ScoringConfig::default();
/// let mut stats = SessionStats::new();
/// stats.record_piece_drop(3, &scoring);
/// stats.record_lines_removed(2, &scoring);
///
/// assert_eq!(stats.score(), 3 + 7 + 2 * 10);
/// assert_eq!(stats.lines_removed(), 2);
/// assert_eq!(stats.pieces_dropped(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    score: usize,
    level: usize,
    lines_removed: usize,
    pieces_dropped: usize,
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStats {
    /// Creates the stats of a fresh game.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            lines_removed: 0,
            pieces_dropped: 0,
        }
    }

    /// Returns the accumulated score.
    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Returns the current level, starting at 1.
    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Returns the total number of removed lines.
    #[must_use]
    pub const fn lines_removed(&self) -> usize {
        self.lines_removed
    }

    /// Returns the number of pieces locked onto the board.
    #[must_use]
    pub const fn pieces_dropped(&self) -> usize {
        self.pieces_dropped
    }

    /// Counts a locked piece and adds its score.
    ///
    /// Returns `true` if the level went up.
    pub fn record_piece_drop(&mut self, drop_height: usize, scoring: &ScoringConfig) -> bool {
        self.pieces_dropped += 1;
        let level_up = self.pieces_dropped % scoring.pieces_per_level == 0;
        if level_up {
            self.level += 1;
        }
        self.score += drop_height + scoring.lock_bonus;
        level_up
    }

    pub fn record_lines_removed(&mut self, lines: usize, scoring: &ScoringConfig) {
        self.lines_removed += lines;
        self.score += scoring.line_score * lines;
    }
}
