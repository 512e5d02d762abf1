use std::time::Duration;

use rand::{Rng, RngCore};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{
    ConfigError,
    core::{board::Board, piece::ActivePiece},
};

use super::{
    session_config::SessionConfig, session_events::SessionEvents, session_stats::SessionStats,
    shape_seed::ShapeSeed,
};

/// Lifecycle of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
pub enum SessionState {
    /// Constructed, [`Session::start`] not called yet.
    NotStarted,
    /// A piece is falling.
    Running,
    /// Lines were just removed; the next piece spawns on the next tick.
    SettleDelay,
    /// A piece could not spawn. Only [`Session::start`] leaves this state.
    GameOver,
}

/// Bounding box of a piece's block offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceBounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl From<&ActivePiece> for PieceBounds {
    fn from(piece: &ActivePiece) -> Self {
        Self {
            min_x: piece.min_x(),
            max_x: piece.max_x(),
            min_y: piece.min_y(),
            max_y: piece.max_y(),
        }
    }
}

/// Everything a presentation layer needs to draw a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub stats: SessionStats,
    pub board: Board,
    pub current: ActivePiece,
    pub anchor: (i32, i32),
    pub next: ActivePiece,
    pub next_bounds: PieceBounds,
}

/// A game: the board, the falling piece, the queued next piece and the score.
///
/// The session has no clock. An external driver calls [`Session::tick`] every
/// [`Session::timer_interval`] and forwards player input to the movement
/// commands. Every command returns the [`SessionEvents`] it produced.
///
/// Shapes are drawn from `R`, a [`Pcg32`] seeded from the configuration
/// unless another generator is supplied with [`Session::with_rng`].
///
/// Block `i` of the current piece sits on board cell
/// `(anchor.x + piece.x(i), anchor.y - piece.y(i))`.
#[derive(Debug, Clone)]
pub struct Session<R = Pcg32> {
    config: SessionConfig,
    board: Board,
    current: ActivePiece,
    next: ActivePiece,
    x: i32,
    y: i32,
    stats: SessionStats,
    state: SessionState,
    pending: SessionEvents,
    rng: R,
}

impl Session<Pcg32> {
    /// Creates a session from `config`, seeding the shape generator from
    /// `config.seed` or from the thread-local generator.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        let seed: ShapeSeed = config.seed.unwrap_or_else(|| rand::rng().random());
        Self::with_rng(config, seed.rng())
    }
}

impl<R> Session<R>
where
    R: RngCore,
{
    /// Creates a session drawing its shapes from `rng`.
    ///
    /// `config.seed` is ignored.
    pub fn with_rng(config: SessionConfig, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut next = ActivePiece::EMPTY;
        next.set_random_shape(&mut rng);
        Ok(Self {
            board: Board::new(config.width, config.height),
            config,
            current: ActivePiece::EMPTY,
            next,
            x: 0,
            y: 0,
            stats: SessionStats::new(),
            state: SessionState::NotStarted,
            pending: SessionEvents::default(),
            rng,
        })
    }

    /// Returns the configuration the session was built with.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the board of placed blocks.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the falling piece, or the empty sentinel when there is none.
    #[must_use]
    pub fn current_piece(&self) -> ActivePiece {
        self.current
    }

    /// Returns the board position of the current piece's origin block.
    #[must_use]
    pub fn anchor(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Returns the piece that spawns next.
    #[must_use]
    pub fn next_piece(&self) -> ActivePiece {
        self.next
    }

    /// Returns the session statistics.
    #[must_use]
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Returns the current score.
    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    /// Returns the current level, starting at 1.
    #[must_use]
    pub fn level(&self) -> usize {
        self.stats.level()
    }

    /// Returns the number of lines removed so far.
    #[must_use]
    pub fn lines_removed(&self) -> usize {
        self.stats.lines_removed()
    }

    /// Returns the number of pieces locked so far.
    #[must_use]
    pub fn pieces_dropped(&self) -> usize {
        self.stats.pieces_dropped()
    }

    /// Gravity interval for the current level.
    #[must_use]
    pub fn timeout_time(&self) -> Duration {
        self.config.gravity.interval(self.level())
    }

    /// Interval the driver should wait before the next [`Session::tick`].
    #[must_use]
    pub fn timer_interval(&self) -> Duration {
        if self.state.is_settle_delay() {
            self.config.gravity.settle_delay()
        } else {
            self.timeout_time()
        }
    }

    /// Anchor the current piece would lock at after a hard drop.
    #[must_use]
    pub fn landing_anchor(&self) -> Option<(i32, i32)> {
        if !self.has_active_piece() {
            return None;
        }
        let mut y = self.y;
        while y > 0 && self.fits(&self.current, self.x, y - 1) {
            y -= 1;
        }
        Some((self.x, y))
    }

    /// Captures the state needed to draw the session.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            stats: self.stats.clone(),
            board: self.board.clone(),
            current: self.current,
            anchor: (self.x, self.y),
            next: self.next,
            next_bounds: PieceBounds::from(&self.next),
        }
    }

    /// Starts a new game.
    ///
    /// # Panics
    ///
    /// Panics if a game is in progress ([`SessionState::Running`] or
    /// [`SessionState::SettleDelay`]).
    pub fn start(&mut self) -> SessionEvents {
        assert!(
            self.state.is_not_started() || self.state.is_game_over(),
            "start() called while a game is in progress"
        );
        self.board.clear();
        self.stats = SessionStats::new();
        self.pending.score_changed(self.stats.score());
        self.pending.level_changed(self.stats.level());
        self.pending.lines_removed_changed(self.stats.lines_removed());
        self.pending.board_redraw_needed();
        self.new_piece();
        self.pending.set_accepted(true);
        self.take_events()
    }

    /// Advances the game by one timer period.
    ///
    /// Ends the settle delay by spawning the next piece, or moves the falling
    /// piece one row down. Does nothing before start or after game over.
    pub fn tick(&mut self) -> SessionEvents {
        match self.state {
            SessionState::SettleDelay => {
                self.new_piece();
                self.pending.set_accepted(true);
            }
            SessionState::Running => {
                self.one_line_down();
                self.pending.set_accepted(true);
            }
            SessionState::NotStarted | SessionState::GameOver => {}
        }
        self.take_events()
    }

    pub fn move_left(&mut self) -> SessionEvents {
        self.command(|this| this.try_move(this.current, this.x - 1, this.y))
    }

    pub fn move_right(&mut self) -> SessionEvents {
        self.command(|this| this.try_move(this.current, this.x + 1, this.y))
    }

    pub fn rotate_left(&mut self) -> SessionEvents {
        self.command(|this| this.try_move(this.current.rotated_left(), this.x, this.y))
    }

    pub fn rotate_right(&mut self) -> SessionEvents {
        self.command(|this| this.try_move(this.current.rotated_right(), this.x, this.y))
    }

    /// Moves the piece one row down, locking it if it cannot move.
    pub fn soft_drop_one(&mut self) -> SessionEvents {
        self.command(|this| {
            this.one_line_down();
            true
        })
    }

    /// Drops the piece as far as it goes and locks it.
    pub fn hard_drop(&mut self) -> SessionEvents {
        self.command(|this| {
            this.drop_down();
            true
        })
    }

    fn command<F>(&mut self, f: F) -> SessionEvents
    where
        F: FnOnce(&mut Self) -> bool,
    {
        if self.has_active_piece() {
            let accepted = f(self);
            self.pending.set_accepted(accepted);
        }
        self.take_events()
    }

    /// Drains the notifications recorded since the last command.
    ///
    /// Commands drain automatically; this is for callers of the lower-level
    /// operations ([`Session::try_move`], [`Session::one_line_down`],
    /// [`Session::drop_down`], [`Session::piece_dropped`]).
    pub fn take_events(&mut self) -> SessionEvents {
        std::mem::take(&mut self.pending)
    }

    fn has_active_piece(&self) -> bool {
        self.state.is_running() && !self.current.is_empty()
    }

    fn fits(&self, piece: &ActivePiece, x: i32, y: i32) -> bool {
        piece.blocks().all(|(dx, dy)| {
            self.board
                .contains(x + dx, y - dy)
                .is_some_and(|(cx, cy)| self.board.shape_at(cx, cy).is_empty())
        })
    }

    /// Makes `piece` at `(new_x, new_y)` the current piece if it fits.
    ///
    /// Returns `false` and changes nothing if there is no falling piece, or if
    /// any block would leave the board or overlap a placed block.
    pub fn try_move(&mut self, piece: ActivePiece, new_x: i32, new_y: i32) -> bool {
        self.has_active_piece() && self.place_if_fits(piece, new_x, new_y)
    }

    fn place_if_fits(&mut self, piece: ActivePiece, new_x: i32, new_y: i32) -> bool {
        if !self.fits(&piece, new_x, new_y) {
            return false;
        }
        self.current = piece;
        self.x = new_x;
        self.y = new_y;
        self.pending.board_redraw_needed();
        true
    }

    /// Moves the current piece one row down, or locks it where it is.
    pub fn one_line_down(&mut self) {
        if !self.has_active_piece() {
            return;
        }
        if !self.try_move(self.current, self.x, self.y - 1) {
            self.piece_dropped(0);
        }
    }

    /// Moves the current piece down until it rests, then locks it.
    pub fn drop_down(&mut self) {
        if !self.has_active_piece() {
            return;
        }
        let mut drop_height = 0;
        while self.y > 0 {
            if !self.try_move(self.current, self.x, self.y - 1) {
                break;
            }
            drop_height += 1;
        }
        self.piece_dropped(drop_height);
    }

    /// Locks the current piece onto the board and scores it.
    ///
    /// Full lines are removed afterwards. If any were, the session enters
    /// [`SessionState::SettleDelay`]; otherwise the next piece spawns at once.
    ///
    /// # Panics
    ///
    /// Panics if there is no falling piece.
    pub fn piece_dropped(&mut self, drop_height: usize) {
        assert!(self.has_active_piece(), "no falling piece to lock");
        self.board.place_piece(&self.current, self.x, self.y);
        self.pending.board_redraw_needed();

        if self.stats.record_piece_drop(drop_height, &self.config.scoring) {
            self.pending.level_changed(self.stats.level());
        }
        self.pending.score_changed(self.stats.score());

        let lines = self.board.remove_full_lines();
        if lines > 0 {
            self.stats.record_lines_removed(lines, &self.config.scoring);
            self.pending.lines_removed_changed(self.stats.lines_removed());
            self.pending.score_changed(self.stats.score());
            self.current = ActivePiece::EMPTY;
            self.state = SessionState::SettleDelay;
            return;
        }

        self.new_piece();
    }

    fn new_piece(&mut self) {
        self.current = self.next;
        self.next.set_random_shape(&mut self.rng);
        let (x, y) = self.spawn_anchor();
        if self.place_if_fits(self.current, x, y) {
            self.state = SessionState::Running;
        } else {
            self.current = ActivePiece::EMPTY;
            self.state = SessionState::GameOver;
            self.pending.game_over();
        }
    }

    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn spawn_anchor(&self) -> (i32, i32) {
        // Board dimensions are bounded by `SessionConfig::validate`.
        let width = self.board.width() as i32;
        let height = self.board.height() as i32;
        (width / 2 + 1, height - 1 + self.current.min_y())
    }
}
