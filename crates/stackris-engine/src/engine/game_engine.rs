use std::{collections::VecDeque, time::Duration};

use arrayvec::ArrayVec;
use derive_more::IsVariant;

use crate::core::{Cell, Piece, PieceKind, Playfield};

use super::{
    event::GameEvent,
    game_stats::{GAME_OVER_MESSAGE, GameStats},
    seven_bag::{PieceSource, SevenBag},
};

/// Starting a game with this gravity interval selects adaptive mode, where
/// line clears raise the level and shorten the interval.
pub const ADAPTIVE_GRAVITY: Duration = Duration::from_millis(1000);

/// Number of upcoming pieces exposed to preview displays.
pub const NEXT_QUEUE_LEN: usize = 6;

/// Lifecycle of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum GamePhase {
    NotStarted,
    InProgress,
    GameOver,
}

/// Logical input commands, decoupled from any key binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
    Hold,
}

/// The game state machine.
///
/// Owns the playfield, the falling piece and its shadow, the hold slot, the
/// next-piece queue and the stats. Every operation takes `&mut self` and
/// finishes synchronously, so a shell serializes access however it likes
/// (a mutex around the engine, or a single-threaded command queue). The
/// engine never schedules anything itself: the caller runs the gravity
/// timer, calls [`GameEngine::tick`] on each expiry and re-reads
/// [`GameEngine::gravity_interval`], which adaptive mode shortens over time.
///
/// The falling piece and its shadow are drawn directly into the grid, so
/// [`GameEngine::cell_at`] always shows the complete board. Every mutation
/// follows the same discipline: erase the piece, change it, recompute the
/// shadow, redraw. Commands that cannot apply (piece against a wall,
/// rotation blocked, hold refused) return `false` and leave all state
/// untouched.
#[derive(Debug)]
pub struct GameEngine<S = SevenBag> {
    playfield: Playfield,
    current: Option<Piece>,
    shadow: Option<Piece>,
    next_queue: ArrayVec<PieceKind, NEXT_QUEUE_LEN>,
    held: Option<PieceKind>,
    already_held: bool,
    source: S,
    stats: GameStats,
    adaptive: bool,
    gravity: Duration,
    phase: GamePhase,
    events: VecDeque<GameEvent>,
}

impl GameEngine {
    /// An engine drawing from a freshly seeded seven-bag.
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(SevenBag::new())
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PieceSource> GameEngine<S> {
    /// An engine drawing pieces from the given source.
    pub fn with_source(source: S) -> Self {
        Self {
            playfield: Playfield::new(),
            current: None,
            shadow: None,
            next_queue: ArrayVec::new(),
            held: None,
            already_held: false,
            source,
            stats: GameStats::default(),
            adaptive: false,
            gravity: Duration::ZERO,
            phase: GamePhase::NotStarted,
            events: VecDeque::new(),
        }
    }

    /// Starts a new game at the given gravity interval, discarding any game
    /// in progress. Passing [`ADAPTIVE_GRAVITY`] selects adaptive mode.
    pub fn start_game(&mut self, gravity: Duration) {
        self.playfield = Playfield::new();
        self.source.reset();
        self.shadow = None;
        self.held = None;
        self.already_held = false;
        self.adaptive = gravity == ADAPTIVE_GRAVITY;
        self.gravity = gravity;
        self.stats = GameStats::new(u32::from(self.adaptive));
        self.phase = GamePhase::InProgress;

        self.current = Some(Piece::new(self.source.draw()));
        self.next_queue.clear();
        for _ in 0..NEXT_QUEUE_LEN {
            self.next_queue.push(self.source.draw());
        }
        self.refresh_shadow();
        self.draw_current();

        self.events.push_back(GameEvent::StatsChanged(self.stats.clone()));
        self.push_grid_changed();
    }

    /// Applies one logical input command. Returns whether it changed
    /// anything; refused commands leave the engine untouched.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::MoveLeft => self.move_piece(0, -1),
            Command::MoveRight => self.move_piece(0, 1),
            Command::SoftDrop => self.move_piece(1, 0),
            Command::Rotate => self.rotate(),
            Command::HardDrop => self.hard_drop(),
            Command::Hold => self.hold(),
        }
    }

    /// Moves the falling piece by the given deltas if the target position is
    /// legal. Horizontal moves and soft drops share this path. A legal move
    /// re-activates a resting piece that slid off its support.
    pub fn move_piece(&mut self, d_row: i16, d_col: i16) -> bool {
        if !self.phase.is_in_progress() {
            return false;
        }
        let Some(current) = self.current.as_mut() else {
            return false;
        };
        self.playfield.erase(current);
        let candidate = current.translated(d_row, d_col);
        let accepted = self.playfield.is_valid_position(&candidate, current);
        if accepted {
            current.set_position(candidate.row(), candidate.col());
            self.refresh_shadow();
        }
        self.reactivate_if_unsupported();
        self.draw_current();
        if accepted {
            self.push_grid_changed();
        }
        accepted
    }

    /// Rotates the falling piece one quarter turn clockwise if legal.
    pub fn rotate(&mut self) -> bool {
        if !self.phase.is_in_progress() {
            return false;
        }
        let Some(current) = self.current.as_mut() else {
            return false;
        };
        if !current.can_rotate(&self.playfield) {
            return false;
        }
        self.playfield.erase(current);
        current.apply_rotation();
        self.refresh_shadow();
        self.reactivate_if_unsupported();
        self.draw_current();
        self.push_grid_changed();
        true
    }

    /// Drops the falling piece to its shadow position and locks it
    /// immediately: lines are cleared and the next piece spawns in the same
    /// call, skipping the usual one-tick grace.
    pub fn hard_drop(&mut self) -> bool {
        if !self.phase.is_in_progress() {
            return false;
        }
        let Some(current) = self.current.as_mut() else {
            return false;
        };
        self.playfield.erase(current);
        while !current.hits_bottom_or_stack(&self.playfield) {
            current.set_position(current.row() + 1, current.col());
        }
        current.set_active(false);
        self.draw_current();
        self.finish_lock();
        true
    }

    /// Stashes the falling piece, or swaps it with the held one.
    ///
    /// Refused (returning `false`, state untouched) if hold was already used
    /// since the last spawn, or if the held kind matches the falling kind.
    /// The replacement piece starts over from the spawn position. Stashing
    /// into an empty slot spawns from the queue, which re-arms hold; a swap
    /// disarms it until the next spawn.
    pub fn hold(&mut self) -> bool {
        if !self.phase.is_in_progress() || self.already_held {
            return false;
        }
        let Some(kind) = self.current.as_ref().map(Piece::kind) else {
            return false;
        };
        if self.held == Some(kind) {
            return false;
        }

        if let Some(shadow) = self.shadow.take() {
            self.playfield.erase(&shadow);
        }
        if let Some(current) = self.current.take() {
            self.playfield.erase(&current);
        }
        match self.held.replace(kind) {
            None => self.spawn_next(),
            Some(previously_held) => {
                self.current = Some(Piece::new(previously_held));
                self.already_held = true;
                self.refresh_shadow();
                self.draw_current();
            }
        }
        self.push_grid_changed();
        true
    }

    /// Advances the game by one gravity step.
    ///
    /// An active piece falls one row, or is deactivated when resting; the
    /// deactivated piece locks on the *next* tick, so there is one interval
    /// of grace in which it can still move, rotate and slide off its
    /// support. The lock tick clears completed lines, updates the stats and
    /// spawns the next piece.
    pub fn tick(&mut self) {
        if !self.phase.is_in_progress() {
            return;
        }
        let Some(current) = self.current.as_mut() else {
            return;
        };
        if !current.is_active() {
            self.finish_lock();
            return;
        }
        if current.hits_bottom_or_stack(&self.playfield) {
            current.set_active(false);
        } else {
            self.playfield.erase(current);
            current.set_position(current.row() + 1, current.col());
            self.playfield.draw(current);
            if current.hits_bottom_or_stack(&self.playfield) {
                current.set_active(false);
            }
            self.push_grid_changed();
        }
    }

    /// Settles a locked piece: clear lines, score them, advance the adaptive
    /// level, then spawn the next piece.
    fn finish_lock(&mut self) {
        let cleared = self.playfield.clear_completed_rows();
        let previous_score = self.stats.score();
        self.stats.record_clears(cleared);
        if self.adaptive
            && let Some(gravity) = self.stats.advance_level(previous_score)
        {
            self.gravity = gravity;
        }
        self.events.push_back(GameEvent::StatsChanged(self.stats.clone()));
        self.spawn_next();
        self.push_grid_changed();
    }

    /// Takes the next piece from the queue and puts it on the board. A piece
    /// that spawns already resting gets one corrective shift into the buffer
    /// row and a re-test; if it still cannot fall, the game is over.
    fn spawn_next(&mut self) {
        let kind = self.next_queue.remove(0);
        self.next_queue.push(self.source.draw());
        self.already_held = false;
        // The locked piece has overwritten the old shadow's cells, so the
        // stale shadow is dropped, not erased.
        self.shadow = None;

        let mut current = Piece::new(kind);
        if current.hits_bottom_or_stack(&self.playfield) {
            if current.bottom_row() == 1 {
                current.set_position(current.row() - 1, current.col());
            }
            if current.hits_bottom_or_stack(&self.playfield) {
                self.playfield.draw(&current);
                self.current = Some(current);
                self.game_over();
                return;
            }
        }
        self.current = Some(current);
        self.refresh_shadow();
        self.draw_current();
    }

    fn game_over(&mut self) {
        self.stats.set_message(GAME_OVER_MESSAGE);
        self.phase = GamePhase::GameOver;
        self.events.push_back(GameEvent::StatsChanged(self.stats.clone()));
        self.push_grid_changed();
    }

    /// Recomputes and redraws the shadow under the current piece. Must be
    /// called while the current piece is erased from the grid, so the
    /// descent probe never collides with the piece's own imprint.
    fn refresh_shadow(&mut self) {
        if let Some(old) = self.shadow.take() {
            self.playfield.erase(&old);
        }
        let Some(current) = self.current.as_ref() else {
            return;
        };
        let mut shadow = Piece::shadow(current.kind(), current.orientation());
        shadow.set_position(current.row(), current.col());
        while !shadow.hits_bottom_or_stack(&self.playfield) {
            shadow.set_position(shadow.row() + 1, shadow.col());
        }
        self.playfield.draw(&shadow);
        self.shadow = Some(shadow);
    }

    /// A resting piece moved off its support starts falling again. Runs
    /// while the current piece is erased; only ever flips inactive to
    /// active, never the other way.
    fn reactivate_if_unsupported(&mut self) {
        if let Some(current) = self.current.as_mut()
            && !current.hits_bottom_or_stack(&self.playfield)
        {
            current.set_active(true);
        }
    }

    fn draw_current(&mut self) {
        if let Some(current) = &self.current {
            self.playfield.draw(current);
        }
    }

    /// Queues a grid notification, coalescing runs of them: consumers
    /// resample the whole grid anyway.
    fn push_grid_changed(&mut self) {
        if !matches!(self.events.back(), Some(GameEvent::GridChanged)) {
            self.events.push_back(GameEvent::GridChanged);
        }
    }

    /// Grid cell read over the full board, falling piece and shadow
    /// included. No bounds protection.
    #[must_use]
    pub fn cell_at(&self, row: usize, col: usize) -> Cell {
        self.playfield.cell_at(row, col)
    }

    #[must_use]
    pub fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    #[must_use]
    pub fn current_piece(&self) -> Option<&Piece> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn shadow_piece(&self) -> Option<&Piece> {
        self.shadow.as_ref()
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<PieceKind> {
        self.held
    }

    /// Upcoming pieces, soonest first.
    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.next_queue.iter().copied()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.phase.is_in_progress()
    }

    /// Current gravity interval. Callers re-read this after every tick;
    /// adaptive mode shortens it on level-ups.
    #[must_use]
    pub fn gravity_interval(&self) -> Duration {
        self.gravity
    }

    /// Pops the oldest queued event, if any.
    pub fn poll_event(&mut self) -> Option<GameEvent> {
        self.events.pop_front()
    }
}
