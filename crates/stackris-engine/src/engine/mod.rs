//! Game flow: the piece randomizer, scoring, the event queue and the
//! [`GameEngine`] state machine that ties them together.
//!
//! - [`GameEngine`] - the state machine driven by commands and gravity ticks
//! - [`PieceSource`] / [`SevenBag`] / [`ScriptedPieces`] - piece generation
//! - [`GameStats`] - score, line and level counters with announcements
//! - [`GameEvent`] - change notifications drained by the shell
//!
//! # Game flow
//!
//! 1. Call [`GameEngine::start_game`] with a gravity interval
//! 2. Feed player input through [`GameEngine::apply`]
//! 3. Call [`GameEngine::tick`] from a timer, re-reading
//!    [`GameEngine::gravity_interval`] after each tick
//! 4. A piece that rests gets one tick of grace, then locks; completed rows
//!    clear and the next piece spawns
//! 5. Repeat until a spawned piece cannot fall, which ends the game

pub use self::{event::*, game_engine::*, game_stats::*, seven_bag::*};

mod event;
mod game_engine;
mod game_stats;
mod seven_bag;
