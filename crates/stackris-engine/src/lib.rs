//! Core logic for a falling-block puzzle game.
//!
//! The crate is deliberately shell-agnostic: it owns the playfield, the
//! falling piece and its landing shadow, the seven-bag randomizer, the hold
//! slot and the scoring, but draws nothing and schedules nothing. A frontend
//! feeds it logical [`Command`]s and periodic [`GameEngine::tick`] calls from
//! its own timer, then renders from [`GameEngine::cell_at`] and the typed
//! [`GameEvent`] queue.
//!
//! ```
//! use std::time::Duration;
//!
//! use stackris_engine::{Command, GameEngine};
//!
//! let mut engine = GameEngine::new();
//! engine.start_game(Duration::from_millis(800));
//!
//! engine.apply(Command::MoveLeft);
//! engine.apply(Command::Rotate);
//! engine.tick();
//!
//! assert!(engine.is_in_progress());
//! assert_eq!(engine.stats().score(), 0);
//! ```
//!
//! Deterministic runs seed the bag explicitly, or replace it entirely with a
//! scripted source:
//!
//! ```
//! use std::time::Duration;
//!
//! use stackris_engine::{BagSeed, GameEngine, PieceKind, ScriptedPieces, SevenBag};
//!
//! let mut seeded = GameEngine::with_source(SevenBag::with_seed(BagSeed::from_bytes([7; 16])));
//! seeded.start_game(Duration::from_millis(300));
//!
//! let mut scripted = GameEngine::with_source(ScriptedPieces::new([PieceKind::I, PieceKind::O]));
//! scripted.start_game(Duration::from_millis(300));
//! assert_eq!(scripted.current_piece().unwrap().kind(), PieceKind::I);
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
