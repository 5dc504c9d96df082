//! Board and piece primitives: grid cells, tetromino geometry, collision
//! queries and line clears. Everything here is pure data manipulation; game
//! flow lives in [`crate::engine`].

pub use self::{piece::*, playfield::*};

pub(crate) mod piece;
pub(crate) mod playfield;
