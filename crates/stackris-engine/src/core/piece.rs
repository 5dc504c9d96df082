use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Serialize};

use super::playfield::{Cell, LAST_COL, LAST_ROW, Playfield};

/// Anchor row where new pieces appear. Row 0 is the hidden buffer row, so a
/// fresh piece pokes at most one cell into the visible field.
pub(crate) const SPAWN_ROW: i16 = 0;
/// Anchor column where new pieces appear, roughly centering every box.
pub(crate) const SPAWN_COL: i16 = 4;

/// The seven tetromino kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PieceKind {
    I = 1,
    J = 2,
    L = 3,
    O = 4,
    S = 5,
    T = 6,
    Z = 7,
}

impl PieceKind {
    /// Number of kinds.
    pub const LEN: usize = 7;

    /// All kinds, in tag order.
    pub const ALL: [PieceKind; PieceKind::LEN] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Numeric tag, 1 through 7. Renderers that index color tables by cell
    /// value share this encoding via [`Cell::as_tag`].
    #[must_use]
    pub const fn as_tag(self) -> u8 {
        self as u8
    }

    /// Zero-based index used by the bag's bookkeeping.
    pub(crate) const fn index(self) -> usize {
        self as usize - 1
    }

    /// Side length of this kind's square bounding box.
    #[must_use]
    pub const fn box_size(self) -> usize {
        match self {
            PieceKind::I => 4,
            PieceKind::O => 2,
            _ => 3,
        }
    }

    /// Canonical spawn-orientation pattern, padded into a 4x4 box. Only the
    /// top-left `box_size` square is meaningful; the rest stays empty.
    #[must_use]
    pub const fn pattern(self) -> [[Cell; 4]; 4] {
        const E: Cell = Cell::Empty;
        let p = Cell::Piece(self);
        match self {
            PieceKind::I => [[E, E, E, E], [p, p, p, p], [E, E, E, E], [E, E, E, E]],
            PieceKind::J => [[p, E, E, E], [p, p, p, E], [E, E, E, E], [E, E, E, E]],
            PieceKind::L => [[E, E, p, E], [p, p, p, E], [E, E, E, E], [E, E, E, E]],
            PieceKind::O => [[p, p, E, E], [p, p, E, E], [E, E, E, E], [E, E, E, E]],
            PieceKind::S => [[E, p, p, E], [p, p, E, E], [E, E, E, E], [E, E, E, E]],
            PieceKind::T => [[E, p, E, E], [p, p, p, E], [E, E, E, E], [E, E, E, E]],
            PieceKind::Z => [[p, p, E, E], [E, p, p, E], [E, E, E, E], [E, E, E, E]],
        }
    }
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R>(&self, rng: &mut R) -> PieceKind
    where
        R: Rng + ?Sized,
    {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

/// A tetromino with a position on the grid.
///
/// The piece stores its own cell matrix rather than deriving it from an
/// orientation lookup, so rotation is a matrix transform and the shadow
/// variant can reuse the same geometry with different cell tags. The anchor
/// is the grid position of the box's top-left corner and is signed: it may
/// sit one cell outside the grid when an edge column or row of the box is
/// empty, or after the corrective spawn shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    row: i16,
    col: i16,
    size: usize,
    cells: [[Cell; 4]; 4],
    orientation: u8,
    active: bool,
}

impl Piece {
    /// A fresh piece of the given kind at the spawn position, falling.
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            row: SPAWN_ROW,
            col: SPAWN_COL,
            size: kind.box_size(),
            cells: kind.pattern(),
            orientation: 0,
            active: true,
        }
    }

    /// A landing-preview twin: same kind and orientation, occupied cells
    /// re-tagged as [`Cell::Shadow`]. The caller positions it.
    pub(crate) fn shadow(kind: PieceKind, orientation: u8) -> Self {
        let mut piece = Self::new(kind);
        for _ in 0..orientation {
            piece.apply_rotation();
        }
        for row in &mut piece.cells {
            for cell in row {
                if !cell.is_empty() {
                    *cell = Cell::Shadow;
                }
            }
        }
        piece.active = false;
        piece
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn row(&self) -> i16 {
        self.row
    }

    #[must_use]
    pub fn col(&self) -> i16 {
        self.col
    }

    /// Quarter turns applied so far, modulo 4.
    #[must_use]
    pub fn orientation(&self) -> u8 {
        self.orientation
    }

    /// Whether the piece is still falling. A resting piece keeps one tick of
    /// grace before it locks and may re-activate if moved off its support.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub(crate) fn set_position(&mut self, row: i16, col: i16) {
        self.row = row;
        self.col = col;
    }

    /// A copy of this piece shifted by the given deltas.
    #[must_use]
    pub(crate) fn translated(&self, d_row: i16, d_col: i16) -> Self {
        let mut piece = self.clone();
        piece.set_position(self.row + d_row, self.col + d_col);
        piece
    }

    /// Local cell read. Any index outside the bounding box reads as empty,
    /// so callers can probe neighbors without range checks.
    #[must_use]
    pub fn square_at(&self, row: i16, col: i16) -> Cell {
        if row < 0 || col < 0 {
            return Cell::Empty;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= self.size || col >= self.size {
            return Cell::Empty;
        }
        self.cells[row][col]
    }

    /// Whether the piece occupies the given grid cell.
    pub(crate) fn occupies(&self, row: i16, col: i16) -> bool {
        !self.square_at(row - self.row, col - self.col).is_empty()
    }

    /// Occupied cells in grid coordinates, with their cell tags.
    pub(crate) fn occupied_cells(&self) -> impl Iterator<Item = (i16, i16, Cell)> + '_ {
        (0..self.size).flat_map(move |r| {
            (0..self.size).filter_map(move |c| {
                let cell = self.cells[r][c];
                (!cell.is_empty()).then(|| (self.row + r as i16, self.col + c as i16, cell))
            })
        })
    }

    /// Grid row of the piece's lowest occupied cell.
    #[must_use]
    pub fn bottom_row(&self) -> i16 {
        let mut bottom = 0;
        for r in 0..self.size {
            for c in 0..self.size {
                if !self.cells[r][c].is_empty() {
                    bottom = r;
                }
            }
        }
        self.row + bottom as i16
    }

    /// Grid column of the piece's leftmost occupied cell.
    #[must_use]
    pub fn left_column(&self) -> i16 {
        let mut left = 0;
        for c in (0..self.size).rev() {
            for r in 0..self.size {
                if !self.cells[r][c].is_empty() {
                    left = c;
                }
            }
        }
        self.col + left as i16
    }

    /// Grid column of the piece's rightmost occupied cell.
    #[must_use]
    pub fn right_column(&self) -> i16 {
        let mut right = 0;
        for c in 0..self.size {
            for r in 0..self.size {
                if !self.cells[r][c].is_empty() {
                    right = c;
                }
            }
        }
        self.col + right as i16
    }

    /// The cell matrix after one clockwise quarter turn.
    fn rotated_cells(&self) -> [[Cell; 4]; 4] {
        let mut rotated = [[Cell::Empty; 4]; 4];
        for r in 0..self.size {
            for c in 0..self.size {
                rotated[c][self.size - 1 - r] = self.cells[r][c];
            }
        }
        rotated
    }

    /// Commits one clockwise quarter turn. The engine erases the piece from
    /// the grid around this call; use [`Self::can_rotate`] first.
    pub(crate) fn apply_rotation(&mut self) {
        self.cells = self.rotated_cells();
        self.orientation = (self.orientation + 1) % 4;
    }

    /// Whether a clockwise quarter turn is legal here. No wall kicks: the
    /// rotated box must stay inside the side walls, keep its lowest cell
    /// above row 19, and no newly-occupied cell may land on a filled grid
    /// cell. Cells occupied both before and after the turn are exempt, so
    /// the piece's own imprint never blocks its rotation.
    #[must_use]
    pub fn can_rotate(&self, field: &Playfield) -> bool {
        let mut candidate = self.clone();
        candidate.cells = self.rotated_cells();
        if candidate.left_column() < 0
            || candidate.right_column() > LAST_COL
            || candidate.bottom_row() >= LAST_ROW - 1
        {
            return false;
        }
        for r in 0..self.size {
            for c in 0..self.size {
                if !candidate.cells[r][c].is_empty()
                    && self.cells[r][c].is_empty()
                    && field.is_filled_at(self.row + r as i16, self.col + c as i16)
                {
                    return false;
                }
            }
        }
        true
    }

    /// Whether the piece is resting: for each occupied column, probe the
    /// grid cell just below that column's lowest cell. A probe outside the
    /// playable rows or into a filled cell means the piece cannot fall
    /// further.
    #[must_use]
    pub fn hits_bottom_or_stack(&self, field: &Playfield) -> bool {
        if self.bottom_row() > LAST_ROW {
            return true;
        }
        for c in 0..self.size {
            let Some(lowest) = (0..self.size).rev().find(|&r| !self.cells[r][c].is_empty())
            else {
                continue;
            };
            let below = self.row + lowest as i16 + 1;
            let col = self.col + c as i16;
            if below > LAST_ROW || field.is_filled_at(below, col) {
                return true;
            }
        }
        false
    }
}
