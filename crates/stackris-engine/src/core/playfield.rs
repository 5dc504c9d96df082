use serde::Serialize;

use super::piece::{Piece, PieceKind};

/// Total number of grid rows, including the hidden buffer row at index 0.
pub const ROWS: usize = 21;
/// Number of grid columns.
pub const COLS: usize = 10;

/// First row pieces can lock into; row 0 is the spawn buffer.
pub(crate) const FIRST_PLAYABLE_ROW: usize = 1;
/// Last playable row, as a signed coordinate for piece math.
pub(crate) const LAST_ROW: i16 = ROWS as i16 - 1;
/// Last playable column, as a signed coordinate for piece math.
pub(crate) const LAST_COL: i16 = COLS as i16 - 1;

/// A single cell of the playfield grid.
///
/// Cells carry identity, not just occupancy: a locked cell remembers which
/// piece kind produced it (renderers map kinds to colors), and the projected
/// landing position of the falling piece is tagged separately so it can be
/// drawn translucent and ignored by collision and line-clear logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Cell {
    /// Nothing here.
    #[default]
    Empty,
    /// Shadow (landing preview) of the falling piece.
    Shadow,
    /// Cell claimed by a piece of the given kind.
    Piece(PieceKind),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// True only for real piece material. Shadow cells are transparent to
    /// collision detection and never complete a row.
    #[must_use]
    pub fn is_filled(self) -> bool {
        matches!(self, Cell::Piece(_))
    }

    /// Numeric encoding used by the observation interface: 0 empty,
    /// 1 through 7 piece kinds, -1 shadow.
    #[must_use]
    pub fn as_tag(self) -> i8 {
        match self {
            Cell::Empty => 0,
            Cell::Shadow => -1,
            Cell::Piece(kind) => kind.as_tag() as i8,
        }
    }
}

/// The fixed 21 by 10 occupancy grid.
///
/// Row 0 is a buffer row where pieces spawn; rows 1 through 20 are visible
/// and playable. The falling piece and its shadow are drawn directly into the
/// grid and erased before every mutation, so the grid is always a complete
/// picture of the board for renderers.
#[derive(Debug, Clone)]
pub struct Playfield {
    cells: [[Cell; COLS]; ROWS],
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new()
    }
}

impl Playfield {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Direct cell read for renderers. No bounds protection; callers must
    /// stay within the declared grid.
    #[must_use]
    pub fn cell_at(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Bounds-tolerant occupancy probe used by collision queries. Anything
    /// outside the grid reads as unfilled; explicit floor checks are the
    /// caller's job.
    pub(crate) fn is_filled_at(&self, row: i16, col: i16) -> bool {
        if row < 0 || col < 0 {
            return false;
        }
        let (row, col) = (row as usize, col as usize);
        row < ROWS && col < COLS && self.cells[row][col].is_filled()
    }

    /// Stamps the piece's occupied cells into the grid, skipping any cell
    /// that falls outside the valid row/column range.
    pub fn draw(&mut self, piece: &Piece) {
        for (row, col, cell) in piece.occupied_cells() {
            if let Some(slot) = self.slot(row, col) {
                *slot = cell;
            }
        }
    }

    /// Clears the piece's occupied cells from the grid. Must be paired with
    /// [`Self::draw`] around every position or orientation change so no stale
    /// imprint survives.
    pub fn erase(&mut self, piece: &Piece) {
        for (row, col, _) in piece.occupied_cells() {
            if let Some(slot) = self.slot(row, col) {
                *slot = Cell::Empty;
            }
        }
    }

    fn slot(&mut self, row: i16, col: i16) -> Option<&mut Cell> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= ROWS || col >= COLS {
            return None;
        }
        Some(&mut self.cells[row][col])
    }

    /// Tests whether `candidate` can legally occupy its position.
    ///
    /// Bounds are rejected first. Occupied cells are then checked against a
    /// logical view of the grid with `active`'s imprint removed, so a piece
    /// that is still drawn on the grid is never considered to collide with
    /// itself. Shadow cells never collide.
    #[must_use]
    pub fn is_valid_position(&self, candidate: &Piece, active: &Piece) -> bool {
        if candidate.bottom_row() > LAST_ROW
            || candidate.left_column() < 0
            || candidate.right_column() > LAST_COL
        {
            return false;
        }
        for (row, col, _) in candidate.occupied_cells() {
            if row < 0 || row > LAST_ROW || col < 0 || col > LAST_COL {
                return false;
            }
            if active.occupies(row, col) {
                continue;
            }
            if self.is_filled_at(row, col) {
                return false;
            }
        }
        true
    }

    /// Scans the playable rows top to bottom, clearing every complete row and
    /// shifting the rows above it down by one. Returns how many rows cleared
    /// in this call. Row 1 is left empty after each shift.
    pub fn clear_completed_rows(&mut self) -> usize {
        let mut cleared = 0;
        for row in FIRST_PLAYABLE_ROW..ROWS {
            if self.cells[row].iter().all(|cell| cell.is_filled()) {
                cleared += 1;
                self.shift_rows_down(row - 1);
            }
        }
        cleared
    }

    /// Copies rows `1..=last_row` one step downward and empties row 1. The
    /// buffer row never shifts.
    fn shift_rows_down(&mut self, last_row: usize) {
        for row in (FIRST_PLAYABLE_ROW..=last_row).rev() {
            self.cells[row + 1] = self.cells[row];
        }
        self.cells[FIRST_PLAYABLE_ROW] = [Cell::Empty; COLS];
    }

    /// Builds a playfield from ASCII art for tests. `#` is a locked cell,
    /// `.` is empty. Lines map onto playable rows starting at row 1, top to
    /// bottom; omitted trailing rows stay empty.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let mut field = Self::new();
        let lines = art.lines().filter(|line| !line.trim().is_empty());
        for (i, line) in lines.enumerate() {
            let row = FIRST_PLAYABLE_ROW + i;
            assert!(row < ROWS, "too many rows in ASCII art");
            let cells: Vec<char> = line.chars().filter(|c| *c == '#' || *c == '.').collect();
            assert_eq!(
                cells.len(),
                COLS,
                "each row must have exactly {COLS} cells, got {} at line {i}",
                cells.len()
            );
            for (col, &ch) in cells.iter().enumerate() {
                if ch == '#' {
                    field.cells[row][col] = Cell::Piece(PieceKind::I);
                }
            }
        }
        field
    }

    #[cfg(test)]
    pub(crate) fn filled_cell_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| cell.is_filled())
            .count()
    }
}
