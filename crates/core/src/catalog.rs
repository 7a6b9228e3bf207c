//! Shape catalog: the 19 piece orientations and their rotation links.
//!
//! Every orientation of every piece is its own catalog entry. An entry holds
//! the four cell offsets (as flat-index deltas against the board width), a
//! color tag, and the index of the entry that is one forward-rotation step
//! away. Forward rotation is therefore a direct successor read; backward
//! rotation searches the catalog for the entry pointing at the current one.
//!
//! Entries `0..7` are the spawn orientations of the seven base pieces, in
//! the order the random draw selects from.

use crate::types::{Cell, B_COLS};

/// Flat-index deltas for the eight neighbours of an anchor cell.
const TL: i32 = -(B_COLS as i32) - 1;
const TC: i32 = -(B_COLS as i32);
const TR: i32 = -(B_COLS as i32) + 1;
const ML: i32 = -1;
const MR: i32 = 1;
const BL: i32 = B_COLS as i32 - 1;
const BC: i32 = B_COLS as i32;
const BR: i32 = B_COLS as i32 + 1;

/// Number of catalog entries (7 spawn orientations + 12 rotation states).
pub const CATALOG_LEN: usize = 19;

/// Number of base shapes the spawner draws from.
pub const BASE_SHAPES: usize = 7;

/// One immutable catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    /// Catalog index of the next orientation in forward-rotation order.
    successor: usize,
    /// Relative cell offsets; the anchor cell itself is always offset 0.
    offsets: [i32; 4],
    color: Cell,
}

impl Shape {
    pub fn offsets(&self) -> [i32; 4] {
        self.offsets
    }

    pub fn color(&self) -> Cell {
        self.color
    }

    /// Absolute flat indexes of the four cells at `anchor`.
    pub fn cells(&self, anchor: i32) -> [i32; 4] {
        [
            anchor + self.offsets[0],
            anchor + self.offsets[1],
            anchor + self.offsets[2],
            anchor + self.offsets[3],
        ]
    }
}

const fn shape(successor: usize, o1: i32, o2: i32, o3: i32, color: Cell) -> Shape {
    Shape {
        successor,
        offsets: [0, o1, o2, o3],
        color,
    }
}

/// The full orientation table. Rotation cycles: S and Z alternate between
/// two states, O points at itself, T/J/L cycle through four, I through two.
static CATALOG: [Shape; CATALOG_LEN] = [
    shape(7, TL, TC, MR, 2),             // 0: S
    shape(8, TR, TC, ML, 3),             // 1: Z
    shape(9, ML, MR, BC, 1),             // 2: T
    shape(3, TL, TC, ML, 4),             // 3: O
    shape(12, ML, BL, MR, 5),            // 4: J
    shape(15, ML, BR, MR, 6),            // 5: L
    shape(18, ML, MR, 2, 7),             // 6: I, horizontal
    shape(0, TC, ML, BL, 2),             // 7: S, upright
    shape(1, TC, MR, BR, 3),             // 8: Z, upright
    shape(10, TC, MR, BC, 1),            // 9: T, pointing right
    shape(11, TC, ML, MR, 1),            // 10: T, pointing up
    shape(2, TC, ML, BC, 1),             // 11: T, pointing left
    shape(13, TC, BC, BR, 5),            // 12: J
    shape(14, TR, ML, MR, 5),            // 13: J
    shape(4, TL, TC, BC, 5),             // 14: J
    shape(16, TR, TC, BC, 6),            // 15: L
    shape(17, TL, MR, ML, 6),            // 16: L
    shape(5, TC, BC, BL, 6),             // 17: L
    shape(6, TC, BC, 2 * B_COLS as i32, 7), // 18: I, vertical
];

/// Look up a catalog entry.
pub fn shape_at(index: usize) -> &'static Shape {
    &CATALOG[index]
}

/// Index of the orientation one forward-rotation step from `index`.
pub fn rotation_successor(index: usize) -> usize {
    CATALOG[index].successor
}

/// Index of the orientation one backward-rotation step from `index`:
/// the entry whose successor is `index`. Linear search over the table.
pub fn rotation_predecessor(index: usize) -> usize {
    for (i, entry) in CATALOG.iter().enumerate() {
        if entry.successor == index {
            return i;
        }
    }
    // Every entry has exactly one predecessor; the cycles are closed.
    index
}

/// Split a flat-index offset into (row, col) deltas for preview layout.
pub fn offset_rowcol(offset: i32) -> (i32, i32) {
    let cols = B_COLS as i32;
    let mut row = offset.div_euclid(cols);
    let mut col = offset.rem_euclid(cols);
    if col > cols / 2 {
        col -= cols;
        row += 1;
    }
    (row, col)
}
