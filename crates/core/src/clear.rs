//! Line-clear engine: full-row detection, clearing, and compaction.
//!
//! Runs once per lock. The scan walks the playing rows top to bottom and,
//! after clearing a row and shifting everything above it down, re-examines
//! the same row index — the shift may have moved another full row into it.
//! The sink is notified after each clear and again after each shift, so a
//! renderer can show the cascade in steps rather than as a single jump.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::types::{END_PLAY_ROW, FIRST_PLAY_ROW};

/// Observer for intermediate board states during a clear cycle.
pub trait BoardSink {
    fn board_step(&mut self, board: &Board);
}

/// No-op sink for callers that only need the final board.
impl BoardSink for () {
    fn board_step(&mut self, _board: &Board) {}
}

/// Clear every full playing row, compacting after each one.
///
/// Returns the row indexes cleared this cycle, in scan order. An index can
/// appear twice when compaction drops a second full row into it.
pub fn clear_full_rows(board: &mut Board, sink: &mut impl BoardSink) -> ArrayVec<usize, 4> {
    let mut cleared = ArrayVec::new();
    let mut row = FIRST_PLAY_ROW;
    while row < END_PLAY_ROW {
        if !board.is_row_full(row) {
            row += 1;
            continue;
        }

        board.clear_row(row);
        sink.board_step(board);

        board.shift_rows_down(row);
        sink.board_step(board);

        cleared.push(row);
        // Do not advance: this index must be examined again.
    }
    cleared
}
