//! Render feed: a plain-data view of the session for external renderers.
//!
//! The core exposes cell tags and flat indexes only; screen coordinates and
//! color codes are the renderer's business. `snapshot_into` writes into a
//! caller-owned snapshot so the render loop allocates nothing per frame.

use crate::catalog::shape_at;
use crate::session::GameSession;
use crate::types::{Cell, Phase, B_SIZE, EMPTY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Flat board cells, border included.
    pub board: [Cell; B_SIZE],
    /// Absolute flat indexes of the active piece's cells.
    pub active_cells: [i32; 4],
    pub active_color: Cell,
    /// Relative offsets of the lookahead shape, for the preview box.
    pub preview_offsets: [i32; 4],
    pub preview_color: Cell,
    pub points: u64,
    pub level: u32,
    pub lines: u32,
    pub phase: Phase,
}

impl SessionSnapshot {
    /// Final score as recorded by the persistence collaborator.
    pub fn total(&self) -> u64 {
        self.points.saturating_mul(self.level as u64)
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            board: [EMPTY; B_SIZE],
            active_cells: [0; 4],
            active_color: EMPTY,
            preview_offsets: [0; 4],
            preview_color: EMPTY,
            points: 0,
            level: 1,
            lines: 0,
            phase: Phase::Falling,
        }
    }
}

impl GameSession {
    /// Write the current state into `out`.
    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        out.board.copy_from_slice(self.board().cells());

        let active = self.active();
        out.active_cells = active.cells();
        out.active_color = active.color();

        let preview = shape_at(self.next_shape());
        out.preview_offsets = preview.offsets();
        out.preview_color = preview.color();

        out.points = self.points();
        out.level = self.level();
        out.lines = self.lines();
        out.phase = self.phase();
    }

    /// Allocate a fresh snapshot (convenience for tests and one-shot reads).
    pub fn snapshot(&self) -> SessionSnapshot {
        let mut s = SessionSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}
