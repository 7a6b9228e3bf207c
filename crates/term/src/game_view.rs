//! GameView: maps a core snapshot into a terminal framebuffer.
//!
//! Pure (no I/O), so frame contents can be asserted in tests. Each board
//! cell is two terminal columns wide to compensate for glyph aspect ratio.
//! Row 0 of the board (the spawn overflow row) and the lowest border row are
//! not shown; everything between them is, border columns included.

use crate::core::{offset_rowcol, SessionSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Cell, GameEvent, KeyBindings, Phase, BORDER, B_COLS, B_ROWS, B_SIZE, EMPTY};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// First visible board row.
const TOP_ROW: usize = 1;
/// One past the last visible board row (hides only the lowest border row).
const BOTTOM_ROW: usize = B_ROWS - 1;

/// Screen offset of the board's top-left visible cell.
const MARGIN_X: u16 = 2;
const MARGIN_Y: u16 = 1;

/// Terminal columns per board cell.
const CELL_W: u16 = 2;

pub struct GameView;

impl Default for GameView {
    fn default() -> Self {
        Self
    }
}

impl GameView {
    /// Render a full frame: board, active piece, side panel, overlay.
    pub fn render_into(
        &self,
        snap: &SessionSnapshot,
        bindings: &KeyBindings,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear();

        self.render_board_into(&snap.board, fb);

        // Active piece, drawn over the board from its absolute cells.
        for &idx in snap.active_cells.iter() {
            let row = idx as usize / B_COLS;
            let col = idx as usize % B_COLS;
            self.draw_board_cell(fb, row, col, snap.active_color);
        }

        self.draw_panel(snap, bindings, fb);

        match snap.phase {
            Phase::Falling => {}
            Phase::Paused => self.draw_overlay(fb, "PAUSED", None),
            Phase::GameOver => {
                self.draw_overlay(fb, "YOU HAVE FAILED!", Some(snap));
            }
            Phase::Won => {
                self.draw_overlay(fb, "YOU HAVE WON", Some(snap));
            }
        }
    }

    /// Redraw only the board region from raw cell tags. Used mid-cascade so
    /// each clear and shift is visible as its own frame; the rest of the
    /// framebuffer is left as previously drawn.
    pub fn render_board_into(&self, cells: &[Cell; B_SIZE], fb: &mut FrameBuffer) {
        for row in TOP_ROW..BOTTOM_ROW {
            for col in 0..B_COLS {
                self.draw_board_cell(fb, row, col, cells[row * B_COLS + col]);
            }
        }
    }

    /// Convenience helper that allocates a fresh framebuffer.
    pub fn render(
        &self,
        snap: &SessionSnapshot,
        bindings: &KeyBindings,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, bindings, viewport, &mut fb);
        fb
    }

    fn draw_board_cell(&self, fb: &mut FrameBuffer, row: usize, col: usize, tag: Cell) {
        if !(TOP_ROW..BOTTOM_ROW).contains(&row) {
            return;
        }
        let x = MARGIN_X + (col as u16) * CELL_W;
        let y = MARGIN_Y + (row - TOP_ROW) as u16;
        fb.fill_rect(x, y, CELL_W, 1, ' ', tag_style(tag));
    }

    fn draw_panel(&self, snap: &SessionSnapshot, bindings: &KeyBindings, fb: &mut FrameBuffer) {
        let x = MARGIN_X + (B_COLS as u16) * CELL_W + 2;
        let label = CellStyle {
            bold: true,
            ..CellStyle::default()
        };
        let value = CellStyle::default();

        fb.put_str(x, 1, &format!("Level  : {}", snap.level), value);
        fb.put_str(x, 2, &format!("Points : {}", snap.points), value);
        fb.put_str(x, 3, &format!("Lines  : {}", snap.lines), value);

        fb.put_str(x, 5, "Preview:", label);
        for &offset in snap.preview_offsets.iter() {
            let (dr, dc) = offset_rowcol(offset);
            let px = x as i32 + (1 + dc) * CELL_W as i32;
            let py = 7 + dr;
            fb.fill_rect(
                px as u16,
                py as u16,
                CELL_W,
                1,
                ' ',
                tag_style(snap.preview_color),
            );
        }

        fb.put_str(x, 11, "Keys:", label);
        let help: [(GameEvent, &str); 8] = [
            (GameEvent::Left, "left"),
            (GameEvent::RotateBack, "reverse rotate"),
            (GameEvent::Rotate, "rotate"),
            (GameEvent::Right, "right"),
            (GameEvent::Drop, "drop"),
            (GameEvent::Pause, "pause"),
            (GameEvent::Restart, "restart"),
            (GameEvent::Quit, "quit"),
        ];
        for (i, (event, what)) in help.iter().enumerate() {
            if let Some(key) = bindings.key_for(*event) {
                let shown = if key == ' ' { "space".into() } else { key.to_string() };
                fb.put_str(x, 12 + i as u16, &format!("{:<5} - {}", shown, what), value);
            }
        }
    }

    fn draw_overlay(&self, fb: &mut FrameBuffer, text: &str, finals: Option<&SessionSnapshot>) {
        let board_w = (B_COLS as u16) * CELL_W;
        let mid_y = MARGIN_Y + ((BOTTOM_ROW - TOP_ROW) as u16) / 2;
        let style = CellStyle {
            fg: Rgb::new(255, 255, 255),
            bg: Rgb::new(0, 0, 0),
            bold: true,
        };

        let x = MARGIN_X + board_w.saturating_sub(text.chars().count() as u16) / 2;
        fb.put_str(x, mid_y, text, style);

        if let Some(snap) = finals {
            let score = format!("{} x {} = {}", snap.points, snap.level, snap.total());
            let sx = MARGIN_X + board_w.saturating_sub(score.chars().count() as u16) / 2;
            fb.put_str(sx, mid_y + 1, &score, style);
        }
    }
}

/// Style for one board cell tag: pieces render as colored background,
/// the border as grey, empty as the terminal background.
fn tag_style(tag: Cell) -> CellStyle {
    let bg = match tag {
        EMPTY => Rgb::new(0, 0, 0),
        1 => Rgb::new(200, 40, 40),
        2 => Rgb::new(60, 190, 80),
        3 => Rgb::new(210, 200, 60),
        4 => Rgb::new(70, 100, 220),
        5 => Rgb::new(190, 80, 200),
        6 => Rgb::new(70, 200, 200),
        7 => Rgb::new(220, 220, 220),
        BORDER => Rgb::new(110, 110, 110),
        _ => Rgb::new(160, 160, 160),
    };
    CellStyle {
        fg: Rgb::new(0, 0, 0),
        bg,
        bold: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameSession;

    fn frame(session: &GameSession) -> FrameBuffer {
        let view = GameView::default();
        view.render(
            &session.snapshot(),
            &KeyBindings::default(),
            Viewport::new(80, 24),
        )
    }

    fn cell_bg(fb: &FrameBuffer, x: u16, y: u16) -> Rgb {
        fb.get(x, y).unwrap().style.bg
    }

    #[test]
    fn test_border_columns_are_grey() {
        let session = GameSession::new(12345);
        let fb = frame(&session);

        let grey = tag_style(BORDER).bg;
        // Left border, first visible row.
        assert_eq!(cell_bg(&fb, MARGIN_X, MARGIN_Y), grey);
        // Right border.
        let right_x = MARGIN_X + (B_COLS as u16 - 1) * CELL_W;
        assert_eq!(cell_bg(&fb, right_x, MARGIN_Y), grey);
        // Bottom border row (board row 21).
        let bottom_y = MARGIN_Y + (21 - TOP_ROW) as u16;
        assert_eq!(cell_bg(&fb, MARGIN_X + CELL_W, bottom_y), grey);
    }

    #[test]
    fn test_active_piece_cells_are_drawn() {
        let session = GameSession::new(12345);
        let fb = frame(&session);
        let color = tag_style(session.active().color()).bg;

        let mut found = 0;
        for &idx in session.active().cells().iter() {
            let row = idx as usize / B_COLS;
            let col = idx as usize % B_COLS;
            if row < TOP_ROW {
                continue;
            }
            let x = MARGIN_X + (col as u16) * CELL_W;
            let y = MARGIN_Y + (row - TOP_ROW) as u16;
            if cell_bg(&fb, x, y) == color {
                found += 1;
            }
        }
        assert!(found > 0, "no visible active cell rendered");
    }

    #[test]
    fn test_panel_shows_counters() {
        let session = GameSession::new(12345);
        let fb = frame(&session);

        let x = MARGIN_X + (B_COLS as u16) * CELL_W + 2;
        let row: String = (0..12).filter_map(|dx| fb.get(x + dx, 1)).map(|c| c.ch).collect();
        assert!(row.starts_with("Level  : 1"));
    }

    #[test]
    fn test_paused_overlay() {
        let mut session = GameSession::new(12345);
        session.step(GameEvent::Pause, &mut ());
        let fb = frame(&session);

        let mid_y = MARGIN_Y + ((BOTTOM_ROW - TOP_ROW) as u16) / 2;
        let chars: String = (0..(B_COLS as u16 * CELL_W))
            .filter_map(|dx| fb.get(MARGIN_X + dx, mid_y))
            .map(|c| c.ch)
            .collect();
        assert!(chars.contains("PAUSED"));
    }

    #[test]
    fn test_cascade_redraw_updates_board_region_only() {
        let session = GameSession::new(12345);
        let view = GameView::default();
        let mut fb = view.render(
            &session.snapshot(),
            &KeyBindings::default(),
            Viewport::new(80, 24),
        );

        let panel_x = MARGIN_X + (B_COLS as u16) * CELL_W + 2;
        let panel_before = fb.get(panel_x, 1);

        let mut board = crate::core::Board::new();
        board.set_cell(20, 3, 5);
        view.render_board_into(board.cells(), &mut fb);

        // Board region reflects the new cells; the panel is untouched.
        let x = MARGIN_X + 3 * CELL_W;
        let y = MARGIN_Y + (20 - TOP_ROW) as u16;
        assert_eq!(cell_bg(&fb, x, y), tag_style(5).bg);
        assert_eq!(fb.get(panel_x, 1), panel_before);
    }
}
