//! Game session: the piece controller and the event-driven state machine.
//!
//! A [`GameSession`] owns the board, the active and lookahead pieces, the
//! RNG, and the score counters for one game. The loop feeds it exactly one
//! [`GameEvent`] per step; everything else is internal.
//!
//! Phases: `Falling` accepts gravity and all commands; `Paused` swallows
//! everything except the pause toggle; `GameOver` and `Won` accept only
//! restart and quit. A gravity tick that cannot move the piece down locks
//! it, runs the clear cycle, applies scoring, and spawns the lookahead.

use crate::board::Board;
use crate::catalog::{rotation_predecessor, rotation_successor, shape_at};
use crate::clear::{clear_full_rows, BoardSink};
use crate::rng::SimpleRng;
use crate::scoring::{Award, Progress, ScoreReport};
use crate::types::{Cell, GameEvent, Phase, B_COLS, SPAWN_INDEX};

/// Flat-index delta of one row straight down.
const DOWN: i32 = B_COLS as i32;

/// The currently falling piece: a catalog index and a flat anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePiece {
    pub shape: usize,
    pub anchor: i32,
}

impl ActivePiece {
    /// Absolute flat indexes of the piece's four cells.
    pub fn cells(&self) -> [i32; 4] {
        shape_at(self.shape).cells(self.anchor)
    }

    pub fn color(&self) -> Cell {
        shape_at(self.shape).color()
    }
}

/// What the loop should do after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Quit,
}

/// One game's complete state.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    active: ActivePiece,
    next: usize,
    rng: SimpleRng,
    progress: Progress,
    phase: Phase,
}

impl GameSession {
    /// Start a session: draw the first active piece and the lookahead.
    pub fn new(seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let active = ActivePiece {
            shape: rng.next_base_shape(),
            anchor: SPAWN_INDEX,
        };
        let next = rng.next_base_shape();
        Self {
            board: Board::new(),
            active,
            next,
            rng,
            progress: Progress::new(),
            phase: Phase::Falling,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable board access for integration-test scaffolding.
    #[doc(hidden)]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn active(&self) -> ActivePiece {
        self.active
    }

    /// Catalog index of the lookahead piece.
    pub fn next_shape(&self) -> usize {
        self.next
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn points(&self) -> u64 {
        self.progress.points()
    }

    pub fn level(&self) -> u32 {
        self.progress.level()
    }

    pub fn lines(&self) -> u32 {
        self.progress.lines()
    }

    /// Final score for the persistence collaborator.
    pub fn score_report(&self) -> ScoreReport {
        self.progress.report()
    }

    /// Consume one event. The sink observes intermediate board states of a
    /// clear cascade triggered by a lock.
    pub fn step(&mut self, event: GameEvent, sink: &mut impl BoardSink) -> Step {
        match self.phase {
            Phase::Paused => {
                if event == GameEvent::Pause {
                    self.phase = Phase::Falling;
                }
                Step::Continue
            }
            Phase::GameOver | Phase::Won => match event {
                GameEvent::Restart => {
                    self.restart();
                    Step::Continue
                }
                GameEvent::Quit => Step::Quit,
                _ => Step::Continue,
            },
            Phase::Falling => match event {
                GameEvent::Tick => {
                    if !self.try_move(DOWN) {
                        self.lock(sink);
                    }
                    Step::Continue
                }
                GameEvent::Left => {
                    self.try_move(-1);
                    Step::Continue
                }
                GameEvent::Right => {
                    self.try_move(1);
                    Step::Continue
                }
                GameEvent::Rotate => {
                    self.try_rotate_backward();
                    Step::Continue
                }
                GameEvent::RotateBack => {
                    self.try_rotate_forward();
                    Step::Continue
                }
                GameEvent::Drop => {
                    self.hard_drop();
                    Step::Continue
                }
                GameEvent::Pause => {
                    self.phase = Phase::Paused;
                    Step::Continue
                }
                GameEvent::Restart => {
                    self.restart();
                    Step::Continue
                }
                GameEvent::Quit => Step::Quit,
            },
        }
    }

    /// Try to shift the anchor by a flat-index delta. On collision the
    /// anchor is unchanged and the call reports failure.
    fn try_move(&mut self, delta: i32) -> bool {
        let candidate = self.active.anchor + delta;
        if self.board.fits(shape_at(self.active.shape), candidate) {
            self.active.anchor = candidate;
            true
        } else {
            false
        }
    }

    /// Forward rotation: follow the catalog successor link.
    fn try_rotate_forward(&mut self) -> bool {
        self.try_substitute_shape(rotation_successor(self.active.shape))
    }

    /// Backward rotation: linear search for the catalog predecessor.
    fn try_rotate_backward(&mut self) -> bool {
        self.try_substitute_shape(rotation_predecessor(self.active.shape))
    }

    /// Swap in a rotated orientation at the same anchor; keep the current
    /// one when it does not fit. No wall-kick search.
    fn try_substitute_shape(&mut self, candidate: usize) -> bool {
        if self.board.fits(shape_at(candidate), self.active.anchor) {
            self.active.shape = candidate;
            true
        } else {
            false
        }
    }

    /// Descend until the piece rests, scoring one point per row. The piece
    /// locks on the next gravity tick, not here.
    fn hard_drop(&mut self) -> u32 {
        let mut rows = 0;
        while self.try_move(DOWN) {
            self.progress.award_drop_row();
            rows += 1;
        }
        rows
    }

    /// Write the piece into the board, run the clear cycle, apply scoring,
    /// and spawn the lookahead.
    fn lock(&mut self, sink: &mut impl BoardSink) {
        let shape = shape_at(self.active.shape);
        self.board.place(shape, self.active.anchor, shape.color());

        let cleared = clear_full_rows(&mut self.board, sink);
        if !cleared.is_empty() {
            if let Award::Overflow = self.progress.award_clears(cleared.len()) {
                self.phase = Phase::Won;
                return;
            }
        }

        self.spawn();
    }

    /// Promote the lookahead to active and draw a fresh lookahead. A piece
    /// that does not fit at the spawn anchor ends the game.
    fn spawn(&mut self) {
        self.active = ActivePiece {
            shape: self.next,
            anchor: SPAWN_INDEX,
        };
        self.next = self.rng.next_base_shape();

        if !self.board.fits(shape_at(self.active.shape), SPAWN_INDEX) {
            self.phase = Phase::GameOver;
        }
    }

    /// Fresh board and counters; the piece stream continues uninterrupted.
    fn restart(&mut self) {
        self.board = Board::new();
        self.progress = Progress::new();
        self.phase = Phase::Falling;
        self.spawn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{offset_rowcol, BASE_SHAPES};
    use crate::types::{END_PLAY_ROW, EMPTY};

    fn tick(session: &mut GameSession) -> Step {
        session.step(GameEvent::Tick, &mut ())
    }

    /// Drive the active piece to rest and lock it.
    fn drop_and_lock(session: &mut GameSession) {
        session.step(GameEvent::Drop, &mut ());
        tick(session);
    }

    #[test]
    fn test_new_session_starts_falling() {
        let session = GameSession::new(12345);
        assert_eq!(session.phase(), Phase::Falling);
        assert_eq!(session.points(), 0);
        assert_eq!(session.level(), 1);
        assert_eq!(session.lines(), 0);
        assert_eq!(session.active().anchor, SPAWN_INDEX);
        assert!(session.active().shape < BASE_SHAPES);
    }

    #[test]
    fn test_spawn_sequence_is_deterministic() {
        let seed = 987;
        let mut a = GameSession::new(seed);
        let mut b = GameSession::new(seed);
        for _ in 0..20 {
            assert_eq!(a.active().shape, b.active().shape);
            assert_eq!(a.next_shape(), b.next_shape());
            drop_and_lock(&mut a);
            drop_and_lock(&mut b);
            if a.phase() != Phase::Falling {
                break;
            }
        }
    }

    #[test]
    fn test_lookahead_becomes_next_active() {
        let mut session = GameSession::new(12345);
        let previewed = session.next_shape();
        drop_and_lock(&mut session);
        assert_eq!(session.active().shape, previewed);
    }

    #[test]
    fn test_move_left_right_round_trip() {
        let mut session = GameSession::new(12345);
        let start = session.active().anchor;

        session.step(GameEvent::Right, &mut ());
        assert_eq!(session.active().anchor, start + 1);
        session.step(GameEvent::Left, &mut ());
        assert_eq!(session.active().anchor, start);
    }

    #[test]
    fn test_move_rejected_at_wall() {
        let mut session = GameSession::new(12345);
        for _ in 0..B_COLS {
            session.step(GameEvent::Left, &mut ());
        }
        let resting = session.active().anchor;
        session.step(GameEvent::Left, &mut ());
        assert_eq!(session.active().anchor, resting);
    }

    #[test]
    fn test_rotate_round_trip_restores_shape() {
        let mut session = GameSession::new(12345);
        // Step away from the spawn row so every orientation has room.
        for _ in 0..4 {
            tick(&mut session);
        }
        let original = session.active().shape;

        if session.try_rotate_forward() {
            assert!(session.try_rotate_backward());
            assert_eq!(session.active().shape, original);
        }
    }

    #[test]
    fn test_rotate_rejected_against_occupied_cells() {
        let mut session = GameSession::new(12345);
        // Occupy every empty cell except the piece's own, leaving no room
        // for any other orientation.
        let own = session.active().cells();
        for idx in 0..crate::types::B_SIZE {
            if session.board.cell(idx) == EMPTY && !own.contains(&(idx as i32)) {
                session.board.set_cell(idx / B_COLS, idx % B_COLS, 9);
            }
        }
        let before = session.active();
        session.step(GameEvent::Rotate, &mut ());
        session.step(GameEvent::RotateBack, &mut ());
        // The square rotates onto itself; for every piece the anchor and
        // occupied cells must be unchanged.
        assert_eq!(session.active().cells(), before.cells());
        assert_eq!(session.active().anchor, before.anchor);
    }

    #[test]
    fn test_gravity_descends_one_row() {
        let mut session = GameSession::new(12345);
        let start = session.active().anchor;
        tick(&mut session);
        assert_eq!(session.active().anchor, start + DOWN);
    }

    #[test]
    fn test_drop_scores_one_point_per_row_without_locking() {
        let mut session = GameSession::new(12345);
        let start = session.active().anchor;
        session.step(GameEvent::Drop, &mut ());

        let dropped = (session.active().anchor - start) / DOWN;
        assert!(dropped > 0);
        assert_eq!(session.points(), dropped as u64);
        // The piece rests but has not locked: no lines, same piece falling.
        assert_eq!(session.lines(), 0);
        assert_eq!(session.phase(), Phase::Falling);
    }

    #[test]
    fn test_drop_then_tick_locks_and_spawns() {
        let mut session = GameSession::new(12345);
        session.step(GameEvent::Drop, &mut ());
        let resting = session.active().cells();
        tick(&mut session);

        for idx in resting {
            assert_ne!(session.board().cell(idx as usize), EMPTY);
        }
        assert_eq!(session.active().anchor, SPAWN_INDEX);
    }

    #[test]
    fn test_pause_swallows_everything_but_toggle() {
        let mut session = GameSession::new(12345);
        session.step(GameEvent::Pause, &mut ());
        assert_eq!(session.phase(), Phase::Paused);

        let frozen = session.active();
        assert_eq!(tick(&mut session), Step::Continue);
        session.step(GameEvent::Left, &mut ());
        session.step(GameEvent::Drop, &mut ());
        assert_eq!(session.step(GameEvent::Quit, &mut ()), Step::Continue);
        assert_eq!(session.active(), frozen);
        assert_eq!(session.phase(), Phase::Paused);

        session.step(GameEvent::Pause, &mut ());
        assert_eq!(session.phase(), Phase::Falling);
    }

    #[test]
    fn test_quit_while_falling() {
        let mut session = GameSession::new(12345);
        assert_eq!(session.step(GameEvent::Quit, &mut ()), Step::Quit);
    }

    #[test]
    fn test_game_over_when_spawn_blocked() {
        let mut session = GameSession::new(12345);
        // Occupy the spawn area without completing any row, so the lock
        // ahead of the next spawn clears nothing.
        for row in 0..4 {
            for col in 2..B_COLS - 2 {
                session.board.set_cell(row, col, 9);
            }
        }
        tick(&mut session);
        assert_eq!(session.phase(), Phase::GameOver);
    }

    #[test]
    fn test_game_over_accepts_only_restart_and_quit() {
        let mut session = GameSession::new(12345);
        session.phase = Phase::GameOver;

        tick(&mut session);
        session.step(GameEvent::Left, &mut ());
        session.step(GameEvent::Drop, &mut ());
        session.step(GameEvent::Pause, &mut ());
        assert_eq!(session.phase(), Phase::GameOver);

        session.step(GameEvent::Restart, &mut ());
        assert_eq!(session.phase(), Phase::Falling);
        assert_eq!(session.points(), 0);
    }

    #[test]
    fn test_restart_resets_board_and_counters() {
        let mut session = GameSession::new(12345);
        for _ in 0..5 {
            drop_and_lock(&mut session);
        }
        session.step(GameEvent::Restart, &mut ());

        assert_eq!(session.phase(), Phase::Falling);
        assert_eq!(session.points(), 0);
        assert_eq!(session.lines(), 0);
        assert_eq!(session.level(), 1);
        assert_eq!(session.board(), &Board::new());
        assert_eq!(session.active().anchor, SPAWN_INDEX);
    }

    #[test]
    fn test_won_on_score_overflow() {
        let mut session = GameSession::new(12345);
        session.progress = Progress::with_points(u64::MAX - 10);
        fill_bottom_row_except_piece(&mut session);

        drop_and_lock(&mut session);

        assert_eq!(session.phase(), Phase::Won);
        // The refused award left the accumulator untouched.
        assert_eq!(session.points(), u64::MAX - 10);

        // Terminal phase: only restart and quit are honored.
        tick(&mut session);
        session.step(GameEvent::Left, &mut ());
        assert_eq!(session.phase(), Phase::Won);
        assert_eq!(session.step(GameEvent::Quit, &mut ()), Step::Quit);
    }

    #[test]
    fn test_line_clear_end_to_end() {
        let mut session = GameSession::new(12345);
        let level = session.level() as u64;
        fill_bottom_row_except_piece(&mut session);

        session.step(GameEvent::Drop, &mut ());
        let drop_bonus = session.points();
        tick(&mut session);

        assert_eq!(session.lines(), 1);
        assert_eq!(session.points(), drop_bonus + 40 * level);
        let bottom = END_PLAY_ROW - 1;
        assert!(!session.board().is_row_full(bottom));
    }

    /// Fill the bottom playing row except exactly the columns the active
    /// piece's lowest cells will land in, so its lock completes the row.
    fn fill_bottom_row_except_piece(session: &mut GameSession) {
        let bottom = END_PLAY_ROW - 1;
        let rowcols: Vec<(i32, i32)> = shape_at(session.active().shape)
            .offsets()
            .iter()
            .map(|&d| offset_rowcol(d))
            .collect();
        let lowest = rowcols.iter().map(|rc| rc.0).max().unwrap();
        let landing_cols: Vec<usize> = rowcols
            .iter()
            .filter(|rc| rc.0 == lowest)
            .map(|rc| (rc.1 + 5) as usize)
            .collect();

        session.board.fill_row(bottom, 8);
        for col in landing_cols {
            session.board.set_cell(bottom, col, EMPTY);
        }
    }
}
