//! Simulation core: pure, deterministic game logic with no I/O.
//!
//! Everything in this crate is driven by one event at a time and owns no
//! timers, terminals, or files, so a whole game can run headless in tests:
//!
//! - [`catalog`]: the 19 piece orientations with their rotation links
//! - [`board`]: flat grid with the border ring as the implicit bounds check
//! - [`clear`]: full-row detection and compaction with observer hooks
//! - [`rng`]: seeded LCG piece draw
//! - [`scoring`]: point table, overflow-checked awards, level progression
//! - [`session`]: the per-game state machine consuming [`types::GameEvent`]s
//! - [`snapshot`]: plain-data render feed
//!
//! Determinism: the same seed and event sequence reproduce the same game,
//! cell for cell and point for point.

pub mod board;
pub mod catalog;
pub mod clear;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use gridfall_types as types;

pub use board::Board;
pub use catalog::{
    offset_rowcol, rotation_predecessor, rotation_successor, shape_at, Shape, BASE_SHAPES,
    CATALOG_LEN,
};
pub use clear::{clear_full_rows, BoardSink};
pub use rng::SimpleRng;
pub use scoring::{line_clear_points, Award, Progress, ScoreReport};
pub use session::{ActivePiece, GameSession, Step};
pub use snapshot::SessionSnapshot;
