//! Terminal rendering collaborator.
//!
//! Renders core snapshots into a framebuffer and flushes only the cells that
//! changed since the last frame, keeping the core free of any knowledge of
//! screen coordinates or color codes.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use gridfall_core as core;
pub use gridfall_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Viewport};
pub use renderer::TerminalRenderer;
