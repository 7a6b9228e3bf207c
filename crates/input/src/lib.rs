//! Key-mapping collaborator.
//!
//! Translates `crossterm` key events into [`types::GameEvent`]s by comparing
//! the pressed character against an externally supplied binding list. The
//! simulation core never sees raw key codes.

pub mod map;

pub use gridfall_types as types;

pub use map::{is_force_quit, map_key};
