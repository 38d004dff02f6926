//! Incremental engine for Conway's Game of Life on an unbounded grid.

pub mod engine;
pub mod pos;
pub mod rle;

pub use engine::{World, WorldWindow};
pub use pos::{ParsePosError, Pos2};
pub use rle::{FormatError, Pattern, PositionEncoder, RunLengthEncoded};
