//! Merging background, text layer and audio into one encodable unit.

/// Single-use compositor state machine.
pub mod compositor;
