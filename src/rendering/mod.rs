//! # Rendering Module
//!
//! Read-only views of the game for a front end to draw. Nothing here talks to
//! a terminal or a window; [`GridSnapshot::to_ascii`] exists for debugging and
//! for the headless binary.

pub mod snapshot;
pub mod ui;

pub use snapshot::*;
pub use ui::*;
