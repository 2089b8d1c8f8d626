//! # Utilities Module
//!
//! Line rasterization and path search shared by generation, AI and autoexplore.

pub mod math;
pub mod pathfinding;

pub use self::math::*;
pub use self::pathfinding::*;
