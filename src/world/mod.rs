//! World module - static level data
//!
//! Levels are tile grids authored as ASCII patterns, either bundled with
//! the binary or loaded from RON files. The grid is immutable during play;
//! all run-time state (collected coins, defeated enemies) lives in the
//! game world as an overlay on top of it.
//!
//! Note: Some API items are only exercised by external level files and
//! the test suite.

#![allow(dead_code)]

mod level;
mod levels;

pub use level::*;
pub use levels::*;
