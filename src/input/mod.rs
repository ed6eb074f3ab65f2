//! Input handling
//!
//! Provides an action-based input layer over the keyboard: gameplay code
//! asks about actions (Jump, Confirm), never about key codes. Each frame
//! the live keyboard state is sampled into a plain [`FrameInput`] value
//! so the simulation stays testable without a window.

mod actions;
mod state;

pub use actions::*;
pub use state::*;
