//! Game Foundation Module
//!
//! A lightweight ECS-inspired runtime for a 2D platformer:
//! - Entity: generational index for safe entity references
//! - Component: plain data structs attached to entities
//! - World: container for all entities and their components
//! - Event: discrete per-frame facts emitted by the simulation step
//!
//! The simulation step mutates the world and returns events; the session
//! state machine consumes the events. Rendering only ever reads.

// Allow unused code - parts of the runtime API exist for the test suite
#![allow(dead_code)]

pub mod collision;
pub mod component;
pub mod components;
pub mod entity;
pub mod event;
pub mod renderer;
pub mod scroll;
pub mod session;
pub mod step;
pub mod world;

pub use session::{GameSession, Phase};
