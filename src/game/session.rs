//! Game State Machine
//!
//! Owns everything that outlives a single frame: score, lives, the level
//! list and index, the active world overlay, and the camera. Phase
//! transitions are driven only by simulation events and confirm input.

use super::event::Events;
use super::scroll::{ScrollView, VIEW_W};
use super::step::{player_spawn_pos, simulate};
use super::world::World;
use crate::input::FrameInput;
use crate::world::Level;

pub const STARTING_LIVES: u32 = 3;

/// Largest time delta a frame is allowed to simulate. A stalled frame
/// clock produces one slow-motion frame instead of a tunneling one.
const MAX_DT: f32 = 1.0 / 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Title,
    Playing,
    LevelComplete,
    /// Out of lives. Terminal until an explicit restart.
    GameOver,
    /// Cleared the final level. Terminal until an explicit restart.
    Finished,
}

pub struct GameSession {
    levels: Vec<Level>,
    level_index: usize,
    score: u32,
    lives: u32,
    phase: Phase,
    world: World,
    events: Events,
    scroll: ScrollView,
}

impl GameSession {
    /// `levels` must be non-empty; the campaign guarantees this.
    pub fn new(levels: Vec<Level>) -> Self {
        assert!(!levels.is_empty(), "a session needs at least one level");
        let world = World::from_level(&levels[0]);
        Self {
            levels,
            level_index: 0,
            score: 0,
            lives: STARTING_LIVES,
            phase: Phase::Title,
            world,
            events: Events::new(),
            scroll: ScrollView::new(VIEW_W),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn level(&self) -> &Level {
        &self.levels[self.level_index]
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll.offset()
    }

    /// Advance the session by one frame. In menus this only watches for
    /// confirm; in play it runs the simulation and reacts to its events.
    pub fn tick(&mut self, input: &FrameInput, dt: f32) {
        match self.phase {
            Phase::Title => {
                if input.confirm_pressed {
                    self.start_game();
                }
            }
            Phase::Playing => self.tick_playing(input, dt),
            Phase::LevelComplete => {
                if input.confirm_pressed {
                    self.advance_level();
                }
            }
            Phase::GameOver | Phase::Finished => {
                if input.confirm_pressed {
                    self.return_to_title();
                }
            }
        }
    }

    /// Fresh run: full lives, zero score, level one.
    pub fn start_game(&mut self) {
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.level_index = 0;
        self.enter_level();
    }

    /// Move on from a completed level. Exhausting the list finishes
    /// the game.
    pub fn advance_level(&mut self) {
        if self.level_index + 1 >= self.levels.len() {
            self.phase = Phase::Finished;
            return;
        }
        self.level_index += 1;
        self.enter_level();
    }

    pub fn return_to_title(&mut self) {
        self.phase = Phase::Title;
    }

    fn tick_playing(&mut self, input: &FrameInput, dt: f32) {
        let dt = dt.min(MAX_DT);
        let level = &self.levels[self.level_index];
        simulate(&mut self.world, level, input, dt, &mut self.events);

        // Score first: a coin grabbed on the same frame as a hit still
        // counts.
        for coin in self.events.coin_collected.iter() {
            self.score += coin.value;
        }
        for defeat in self.events.enemy_defeated.iter() {
            self.score += defeat.bonus;
        }

        if !self.events.player_hit.is_empty() {
            self.lives = self.lives.saturating_sub(1);
            if self.lives == 0 {
                self.phase = Phase::GameOver;
            } else {
                self.respawn_player();
            }
        } else if !self.events.door_reached.is_empty() {
            self.phase = if self.level_index + 1 >= self.levels.len() {
                Phase::Finished
            } else {
                Phase::LevelComplete
            };
        }

        if self.phase == Phase::Playing {
            if let Some(x) = self.player_x() {
                let width = self.levels[self.level_index].pixel_width();
                self.scroll.follow(x, width, dt);
            }
        }

        self.events.clear_all();
    }

    /// Rebuild the world from the level's static layout and snap the
    /// camera to the start. Collected coins and defeated enemies come
    /// back because the whole overlay is fresh.
    fn enter_level(&mut self) {
        let level = &self.levels[self.level_index];
        self.world = World::from_level(level);
        self.events.clear_all();
        if let Some(x) = self.player_x() {
            self.scroll.snap(x, self.levels[self.level_index].pixel_width());
        }
        self.phase = Phase::Playing;
    }

    /// Put the player back at the level start with zeroed velocity.
    /// The rest of the overlay is untouched: collected coins and
    /// defeated enemies stay gone.
    fn respawn_player(&mut self) {
        let level = &self.levels[self.level_index];
        let spawn = player_spawn_pos(level);
        let Some(player) = self.world.player else { return };
        if let Some(transform) = self.world.transforms.get_mut(player) {
            transform.pos = spawn;
        }
        if let Some(velocity) = self.world.velocities.get_mut(player) {
            velocity.0 = macroquad::math::Vec2::ZERO;
        }
        if let Some(mover) = self.world.movers.get_mut(player) {
            mover.on_ground = false;
        }
        let width = self.levels[self.level_index].pixel_width();
        self.scroll.snap(spawn.x, width);
    }

    fn player_x(&self) -> Option<f32> {
        let player = self.world.player?;
        self.world.transforms.get(player).map(|t| t.pos.x)
    }
}
