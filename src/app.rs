//! Application state
//!
//! Ties the session, the input layer, and the renderer together. One
//! update and one draw per frame, driven by main's loop.

use crate::game::renderer::draw_session;
use crate::game::{GameSession, Phase};
use crate::input::InputState;
use crate::world::Level;

pub struct App {
    session: GameSession,
    input: InputState,
}

impl App {
    pub fn new(levels: Vec<Level>) -> Self {
        Self {
            session: GameSession::new(levels),
            input: InputState::new(),
        }
    }

    /// Run one frame of logic. Returns false when the app should exit.
    pub fn update(&mut self, dt: f32) -> bool {
        let input = self.input.sample();

        // Escape backs out one layer: play -> title, title -> quit
        if input.quit_pressed {
            if self.session.phase() == Phase::Title {
                return false;
            }
            self.session.return_to_title();
            return true;
        }

        self.session.tick(&input, dt);
        true
    }

    pub fn draw(&self) {
        draw_session(&self.session);
    }
}
