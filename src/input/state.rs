//! Input state management
//!
//! Polls the macroquad keyboard and maps keys onto [`Action`]s, then
//! snapshots everything the simulation needs into a [`FrameInput`].

use macroquad::prelude::*;

use super::Action;

/// Everything the simulation reads from input in one frame. Plain data,
/// so tests can construct arbitrary input without a window.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Move-left is held
    pub left: bool,
    /// Move-right is held
    pub right: bool,
    /// Jump was pressed this frame
    pub jump_pressed: bool,
    /// Confirm was pressed this frame
    pub confirm_pressed: bool,
    /// Quit was pressed this frame
    pub quit_pressed: bool,
}

impl FrameInput {
    /// Signed horizontal intent: -1 left, 1 right, 0 neither or both.
    pub fn move_dir(&self) -> f32 {
        (self.right as i32 - self.left as i32) as f32
    }
}

/// Maps keyboard state to game actions.
pub struct InputState;

impl InputState {
    pub fn new() -> Self {
        Self
    }

    /// Snapshot the live keyboard into a [`FrameInput`].
    pub fn sample(&self) -> FrameInput {
        FrameInput {
            left: self.action_down(Action::MoveLeft),
            right: self.action_down(Action::MoveRight),
            jump_pressed: self.action_pressed(Action::Jump),
            confirm_pressed: self.action_pressed(Action::Confirm),
            quit_pressed: self.action_pressed(Action::Quit),
        }
    }

    /// Check if an action is currently held down
    pub fn action_down(&self, action: Action) -> bool {
        self.keys(action).iter().any(|&key| is_key_down(key))
    }

    /// Check if an action was just pressed this frame
    pub fn action_pressed(&self, action: Action) -> bool {
        self.keys(action).iter().any(|&key| is_key_pressed(key))
    }

    fn keys(&self, action: Action) -> &'static [KeyCode] {
        match action {
            Action::MoveLeft => &[KeyCode::Left, KeyCode::A],
            Action::MoveRight => &[KeyCode::Right, KeyCode::D],
            Action::Jump => &[KeyCode::Space, KeyCode::Up, KeyCode::W],
            Action::Confirm => &[KeyCode::Enter, KeyCode::Space],
            Action::Quit => &[KeyCode::Escape],
        }
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_dir_combines_held_keys() {
        let mut input = FrameInput::default();
        assert_eq!(input.move_dir(), 0.0);

        input.left = true;
        assert_eq!(input.move_dir(), -1.0);

        input.right = true;
        assert_eq!(input.move_dir(), 0.0);

        input.left = false;
        assert_eq!(input.move_dir(), 1.0);
    }
}
