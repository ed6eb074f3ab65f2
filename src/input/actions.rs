//! Game action definitions

/// All actions the game responds to. Movement is held, the rest are
/// edge-triggered presses.
///
/// Key bindings:
/// - Left/Right or A/D = move
/// - Space, Up or W    = jump
/// - Enter or Space    = confirm (menus)
/// - Escape            = quit to title / exit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Confirm,
    Quit,
}
