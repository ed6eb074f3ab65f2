//! ROBO PLATFORMER: a small side-scrolling platformer
//!
//! Run, jump, stomp enemies, collect coins, and find the exit door.
//! Levels are ASCII-pattern tile grids; the simulation is a fixed
//! single-threaded per-frame step that the renderer merely observes.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod app;
mod game;
mod input;
mod world;

use macroquad::prelude::*;

use app::App;
use game::scroll::{VIEW_H, VIEW_W};
use world::builtin_levels;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Robo Platformer v{}", VERSION),
        window_width: VIEW_W as i32,
        window_height: VIEW_H as i32,
        window_resizable: false,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let levels = match builtin_levels() {
        Ok(levels) => levels,
        Err(err) => {
            eprintln!("failed to load built-in levels: {}", err);
            return;
        }
    };

    let mut app = App::new(levels);

    loop {
        if !app.update(get_frame_time()) {
            break;
        }
        app.draw();
        next_frame().await;
    }
}
