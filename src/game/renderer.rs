//! Renderer
//!
//! Pure presentation: reads the session snapshot and draws one frame.
//! Nothing here feeds back into the simulation.

use macroquad::prelude::*;

use super::components::body;
use super::scroll::{VIEW_H, VIEW_W};
use super::session::{GameSession, Phase};
use crate::world::{EnemyKind, Level, TILE_SIZE};

// Palette
const SKY: Color = Color::new(0.165, 0.529, 0.749, 1.0); // 42, 135, 191
const BLOCK: Color = Color::new(0.071, 0.4, 0.31, 1.0); // 18, 102, 79
const BLOCK_EDGE: Color = Color::new(0.055, 0.31, 0.24, 1.0);
const PLAYER_BODY: Color = Color::new(0.78, 0.8, 0.84, 1.0);
const PLAYER_EYE: Color = Color::new(0.1, 0.1, 0.12, 1.0);
const WALKER: Color = Color::new(0.85, 0.33, 0.25, 1.0);
const SENTRY: Color = Color::new(0.6, 0.3, 0.7, 1.0);
const COIN: Color = Color::new(0.95, 0.8, 0.2, 1.0);
const DOOR: Color = Color::new(0.42, 0.28, 0.16, 1.0);
const DOOR_FRAME: Color = Color::new(0.3, 0.19, 0.1, 1.0);
const HUD_TEXT: Color = WHITE;
const BANNER_BG: Color = Color::new(0.0, 0.0, 0.0, 0.55);

/// Draw one complete frame for the current phase.
pub fn draw_session(session: &GameSession) {
    clear_background(SKY);
    match session.phase() {
        Phase::Title => draw_title(),
        Phase::Playing => {
            draw_playfield(session);
            draw_hud(session);
        }
        Phase::LevelComplete => {
            draw_playfield(session);
            draw_hud(session);
            draw_banner(
                "LEVEL COMPLETE",
                &format!("Score {}", session.score()),
                "Press Enter for the next level",
            );
        }
        Phase::GameOver => {
            draw_playfield(session);
            draw_banner(
                "GAME OVER",
                &format!("Final score {}", session.score()),
                "Press Enter to return to the title",
            );
        }
        Phase::Finished => {
            draw_playfield(session);
            draw_banner(
                "ALL CLEAR!",
                &format!("Final score {}", session.score()),
                "Press Enter to return to the title",
            );
        }
    }
}

fn draw_title() {
    draw_centered("ROBO PLATFORMER", VIEW_H * 0.35, 56.0, HUD_TEXT);
    draw_centered("Arrows / WASD to move, Space to jump", VIEW_H * 0.55, 22.0, HUD_TEXT);
    draw_centered("Stomp enemies, grab coins, find the door", VIEW_H * 0.62, 22.0, HUD_TEXT);
    draw_centered("Press Enter to start", VIEW_H * 0.78, 28.0, COIN);
}

fn draw_playfield(session: &GameSession) {
    let level = session.level();
    let offset = session.scroll_offset();

    draw_blocks(level, offset);
    draw_door(level, offset);

    let world = session.world();

    for (idx, _) in world.coins.iter() {
        let entity = world.entity(idx);
        if let Some(tf) = world.transforms.get(entity) {
            let x = tf.pos.x - offset;
            draw_circle(x, tf.pos.y, body::COIN_HALF.x, COIN);
            draw_circle_lines(x, tf.pos.y, body::COIN_HALF.x, 2.0, DOOR_FRAME);
        }
    }

    for (idx, enemy) in world.enemies.iter() {
        let entity = world.entity(idx);
        if let Some(tf) = world.transforms.get(entity) {
            let color = match enemy.kind {
                EnemyKind::Walker => WALKER,
                EnemyKind::Sentry => SENTRY,
            };
            let half = body::ENEMY_HALF;
            draw_rectangle(
                tf.pos.x - half.x - offset,
                tf.pos.y - half.y,
                half.x * 2.0,
                half.y * 2.0,
                color,
            );
        }
    }

    if let Some(player) = world.player {
        if let (Some(tf), Some(mover)) = (world.transforms.get(player), world.movers.get(player)) {
            let half = body::PLAYER_HALF;
            let x = tf.pos.x - half.x - offset;
            let y = tf.pos.y - half.y;
            draw_rectangle(x, y, half.x * 2.0, half.y * 2.0, PLAYER_BODY);
            // Eye marks the facing direction
            let eye_x = tf.pos.x + mover.facing.sign() * half.x * 0.45 - offset;
            draw_circle(eye_x, y + 10.0, 4.0, PLAYER_EYE);
        }
    }
}

fn draw_blocks(level: &Level, offset: f32) {
    // Only the visible tile columns
    let first = (offset / TILE_SIZE).floor() as i32;
    let last = ((offset + VIEW_W) / TILE_SIZE).floor() as i32;
    for ty in 0..level.height as i32 {
        for tx in first..=last {
            if !level.solid(tx, ty) {
                continue;
            }
            let x = tx as f32 * TILE_SIZE - offset;
            let y = ty as f32 * TILE_SIZE;
            draw_rectangle(x, y, TILE_SIZE, TILE_SIZE, BLOCK);
            draw_rectangle_lines(x, y, TILE_SIZE, TILE_SIZE, 2.0, BLOCK_EDGE);
        }
    }
}

fn draw_door(level: &Level, offset: f32) {
    let door = level.door;
    let x = door.x - offset;
    draw_rectangle(x, door.y, door.w, door.h, DOOR);
    draw_rectangle_lines(x, door.y, door.w, door.h, 3.0, DOOR_FRAME);
    // Handle
    draw_circle(x + door.w * 0.75, door.y + door.h * 0.55, 3.0, COIN);
}

fn draw_hud(session: &GameSession) {
    let level = session.level();
    draw_text(&format!("SCORE {}", session.score()), 12.0, 26.0, 28.0, HUD_TEXT);
    draw_text(&format!("LIVES {}", session.lives()), 12.0, 54.0, 28.0, HUD_TEXT);
    let label = format!(
        "{} ({}/{})",
        level.name,
        session.level_index() + 1,
        session.level_count()
    );
    let width = measure_text(&label, None, 22, 1.0).width;
    draw_text(&label, VIEW_W - width - 12.0, 26.0, 22.0, HUD_TEXT);
}

fn draw_banner(title: &str, detail: &str, prompt: &str) {
    draw_rectangle(0.0, VIEW_H * 0.3, VIEW_W, VIEW_H * 0.34, BANNER_BG);
    draw_centered(title, VIEW_H * 0.42, 48.0, HUD_TEXT);
    draw_centered(detail, VIEW_H * 0.52, 26.0, COIN);
    draw_centered(prompt, VIEW_H * 0.6, 22.0, HUD_TEXT);
}

fn draw_centered(text: &str, y: f32, size: f32, color: Color) {
    let width = measure_text(text, None, size as u16, 1.0).width;
    draw_text(text, (VIEW_W - width) * 0.5, y, size, color);
}
