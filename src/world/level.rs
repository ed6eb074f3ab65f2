//! Level loading and validation
//!
//! Levels are described by rows of glyphs, one character per tile:
//!
//! - `x` solid block
//! - `p` player start (exactly one)
//! - `e` walker enemy (turns at walls)
//! - `s` sentry enemy (also turns at ledges)
//! - `o` coin
//! - `d` exit door (exactly one)
//! - `_` or space: empty air
//!
//! On-disk levels are RON files holding a [`LevelSource`]. Every level is
//! validated before play begins: any malformed layout is a load-time
//! error, never a mid-simulation surprise.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use macroquad::math::{vec2, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Side length of one grid tile in pixels.
pub const TILE_SIZE: f32 = 50.0;

/// Validation limits to keep pathological files from exhausting memory
pub mod limits {
    /// Maximum level width in tiles
    pub const MAX_WIDTH: usize = 512;
    /// Maximum level height in tiles
    pub const MAX_HEIGHT: usize = 64;
    /// Maximum number of enemy spawns
    pub const MAX_ENEMIES: usize = 128;
    /// Maximum number of coin spawns
    pub const MAX_COINS: usize = 512;
    /// Maximum value for speed-like tuning fields, in pixels per second.
    /// The collision resolver handles at most one tile of travel per
    /// pass, so per-frame displacement must stay under the 50px tile
    /// even on the slowest simulated frame (1/30s): 1400 px/s leaves
    /// a margin below that 1500 px/s ceiling.
    pub const MAX_SPEED: f32 = 1400.0;
}

/// Error type for level loading
#[derive(Debug)]
pub enum LevelError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    ValidationError(String),
}

impl From<std::io::Error> for LevelError {
    fn from(e: std::io::Error) -> Self {
        LevelError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for LevelError {
    fn from(e: ron::error::SpannedError) -> Self {
        LevelError::ParseError(e)
    }
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelError::IoError(e) => write!(f, "IO error: {}", e),
            LevelError::ParseError(e) => write!(f, "Parse error: {}", e),
            LevelError::ValidationError(e) => write!(f, "Validation error: {}", e),
        }
    }
}

impl std::error::Error for LevelError {}

/// A single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Block,
}

/// Enemy behavior kinds.
///
/// Every kind must be handled exhaustively by the simulation step;
/// unknown glyphs in a level file are rejected at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Walks in its facing direction, turns around at walls
    Walker,
    /// Patrols a platform: turns at walls and at ledges
    Sentry,
}

/// Where an enemy starts and what it does
#[derive(Debug, Clone, Copy)]
pub struct EnemySpawn {
    /// Tile-center position in pixels
    pub pos: Vec2,
    pub kind: EnemyKind,
}

/// Physics and scoring constants.
///
/// These are the knobs the game is tuned with; level files may override
/// them, the built-in levels use the defaults. Distances are pixels,
/// velocities pixels per second.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tuning {
    /// Downward acceleration
    pub gravity: f32,
    /// Top horizontal speed under input
    pub move_speed: f32,
    /// Horizontal acceleration toward (and away from) the input direction
    pub move_accel: f32,
    /// Upward velocity applied on a grounded jump
    pub jump_impulse: f32,
    /// Upward velocity applied after stomping an enemy
    pub stomp_bounce: f32,
    /// Terminal fall speed
    pub max_fall_speed: f32,
    /// Horizontal speed of patrolling enemies
    pub enemy_walk_speed: f32,
    /// Score awarded per coin
    pub coin_value: u32,
    /// Score awarded per stomped enemy
    pub stomp_bonus: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 2400.0,
            move_speed: 300.0,
            move_accel: 2400.0,
            jump_impulse: 720.0, // clears a little over two tiles
            stomp_bounce: 360.0,
            max_fall_speed: 900.0,
            enemy_walk_speed: 90.0,
            coin_value: 10,
            stomp_bonus: 25,
        }
    }
}

/// The serialized (and authored) form of a level: the ASCII pattern plus
/// optional tuning overrides. This is what RON level files contain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelSource {
    pub name: String,
    pub rows: Vec<String>,
    #[serde(default)]
    pub tuning: Tuning,
}

/// A fully parsed, validated level. Immutable during play.
#[derive(Debug, Clone)]
pub struct Level {
    pub name: String,
    /// Width in tiles
    pub width: usize,
    /// Height in tiles
    pub height: usize,
    tiles: Vec<Tile>,
    /// Player start, tile-center position in pixels
    pub player_start: Vec2,
    pub enemy_spawns: Vec<EnemySpawn>,
    /// Coin positions, tile centers in pixels
    pub coin_spawns: Vec<Vec2>,
    /// The exit door's tile rectangle in pixels
    pub door: Rect,
    pub tuning: Tuning,
}

impl Level {
    /// Parse and validate a level pattern.
    pub fn from_source(source: &LevelSource) -> Result<Self, LevelError> {
        let parsed = parse_rows(source)?;
        validate_level(&parsed)?;
        Ok(parsed)
    }

    /// Is the tile at the given grid coordinates solid?
    ///
    /// Everything outside the grid reads as empty: the sky has no
    /// ceiling, and there are no implicit boundary walls. Falling or
    /// walking out of the level is handled by the simulation step, not
    /// by collision.
    pub fn solid(&self, tx: i32, ty: i32) -> bool {
        if tx < 0 || ty < 0 {
            return false;
        }
        let (tx, ty) = (tx as usize, ty as usize);
        if tx >= self.width || ty >= self.height {
            return false;
        }
        self.tiles[ty * self.width + tx] == Tile::Block
    }

    /// Level width in pixels.
    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * TILE_SIZE
    }

    /// Level height in pixels.
    pub fn pixel_height(&self) -> f32 {
        self.height as f32 * TILE_SIZE
    }

    /// Grid coordinate containing a pixel coordinate.
    pub fn tile_at(coord: f32) -> i32 {
        (coord / TILE_SIZE).floor() as i32
    }
}

/// Center of a tile in pixels.
fn tile_center(tx: usize, ty: usize) -> Vec2 {
    vec2(
        tx as f32 * TILE_SIZE + TILE_SIZE * 0.5,
        ty as f32 * TILE_SIZE + TILE_SIZE * 0.5,
    )
}

fn parse_rows(source: &LevelSource) -> Result<Level, LevelError> {
    let height = source.rows.len();
    let width = source.rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);

    let mut tiles = vec![Tile::Empty; width * height];
    let mut player_start = None;
    let mut enemy_spawns = Vec::new();
    let mut coin_spawns = Vec::new();
    let mut door = None;

    for (ty, row) in source.rows.iter().enumerate() {
        for (tx, glyph) in row.chars().enumerate() {
            match glyph {
                'x' => tiles[ty * width + tx] = Tile::Block,
                'p' => {
                    if player_start.replace(tile_center(tx, ty)).is_some() {
                        return Err(LevelError::ValidationError(format!(
                            "level '{}': more than one player start", source.name
                        )));
                    }
                }
                'e' => enemy_spawns.push(EnemySpawn {
                    pos: tile_center(tx, ty),
                    kind: EnemyKind::Walker,
                }),
                's' => enemy_spawns.push(EnemySpawn {
                    pos: tile_center(tx, ty),
                    kind: EnemyKind::Sentry,
                }),
                'o' => coin_spawns.push(tile_center(tx, ty)),
                'd' => {
                    let rect = Rect::new(
                        tx as f32 * TILE_SIZE,
                        ty as f32 * TILE_SIZE,
                        TILE_SIZE,
                        TILE_SIZE,
                    );
                    if door.replace(rect).is_some() {
                        return Err(LevelError::ValidationError(format!(
                            "level '{}': more than one door", source.name
                        )));
                    }
                }
                '_' | ' ' => {}
                other => {
                    return Err(LevelError::ValidationError(format!(
                        "level '{}': unknown glyph '{}' at row {}, column {}",
                        source.name, other, ty, tx
                    )));
                }
            }
        }
    }

    let player_start = player_start.ok_or_else(|| {
        LevelError::ValidationError(format!("level '{}': no player start", source.name))
    })?;
    let door = door.ok_or_else(|| {
        LevelError::ValidationError(format!("level '{}': no door", source.name))
    })?;

    Ok(Level {
        name: source.name.clone(),
        width,
        height,
        tiles,
        player_start,
        enemy_spawns,
        coin_spawns,
        door,
        tuning: source.tuning,
    })
}

/// Check that a float is usable as a tuning value
fn is_valid_tuning(f: f32) -> bool {
    f.is_finite() && f > 0.0
}

/// Validate a parsed level
pub fn validate_level(level: &Level) -> Result<(), LevelError> {
    let fail = |msg: String| Err(LevelError::ValidationError(format!("level '{}': {}", level.name, msg)));

    if level.width == 0 || level.height == 0 {
        return fail("empty grid".into());
    }
    if level.width > limits::MAX_WIDTH {
        return fail(format!("too wide ({} > {})", level.width, limits::MAX_WIDTH));
    }
    if level.height > limits::MAX_HEIGHT {
        return fail(format!("too tall ({} > {})", level.height, limits::MAX_HEIGHT));
    }
    if level.enemy_spawns.len() > limits::MAX_ENEMIES {
        return fail(format!("too many enemies ({})", level.enemy_spawns.len()));
    }
    if level.coin_spawns.len() > limits::MAX_COINS {
        return fail(format!("too many coins ({})", level.coin_spawns.len()));
    }

    let t = &level.tuning;
    for (name, value) in [
        ("gravity", t.gravity),
        ("move_speed", t.move_speed),
        ("move_accel", t.move_accel),
        ("jump_impulse", t.jump_impulse),
        ("stomp_bounce", t.stomp_bounce),
        ("max_fall_speed", t.max_fall_speed),
        ("enemy_walk_speed", t.enemy_walk_speed),
    ] {
        if !is_valid_tuning(value) {
            return fail(format!("tuning field '{}' must be finite and positive, got {}", name, value));
        }
    }

    // Speed-like fields are capped so no body ever crosses a full tile
    // in one frame, which would let it pass through a thin floor or wall
    for (name, value) in [
        ("move_speed", t.move_speed),
        ("jump_impulse", t.jump_impulse),
        ("stomp_bounce", t.stomp_bounce),
        ("max_fall_speed", t.max_fall_speed),
        ("enemy_walk_speed", t.enemy_walk_speed),
    ] {
        if value > limits::MAX_SPEED {
            return fail(format!(
                "tuning field '{}' must not exceed {} px/s, got {}",
                name,
                limits::MAX_SPEED,
                value
            ));
        }
    }

    if !door_reachable(level) {
        return fail("door is not reachable from the player start".into());
    }

    Ok(())
}

/// Flood fill over non-solid tiles from the player start to the door.
///
/// Four-directional connectivity. This ignores jump height, so it is an
/// approximation, but it rejects the broken layouts that matter: doors
/// sealed inside blocks or walled off from the play area entirely.
fn door_reachable(level: &Level) -> bool {
    let start = (
        Level::tile_at(level.player_start.x),
        Level::tile_at(level.player_start.y),
    );
    let goal = (
        Level::tile_at(level.door.x + TILE_SIZE * 0.5),
        Level::tile_at(level.door.y + TILE_SIZE * 0.5),
    );

    let mut seen = vec![false; level.width * level.height];
    let mut queue = VecDeque::new();
    queue.push_back(start);

    while let Some((tx, ty)) = queue.pop_front() {
        if (tx, ty) == goal {
            return true;
        }
        if tx < 0 || ty < 0 || tx as usize >= level.width || ty as usize >= level.height {
            continue;
        }
        let idx = ty as usize * level.width + tx as usize;
        if seen[idx] || level.solid(tx, ty) {
            continue;
        }
        seen[idx] = true;
        queue.push_back((tx + 1, ty));
        queue.push_back((tx - 1, ty));
        queue.push_back((tx, ty + 1));
        queue.push_back((tx, ty - 1));
    }

    false
}

/// Load a level from a RON file.
pub fn load_level<P: AsRef<Path>>(path: P) -> Result<Level, LevelError> {
    let contents = fs::read_to_string(path)?;
    load_level_from_str(&contents)
}

/// Load a level from RON text.
pub fn load_level_from_str(s: &str) -> Result<Level, LevelError> {
    let source: LevelSource = ron::from_str(s)?;
    Level::from_source(&source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn source(rows: &[&str]) -> LevelSource {
        LevelSource {
            name: "test".to_string(),
            rows: rows.iter().map(|r| r.to_string()).collect(),
            tuning: Tuning::default(),
        }
    }

    #[test]
    fn test_parse_minimal_level() {
        let level = Level::from_source(&source(&[
            "p_o_e_d",
            "xxxxxxx",
        ])).unwrap();

        assert_eq!(level.width, 7);
        assert_eq!(level.height, 2);
        assert!(level.solid(0, 1));
        assert!(!level.solid(0, 0));
        assert_eq!(level.coin_spawns.len(), 1);
        assert_eq!(level.enemy_spawns.len(), 1);
        assert_eq!(level.enemy_spawns[0].kind, EnemyKind::Walker);
        assert_eq!(level.player_start, vec2(25.0, 25.0));
    }

    #[test]
    fn test_outside_grid_is_empty() {
        let level = Level::from_source(&source(&["p_d", "xxx"])).unwrap();
        assert!(!level.solid(-1, 0));
        assert!(!level.solid(0, -1));
        assert!(!level.solid(99, 1));
        assert!(!level.solid(0, 99));
    }

    #[test]
    fn test_missing_door_rejected() {
        let err = Level::from_source(&source(&["p__", "xxx"])).unwrap_err();
        assert!(matches!(err, LevelError::ValidationError(_)));
    }

    #[test]
    fn test_duplicate_door_rejected() {
        let err = Level::from_source(&source(&["p_d_d", "xxxxx"])).unwrap_err();
        assert!(matches!(err, LevelError::ValidationError(_)));
    }

    #[test]
    fn test_missing_player_start_rejected() {
        let err = Level::from_source(&source(&["__d", "xxx"])).unwrap_err();
        assert!(matches!(err, LevelError::ValidationError(_)));
    }

    #[test]
    fn test_unknown_glyph_rejected() {
        let err = Level::from_source(&source(&["p?d", "xxx"])).unwrap_err();
        match err {
            LevelError::ValidationError(msg) => assert!(msg.contains("unknown glyph")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_walled_off_door_rejected() {
        // Door sealed in a block box on the right
        let err = Level::from_source(&source(&[
            "____xxx",
            "p___xdx",
            "xxxxxxx",
        ])).unwrap_err();
        match err {
            LevelError::ValidationError(msg) => assert!(msg.contains("reachable")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_reachability_goes_around_obstacles() {
        // Door is behind a wall with a gap above it
        let level = Level::from_source(&source(&[
            "_____",
            "p_x_d",
            "xxxxx",
        ]));
        assert!(level.is_ok());
    }

    #[test]
    fn test_ragged_rows_pad_with_air() {
        let level = Level::from_source(&source(&[
            "p_d",
            "",
            "xxxxx",
        ])).unwrap();
        assert_eq!(level.width, 5);
        assert!(!level.solid(4, 0));
        assert!(level.solid(4, 2));
    }

    #[test]
    fn test_bad_tuning_rejected() {
        let mut src = source(&["p_d", "xxx"]);
        src.tuning.gravity = f32::NAN;
        let err = Level::from_source(&src).unwrap_err();
        assert!(matches!(err, LevelError::ValidationError(_)));
    }

    #[test]
    fn test_excessive_speed_tuning_rejected() {
        // Fast enough to cross a whole tile in one frame: a body could
        // fall straight through a one-tile floor if this were allowed
        let mut src = source(&["p_d", "xxx"]);
        src.tuning.max_fall_speed = 20000.0;
        let err = Level::from_source(&src).unwrap_err();
        assert!(matches!(err, LevelError::ValidationError(_)));

        let mut src = source(&["p_d", "xxx"]);
        src.tuning.jump_impulse = limits::MAX_SPEED + 1.0;
        let err = Level::from_source(&src).unwrap_err();
        assert!(matches!(err, LevelError::ValidationError(_)));

        // The cap itself is fine
        let mut src = source(&["p_d", "xxx"]);
        src.tuning.max_fall_speed = limits::MAX_SPEED;
        assert!(Level::from_source(&src).is_ok());
    }

    #[test]
    fn test_load_level_from_ron_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"(
    name: "from disk",
    rows: [
        "p__o__d",
        "xxxxxxx",
    ],
)"#
        )
        .unwrap();

        let level = load_level(file.path()).unwrap();
        assert_eq!(level.name, "from disk");
        assert_eq!(level.coin_spawns.len(), 1);
        // Omitted tuning falls back to defaults
        assert_eq!(level.tuning.coin_value, Tuning::default().coin_value);
    }

    #[test]
    fn test_load_level_parse_error() {
        let err = load_level_from_str("(name: oops").unwrap_err();
        assert!(matches!(err, LevelError::ParseError(_)));
    }
}
