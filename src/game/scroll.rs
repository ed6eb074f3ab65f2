//! Scroll Controller
//!
//! Horizontal camera follow with a central dead-zone. Vertical is fixed;
//! levels are authored one viewport tall or scroll only sideways.

/// Visible viewport size in pixels. Matches the window.
pub const VIEW_W: f32 = 800.0;
pub const VIEW_H: f32 = 500.0;

/// Half-width of the central band the player may roam without moving
/// the camera.
const DEAD_ZONE_HALF: f32 = 120.0;

/// Exponential smoothing rate, per second. Higher is snappier.
const FOLLOW_RATE: f32 = 10.0;

/// Horizontal camera state. The offset is the world x of the viewport's
/// left edge and is the only state carried between frames.
#[derive(Debug, Clone, Copy)]
pub struct ScrollView {
    offset: f32,
    viewport_w: f32,
}

impl ScrollView {
    pub fn new(viewport_w: f32) -> Self {
        Self { offset: 0.0, viewport_w }
    }

    /// World x of the viewport's left edge.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Center the view on the player immediately, no smoothing. Used on
    /// level entry and respawn so the camera never pans across the level.
    pub fn snap(&mut self, player_x: f32, level_width: f32) {
        self.offset = Self::clamp_offset(player_x - self.viewport_w * 0.5, level_width, self.viewport_w);
    }

    /// Track the player for one frame: push the camera only when the
    /// player leaves the central dead-zone, smooth toward that target,
    /// and clamp so no area before the level start or past its end is
    /// ever revealed.
    pub fn follow(&mut self, player_x: f32, level_width: f32, dt: f32) {
        let center = self.offset + self.viewport_w * 0.5;
        let mut target = self.offset;
        if player_x < center - DEAD_ZONE_HALF {
            target -= (center - DEAD_ZONE_HALF) - player_x;
        } else if player_x > center + DEAD_ZONE_HALF {
            target += player_x - (center + DEAD_ZONE_HALF);
        }
        let target = Self::clamp_offset(target, level_width, self.viewport_w);

        let blend = 1.0 - (-FOLLOW_RATE * dt).exp();
        self.offset += (target - self.offset) * blend;
        self.offset = Self::clamp_offset(self.offset, level_width, self.viewport_w);
    }

    fn clamp_offset(offset: f32, level_width: f32, viewport_w: f32) -> f32 {
        let max = (level_width - viewport_w).max(0.0);
        offset.clamp(0.0, max)
    }
}
