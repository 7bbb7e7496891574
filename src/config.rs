//! Gameplay tuning and viewport metrics.
//!
//! All gameplay distances are expressed in a 1280x720 reference space and
//! scaled to the live terminal through `Metrics::scale`, so the feel stays
//! the same whether the window is 80 or 300 columns wide.

/// Reference-space height everything is tuned against.
pub const REFERENCE_HEIGHT: f32 = 720.0;

/// Longest simulation step one frame may consume. Anything above this
/// (debugger pause, terminal freeze) is clamped instead of integrated.
pub const MAX_FRAME_DT: f32 = 0.032;

#[derive(Clone, Copy, Debug)]
pub struct Tuning {
    /// Horizontal obstacle speed at score 0, units/s.
    pub base_speed: f32,
    /// Extra speed per point scored.
    pub speed_ramp: f32,
    pub gravity: f32,
    /// Velocity assigned on flap; negative is up.
    pub flap_impulse: f32,
    /// Downward velocity cap.
    pub max_velocity: f32,
    /// Seconds between obstacle spawns.
    pub spawn_interval: f32,
    /// Dead zone above the bottom edge that counts as ground.
    pub floor_padding: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_speed: 230.0,
            speed_ramp: 8.0,
            gravity: 2000.0,
            flap_impulse: -720.0,
            max_velocity: 900.0,
            spawn_interval: 1.98,
            floor_padding: 36.0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Metrics {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
}

impl Metrics {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scale: height / REFERENCE_HEIGHT,
        }
    }

    pub fn floor_y(&self, tuning: &Tuning) -> f32 {
        self.height - tuning.floor_padding * self.scale
    }

    /// Obstacle column width: scaled reference width, but never skinnier
    /// than 11% of the viewport.
    pub fn obstacle_width(&self) -> f32 {
        (110.0 * self.scale).max(self.width * 0.11)
    }
}
