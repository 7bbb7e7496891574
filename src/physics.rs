//! Avatar kinematics and the scrolling obstacle field.
//!
//! Everything here is deterministic given a `Rng`: update functions take the
//! generator as a parameter so tests can drive them with a seeded
//! `StdRng` and assert exact trajectories.

use rand::Rng;

use crate::config::Metrics;

// ── Avatar ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug)]
pub struct Avatar {
    pub x: f32,
    pub y: f32,
    pub velocity: f32,
    /// Display tilt in radians, eased toward the velocity direction.
    pub rotation: f32,
    pub radius: f32,
}

impl Avatar {
    pub fn new(metrics: &Metrics) -> Self {
        let mut avatar = Self {
            x: 0.0,
            y: 0.0,
            velocity: 0.0,
            rotation: 0.0,
            radius: 0.0,
        };
        avatar.reset(metrics);
        avatar
    }

    pub fn reset(&mut self, metrics: &Metrics) {
        self.x = metrics.width * 0.3;
        self.y = metrics.height * 0.46;
        self.velocity = 0.0;
        self.rotation = 0.0;
        // 2px floor keeps the sprite visible on tiny terminals
        self.radius = (metrics.height * 0.035).max(2.0);
    }

    /// A flap replaces the current velocity outright; it never stacks.
    pub fn flap(&mut self, impulse: f32) {
        self.velocity = impulse;
    }

    pub fn update(&mut self, dt: f32, gravity: f32, max_velocity: f32) {
        self.velocity = (self.velocity + gravity * dt).min(max_velocity);
        self.y += self.velocity * dt;
        let tilt = (self.velocity / (max_velocity * 0.75)).clamp(-1.2, 1.3);
        self.rotation += (tilt - self.rotation) * (dt * 8.0).min(1.0);
    }

    /// Gentle hover used on the idle screen; overwrites position outright.
    pub fn idle_bob(&mut self, time: f32, metrics: &Metrics) {
        self.y = metrics.height * 0.48 + (time * 2.15).sin() * metrics.height * 0.015;
        self.rotation = (time * 1.3).sin() * 0.22;
    }

    /// Collision bounds are slightly tighter than the drawn sprite.
    pub fn top(&self) -> f32 {
        self.y - self.radius * 0.9
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.radius * 0.9
    }
}

// ── Obstacles ───────────────────────────────────────────────────────────────

/// One column pair. `top` is the bottom edge of the upper block, `bottom`
/// the top edge of the lower block; the space between is the gap.
#[derive(Clone, Copy, Debug)]
pub struct Obstacle {
    pub x: f32,
    pub top: f32,
    pub bottom: f32,
    pub passed: bool,
    /// Stable per-obstacle random in 0..1 that themes use for decoration.
    pub seed: f32,
}

pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    spawn_timer: f32,
    pub width: f32,
}

impl ObstacleField {
    pub fn new(width: f32) -> Self {
        Self {
            obstacles: Vec::new(),
            spawn_timer: 0.0,
            width,
        }
    }

    pub fn reset(&mut self, width: f32) {
        self.obstacles.clear();
        self.spawn_timer = 0.0;
        self.width = width;
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Advance the field one step: tick the spawn clock, scroll every
    /// column left, drop the ones fully past the left edge.
    pub fn advance<R: Rng>(
        &mut self,
        dt: f32,
        speed: f32,
        interval: f32,
        metrics: &Metrics,
        rng: &mut R,
    ) {
        self.spawn_timer += dt;
        if self.spawn_timer >= interval {
            self.spawn_timer = 0.0;
            self.spawn(metrics, rng);
        }
        for obstacle in &mut self.obstacles {
            obstacle.x -= speed * dt;
        }
        let width = self.width;
        self.obstacles.retain(|o| o.x + width > -10.0);
    }

    fn spawn<R: Rng>(&mut self, metrics: &Metrics, rng: &mut R) {
        let h = metrics.height;
        let gap = h * (0.34 + rng.r#gen::<f32>() * 0.1);
        let center_min = h * 0.18;
        let center_max = h * 0.82;
        let center = center_min + rng.r#gen::<f32>() * (center_max - center_min);
        let top = (center - gap * 0.5).max(h * 0.1);
        let bottom = (center + gap * 0.5).min(h * 0.9);
        self.obstacles.push(Obstacle {
            x: metrics.width + self.width,
            top,
            bottom,
            passed: false,
            seed: rng.r#gen(),
        });
    }

    /// True when the avatar's circle overlaps either block of any column.
    pub fn collides_with(&self, avatar: &Avatar, viewport_height: f32) -> bool {
        let r = avatar.radius * 0.82;
        self.obstacles.iter().any(|o| {
            circle_rect_overlap(avatar.x, avatar.y, r, o.x, 0.0, self.width, o.top)
                || circle_rect_overlap(
                    avatar.x,
                    avatar.y,
                    r,
                    o.x,
                    o.bottom,
                    self.width,
                    viewport_height - o.bottom,
                )
        })
    }

    /// Count columns whose trailing edge just crossed behind the avatar
    /// and mark them so each column scores at most once.
    pub fn claim_passed(&mut self, avatar_x: f32) -> u32 {
        let mut earned = 0;
        for o in &mut self.obstacles {
            if !o.passed && o.x + self.width < avatar_x {
                o.passed = true;
                earned += 1;
            }
        }
        earned
    }
}

/// Closest-point circle/rectangle overlap test.
fn circle_rect_overlap(cx: f32, cy: f32, r: f32, rx: f32, ry: f32, rw: f32, rh: f32) -> bool {
    if rw <= 0.0 || rh <= 0.0 {
        return false;
    }
    let nx = cx.clamp(rx, rx + rw);
    let ny = cy.clamp(ry, ry + rh);
    let dx = cx - nx;
    let dy = cy - ny;
    dx * dx + dy * dy <= r * r
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Metrics;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn metrics() -> Metrics {
        Metrics::new(1280.0, 720.0)
    }

    #[test]
    fn gravity_integration_is_monotone_under_cap() {
        let m = metrics();
        let mut avatar = Avatar::new(&m);
        avatar.y = 100.0;
        avatar.velocity = 0.0;
        let mut last_y = avatar.y;
        let mut last_v = avatar.velocity;
        for _ in 0..10 {
            avatar.update(0.016, 2000.0, 900.0);
            assert!(avatar.y > last_y, "y must strictly increase while falling");
            assert!(avatar.velocity >= last_v, "velocity must not decrease under gravity");
            last_y = avatar.y;
            last_v = avatar.velocity;
        }
        // 10 steps of v += 2000 * 0.016 = 32/step, well below the cap
        assert!((avatar.velocity - 320.0).abs() < 0.01);
    }

    #[test]
    fn velocity_never_exceeds_cap() {
        let m = metrics();
        let mut avatar = Avatar::new(&m);
        for _ in 0..600 {
            avatar.update(0.016, 2000.0, 900.0);
            assert!(avatar.velocity <= 900.0);
        }
        assert!((avatar.velocity - 900.0).abs() < 0.001);
    }

    #[test]
    fn flap_replaces_velocity_instead_of_stacking() {
        let m = metrics();
        let mut avatar = Avatar::new(&m);
        avatar.velocity = 900.0;
        avatar.flap(-720.0);
        assert_eq!(avatar.velocity, -720.0);
        avatar.flap(-720.0);
        assert_eq!(avatar.velocity, -720.0);
    }

    #[test]
    fn obstacles_scroll_at_constant_speed() {
        let m = metrics();
        let mut field = ObstacleField::new(110.0);
        field.obstacles.push(Obstacle {
            x: m.width + 110.0,
            top: 200.0,
            bottom: 500.0,
            passed: false,
            seed: 0.5,
        });
        let mut rng = StdRng::seed_from_u64(7);
        // interval large enough that no new column spawns during the test
        for _ in 0..20 {
            field.advance(0.1, 230.0, 1e9, &m, &mut rng);
        }
        let expected = m.width + 110.0 - 230.0 * 2.0;
        let x = field.iter().next().map(|o| o.x).unwrap();
        assert!((x - expected).abs() < 0.05, "x was {x}, expected {expected}");
    }

    #[test]
    fn obstacles_removed_only_past_left_margin() {
        let m = metrics();
        let mut field = ObstacleField::new(110.0);
        field.obstacles.push(Obstacle {
            x: -119.0, // trailing edge at -9, still inside the margin
            top: 200.0,
            bottom: 500.0,
            passed: true,
            seed: 0.0,
        });
        let mut rng = StdRng::seed_from_u64(7);
        field.advance(0.0, 230.0, 1e9, &m, &mut rng);
        assert!(!field.is_empty());
        // push the trailing edge past -10
        field.advance(0.1, 230.0, 1e9, &m, &mut rng);
        assert!(field.is_empty());
    }

    #[test]
    fn spawned_gap_stays_inside_safe_band() {
        let m = metrics();
        let mut field = ObstacleField::new(110.0);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            field.spawn(&m, &mut rng);
        }
        for o in field.iter() {
            assert!(o.top >= m.height * 0.1 - 0.001);
            assert!(o.bottom <= m.height * 0.9 + 0.001);
            assert!(o.top < o.bottom);
            assert!((0.0..=1.0).contains(&o.seed));
        }
    }

    #[test]
    fn each_obstacle_scores_exactly_once() {
        let m = metrics();
        let mut field = ObstacleField::new(110.0);
        field.obstacles.push(Obstacle {
            x: 100.0,
            top: 200.0,
            bottom: 500.0,
            passed: false,
            seed: 0.0,
        });
        // trailing edge at 210, avatar at 384: passed
        assert_eq!(field.claim_passed(384.0), 1);
        assert_eq!(field.claim_passed(384.0), 0);
        assert_eq!(field.claim_passed(9999.0), 0);
    }

    #[test]
    fn obstacle_not_claimed_before_trailing_edge() {
        let mut field = ObstacleField::new(110.0);
        field.obstacles.push(Obstacle {
            x: 300.0,
            top: 200.0,
            bottom: 500.0,
            passed: false,
            seed: 0.0,
        });
        // trailing edge at 410, avatar at 384: not yet
        assert_eq!(field.claim_passed(384.0), 0);
    }

    #[test]
    fn collision_uses_closest_point_not_bounding_box() {
        let m = metrics();
        let mut field = ObstacleField::new(110.0);
        field.obstacles.push(Obstacle {
            x: 400.0,
            top: 300.0,
            bottom: 520.0,
            passed: false,
            seed: 0.0,
        });
        let mut avatar = Avatar::new(&m);
        avatar.radius = 20.0;

        // Centered inside the gap: clear.
        avatar.x = 455.0;
        avatar.y = 410.0;
        assert!(!field.collides_with(&avatar, m.height));

        // Overlapping the upper block.
        avatar.y = 290.0;
        assert!(field.collides_with(&avatar, m.height));

        // Overlapping the lower block.
        avatar.y = 530.0;
        assert!(field.collides_with(&avatar, m.height));

        // Diagonally near the corner but outside the circle: clear.
        avatar.x = 400.0 - 15.0;
        avatar.y = 300.0 + 15.0;
        assert!(!field.collides_with(&avatar, m.height));
    }

    #[test]
    fn idle_bob_oscillates_around_rest_height() {
        let m = metrics();
        let mut avatar = Avatar::new(&m);
        let rest = m.height * 0.48;
        let amp = m.height * 0.015;
        for i in 0..100 {
            avatar.idle_bob(i as f32 * 0.1, &m);
            assert!((avatar.y - rest).abs() <= amp + 0.001);
        }
    }
}
