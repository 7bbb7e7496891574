//! Short-lived celebration particles: a downward cone on flap, a full
//! ring burst on score. Rendering is a simple alpha fade; motion is
//! damped per update step, which reads as drag at the frame rates the
//! game runs at.

use rand::Rng;
use std::f32::consts::PI;

use crate::render::{PixelBuf, hsl};

/// Velocity multiplier applied every update step.
const DAMPING: f32 = 0.92;

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[derive(Clone, Copy, Debug)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    vx: f32,
    vy: f32,
    pub age: f32,
    pub life: f32,
    pub size: f32,
    pub hue: f32,
}

impl Particle {
    /// 0 when newborn, 1 at expiry.
    pub fn fade(&self) -> f32 {
        (self.age / self.life).clamp(0.0, 1.0)
    }
}

#[derive(Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Seven sparks in a downward cone under the avatar's wing.
    pub fn emit_flap<R: Rng>(
        &mut self,
        x: f32,
        y: f32,
        scale: f32,
        hue_at: impl Fn(usize) -> f32,
        rng: &mut R,
    ) {
        for i in 0..7 {
            let angle = rng.r#gen::<f32>() * PI;
            let speed = scale * lerp(90.0, 230.0, rng.r#gen::<f32>());
            self.particles.push(Particle {
                x,
                y,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed,
                age: 0.0,
                life: 0.38,
                size: lerp(5.0, 9.0, rng.r#gen::<f32>()) * scale,
                hue: hue_at(i),
            });
        }
    }

    /// Sixteen sparks in a jittered full ring.
    pub fn emit_burst<R: Rng>(
        &mut self,
        x: f32,
        y: f32,
        scale: f32,
        hue_at: impl Fn(usize) -> f32,
        rng: &mut R,
    ) {
        for i in 0..16 {
            let angle = (i as f32 / 16.0) * PI * 2.0 + rng.r#gen::<f32>() * 0.4;
            let speed = scale * lerp(130.0, 260.0, rng.r#gen::<f32>());
            self.particles.push(Particle {
                x,
                y,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed,
                age: 0.0,
                life: 0.7,
                size: lerp(6.0, 12.0, rng.r#gen::<f32>()) * scale,
                hue: hue_at(i),
            });
        }
    }

    /// Integrate and cull. A particle dies when its age reaches its
    /// lifetime or it drops far below the viewport.
    pub fn update(&mut self, dt: f32, viewport_height: f32) {
        for p in &mut self.particles {
            p.age += dt;
            p.x += p.vx * dt;
            p.y += p.vy * dt;
            p.vx *= DAMPING;
            p.vy *= DAMPING;
        }
        self.particles
            .retain(|p| p.age < p.life && p.y < viewport_height + 100.0);
    }

    pub fn draw(&self, buf: &mut PixelBuf) {
        for p in &self.particles {
            let alpha = 1.0 - p.fade();
            let color = hsl(p.hue, 0.9, 0.7);
            let r = (p.size * 0.5).max(0.6);
            let x0 = (p.x - r).floor() as i32;
            let x1 = (p.x + r).ceil() as i32;
            let y0 = (p.y - r * 0.62).floor() as i32;
            let y1 = (p.y + r * 0.62).ceil() as i32;
            for py in y0..=y1 {
                for px in x0..=x1 {
                    let dx = (px as f32 - p.x) / r;
                    let dy = (py as f32 - p.y) / (r * 0.62);
                    if dx * dx + dy * dy <= 1.0 {
                        buf.blend(px, py, color, alpha);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn flap_emits_seven_downward_sparks() {
        let mut field = ParticleField::new();
        let mut rng = StdRng::seed_from_u64(1);
        field.emit_flap(100.0, 100.0, 1.0, |_| 300.0, &mut rng);
        assert_eq!(field.len(), 7);
        // cone angles live in 0..PI, so vy >= 0: one step never moves up
        field.update(0.016, 720.0);
        for p in field.iter() {
            assert!(p.y >= 100.0, "flap sparks must drift downward, got y {}", p.y);
        }
    }

    #[test]
    fn burst_emits_sixteen_with_indexed_hues() {
        let mut field = ParticleField::new();
        let mut rng = StdRng::seed_from_u64(2);
        field.emit_burst(50.0, 50.0, 1.0, |i| i as f32 * 10.0, &mut rng);
        assert_eq!(field.len(), 16);
        let hues: Vec<f32> = field.iter().map(|p| p.hue).collect();
        assert!((hues[0] - 0.0).abs() < f32::EPSILON);
        assert!((hues[15] - 150.0).abs() < f32::EPSILON);
    }

    #[test]
    fn particle_gone_once_age_reaches_lifetime() {
        let mut field = ParticleField::new();
        let mut rng = StdRng::seed_from_u64(3);
        field.emit_flap(0.0, 0.0, 1.0, |_| 0.0, &mut rng);
        // flap lifetime is 0.38s; 0.37s in they are still present
        field.update(0.37, 720.0);
        assert_eq!(field.len(), 7);
        field.update(0.02, 720.0);
        assert!(field.is_empty());
    }

    #[test]
    fn damping_shrinks_velocity_every_step() {
        let mut field = ParticleField::new();
        let mut rng = StdRng::seed_from_u64(4);
        field.emit_burst(0.0, 0.0, 1.0, |_| 0.0, &mut rng);
        let speed_of = |f: &ParticleField| {
            f.iter()
                .map(|p| (p.vx * p.vx + p.vy * p.vy).sqrt())
                .sum::<f32>()
        };
        let before = speed_of(&field);
        field.update(0.016, 720.0);
        let after = speed_of(&field);
        assert!(after < before * 0.95);
    }

    #[test]
    fn faller_culled_below_viewport() {
        let mut field = ParticleField::new();
        field.particles.push(Particle {
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 10_000.0,
            age: 0.0,
            life: 100.0,
            size: 4.0,
            hue: 0.0,
        });
        field.update(0.1, 720.0);
        assert!(field.is_empty());
    }

    #[test]
    fn clear_empties_the_field() {
        let mut field = ParticleField::new();
        let mut rng = StdRng::seed_from_u64(5);
        field.emit_burst(0.0, 0.0, 1.0, |_| 0.0, &mut rng);
        field.clear();
        assert!(field.is_empty());
    }
}
