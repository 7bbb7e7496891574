//! The theme roster.
//!
//! A theme owns everything that gives the game its look and sound: the
//! background painter, the obstacle and avatar sprites, the particle hue
//! animation, and a set of audio profile overrides. Themes are stateless;
//! the core hands them geometry and a clock and they draw.

use crate::audio::profile::ProfileOverrides;
use crate::physics::{Avatar, Obstacle};
use crate::render::{PixelBuf, Rgb};

mod canopy;
mod cyber;
mod ember;
mod glacier;
mod jurassic;
mod neon;

pub trait Theme {
    fn id(&self) -> &'static str;
    /// Short display name, drawn with the bitmap font.
    fn label(&self) -> &'static str;
    /// Accent used for auras, rings and HUD flourishes.
    fn accent(&self) -> Rgb;
    /// Hue for the `index`-th particle of a burst emitted at `time`.
    fn particle_hue(&self, time: f32, index: usize) -> f32;
    fn draw_background(&self, frame: &mut PixelBuf, time: f32);
    fn draw_obstacle(&self, frame: &mut PixelBuf, obstacle: &Obstacle, width: f32, time: f32);
    fn draw_avatar(&self, frame: &mut PixelBuf, avatar: &Avatar, time: f32);
    fn audio(&self) -> ProfileOverrides;
}

/// Rotation order is fixed; milestone switches walk this list.
pub fn roster() -> Vec<Box<dyn Theme>> {
    vec![
        Box::new(neon::NeonPulse),
        Box::new(jurassic::JurassicDusk),
        Box::new(cyber::CyberRave),
        Box::new(ember::EmberRift),
        Box::new(canopy::CanopyGlow),
        Box::new(glacier::GlacierDrift),
    ]
}

// ── Shared sprite helpers ───────────────────────────────────────────────────

/// Three-stop vertical gradient covering the whole buffer.
pub(crate) fn sky_gradient(frame: &mut PixelBuf, top: Rgb, mid: Rgb, bottom: Rgb) {
    let h = frame.h;
    let half = (h / 2).max(1);
    for y in 0..h {
        let c = if y < half {
            Rgb::lerp(top, mid, (y * 256 / half) as u16)
        } else {
            Rgb::lerp(mid, bottom, ((y - half) * 256 / half) as u16)
        };
        for x in 0..frame.w {
            frame.set(x as i32, y as i32, c);
        }
    }
}

pub(crate) struct ColumnPalette {
    pub dark: Rgb,
    pub mid: Rgb,
    pub light: Rgb,
    pub edge: Rgb,
}

/// Cylindrical shading across an obstacle column, highlight off-center.
pub(crate) fn shade_column(x: i32, w: i32, p: &ColumnPalette) -> Rgb {
    if w <= 1 {
        return p.mid;
    }
    let t = (x as f32 / (w - 1) as f32 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(p.dark, p.mid, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(p.mid, p.light, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(p.light, p.mid, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(p.mid, p.dark, ((t - 160) * 3).min(256))
    }
}

/// Draw both blocks of an obstacle column with lipped caps around the gap.
pub(crate) fn draw_column_pair(
    frame: &mut PixelBuf,
    obstacle: &Obstacle,
    width: f32,
    palette: &ColumnPalette,
) {
    let x0 = obstacle.x as i32;
    let w = (width as i32).max(2);
    let top = obstacle.top as i32;
    let bottom = obstacle.bottom as i32;
    let h = frame.h as i32;
    let cap_h = (w / 6).clamp(1, 4);
    let cap_extra = (w / 12).clamp(1, 3);

    for x in 0..w {
        let c = shade_column(x, w, palette);
        for y in 0..(top - cap_h) {
            frame.set(x0 + x, y, c);
        }
        for y in (bottom + cap_h)..h {
            frame.set(x0 + x, y, c);
        }
    }
    for x in -cap_extra..(w + cap_extra) {
        let c = shade_column(x + cap_extra, w + cap_extra * 2, palette);
        for y in (top - cap_h).max(0)..top {
            frame.set(x0 + x, y, c);
        }
        for y in bottom..(bottom + cap_h).min(h) {
            frame.set(x0 + x, y, c);
        }
        frame.set(x0 + x, top - 1, palette.edge);
        frame.set(x0 + x, bottom, palette.edge);
    }
}

/// Cheap deterministic hash to 0..1 for background sparkle placement.
pub(crate) fn hash01(seed: u32) -> f32 {
    let x = seed.wrapping_mul(2_654_435_761).wrapping_add(1_013_904_223);
    let bits = (x >> 16) ^ x;
    (bits % 1000) as f32 / 1000.0
}

pub(crate) fn fill_ellipse(frame: &mut PixelBuf, cx: f32, cy: f32, rx: f32, ry: f32, c: Rgb) {
    let rx = rx.max(0.5);
    let ry = ry.max(0.5);
    let x0 = (cx - rx).floor() as i32;
    let x1 = (cx + rx).ceil() as i32;
    let y0 = (cy - ry).floor() as i32;
    let y1 = (cy + ry).ceil() as i32;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = (x as f32 - cx) / rx;
            let dy = (y as f32 - cy) / ry;
            if dx * dx + dy * dy <= 1.0 {
                frame.set(x, y, c);
            }
        }
    }
}

/// Colors for the shared bird body builder.
pub(crate) struct BirdPalette {
    pub body: Rgb,
    pub highlight: Rgb,
    pub wing: Rgb,
    pub eye: Rgb,
    pub pupil: Rgb,
    pub beak: Rgb,
}

/// The basic flappy silhouette every theme dresses up: round body,
/// beating wing, eye and beak, tilted by the avatar's rotation.
pub(crate) fn draw_bird_base(
    frame: &mut PixelBuf,
    avatar: &Avatar,
    time: f32,
    palette: &BirdPalette,
) {
    let cx = avatar.x;
    let cy = avatar.y;
    let r = avatar.radius;
    let tilt = (avatar.rotation * 2.0).clamp(-2.0, 2.0);

    fill_ellipse(frame, cx, cy, r, r * 0.8, palette.body);
    // top sheen
    fill_ellipse(frame, cx - r * 0.15, cy - r * 0.45, r * 0.6, r * 0.25, palette.highlight);

    // wing beats roughly eight times a second
    let wing_up = (time * 8.0) as i32 % 2 == 0;
    let wing_dy = if wing_up { -r * 0.15 } else { r * 0.3 };
    fill_ellipse(
        frame,
        cx - r * 0.35,
        cy + wing_dy + tilt,
        r * 0.55,
        r * 0.35,
        palette.wing,
    );

    // eye toward the leading edge
    let ex = cx + r * 0.45;
    let ey = cy - r * 0.3 + tilt * 0.5;
    fill_ellipse(frame, ex, ey, (r * 0.28).max(1.0), (r * 0.28).max(1.0), palette.eye);
    frame.set((ex + r * 0.12) as i32, ey as i32, palette.pupil);

    // beak
    let bx = cx + r;
    let by = cy - r * 0.1 + tilt;
    frame.fill_rect(
        bx as i32,
        by as i32,
        (r * 0.7).max(2.0) as i32,
        (r * 0.35).max(1.0) as i32,
        palette.beak,
    );
}
