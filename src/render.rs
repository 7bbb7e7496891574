//! RGB pixel buffer rendered as half-block cells, plus the shared drawing
//! primitives: color math, crossfade blending, aura glows and the 3x5
//! bitmap font used for every piece of on-screen text.

use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};
use std::io::{self, Write};

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const SHADOW: Rgb = Rgb(20, 16, 28);

    pub const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    /// `lerp` with a float weight in 0..=1.
    pub fn mix(a: Rgb, b: Rgb, t: f32) -> Rgb {
        Rgb::lerp(a, b, (t.clamp(0.0, 1.0) * 256.0) as u16)
    }

    /// Additive glow, saturating at white.
    pub fn add(self, other: Rgb, amount: f32) -> Rgb {
        let k = amount.clamp(0.0, 1.0);
        Rgb(
            (self.0 as f32 + other.0 as f32 * k).min(255.0) as u8,
            (self.1 as f32 + other.1 as f32 * k).min(255.0) as u8,
            (self.2 as f32 + other.2 as f32 * k).min(255.0) as u8,
        )
    }

    pub fn scaled(self, k: f32) -> Rgb {
        let k = k.clamp(0.0, 1.0);
        Rgb(
            (self.0 as f32 * k) as u8,
            (self.1 as f32 * k) as u8,
            (self.2 as f32 * k) as u8,
        )
    }
}

/// Hue in degrees (wraps), saturation and lightness in 0..=1.
pub fn hsl(h: f32, s: f32, l: f32) -> Rgb {
    let h = h.rem_euclid(360.0);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c * 0.5;
    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    Rgb(
        ((r + m) * 255.0) as u8,
        ((g + m) * 255.0) as u8,
        ((b + m) * 255.0) as u8,
    )
}

// ── Pixel buffer with half-block rendering ──────────────────────────────────

pub struct PixelBuf {
    pub w: usize,
    pub h: usize, // pixel height = terminal rows * 2
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![Rgb::BLACK; w * h],
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.clear();
        self.px.resize(w * h, Rgb::BLACK);
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    /// Mix `c` over the existing pixel by `alpha`.
    pub fn blend(&mut self, x: i32, y: i32, c: Rgb, alpha: f32) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            let i = y as usize * self.w + x as usize;
            self.px[i] = Rgb::mix(self.px[i], c, alpha);
        }
    }

    /// Additive tint on one pixel; the crossfade dressing draws with this.
    pub fn glow(&mut self, x: i32, y: i32, c: Rgb, amount: f32) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            let i = y as usize * self.w + x as usize;
            self.px[i] = self.px[i].add(c, amount);
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    /// Per-pixel mix of `top` onto this buffer. Both buffers must share
    /// dimensions; extra pixels in either are ignored.
    pub fn blend_from(&mut self, top: &PixelBuf, alpha: f32) {
        let t = (alpha.clamp(0.0, 1.0) * 256.0) as u16;
        let n = self.px.len().min(top.px.len());
        for i in 0..n {
            self.px[i] = Rgb::lerp(self.px[i], top.px[i], t);
        }
    }

    /// Darken everything toward a tint color. Used for pause and game-over
    /// veils.
    pub fn veil(&mut self, tint: Rgb, alpha: f32) {
        let t = (alpha.clamp(0.0, 1.0) * 256.0) as u16;
        for p in &mut self.px {
            *p = Rgb::lerp(*p, tint, t);
        }
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg = Rgb(0, 0, 0);
        let mut prev_bg = Rgb(0, 0, 0);
        let mut need_fg = true;
        let mut need_bg = true;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if top == bot {
                    if need_bg || prev_bg != top {
                        queue!(
                            out,
                            style::SetBackgroundColor(CColor::Rgb {
                                r: top.0,
                                g: top.1,
                                b: top.2
                            })
                        )?;
                        prev_bg = top;
                        need_bg = false;
                    }
                    queue!(out, style::Print(' '))?;
                } else {
                    if need_fg || prev_fg != top {
                        queue!(
                            out,
                            style::SetForegroundColor(CColor::Rgb {
                                r: top.0,
                                g: top.1,
                                b: top.2
                            })
                        )?;
                        prev_fg = top;
                        need_fg = false;
                    }
                    if need_bg || prev_bg != bot {
                        queue!(
                            out,
                            style::SetBackgroundColor(CColor::Rgb {
                                r: bot.0,
                                g: bot.1,
                                b: bot.2
                            })
                        )?;
                        prev_bg = bot;
                        need_bg = false;
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row < rows - 1 {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                need_fg = true;
                need_bg = true;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

// ── Aura and crossfade dressing ─────────────────────────────────────────────

/// Soft radial glow around the upper-middle of the screen plus three slow
/// horizontal light bands. Every theme sits under one of these; during a
/// crossfade both themes' auras overlap at opposing intensities.
pub fn draw_aura(buf: &mut PixelBuf, time: f32, accent: Rgb, intensity: f32) {
    if intensity <= 0.0 {
        return;
    }
    let w = buf.w as f32;
    let h = buf.h as f32;
    let cx = w * 0.5;
    let cy = h * 0.45;
    let radius = w.max(h) * 0.65;
    for y in 0..buf.h {
        for x in 0..buf.w {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let d = (dx * dx + dy * dy).sqrt() / radius;
            if d < 1.0 {
                let a = 0.12 * intensity * (1.0 - d);
                buf.glow(x as i32, y as i32, accent, a);
            }
        }
    }
    for band in 0..3 {
        let i = band as f32;
        let band_h = h * (0.18 + i * 0.08);
        let offset = h * 0.25 + i * h * 0.1 + ((time * (0.9 + i * 0.15) + i).sin()) * h * 0.045;
        let y0 = (offset - band_h * 0.5) as i32;
        let y1 = (offset + band_h * 0.5) as i32;
        for y in y0.max(0)..y1.min(buf.h as i32) {
            // fade toward the band edges
            let t = (y - y0) as f32 / (y1 - y0).max(1) as f32;
            let edge = 1.0 - (t * 2.0 - 1.0).abs();
            let a = 0.16 * intensity * edge * 0.5;
            for x in 0..buf.w as i32 {
                buf.glow(x, y, accent, a);
            }
        }
    }
}

/// Ring burst drawn while a theme crossfade is in flight: the outgoing
/// theme's rings expand and fade while the incoming theme's arcs sweep in.
pub fn draw_transition_rings(buf: &mut PixelBuf, time: f32, from: Rgb, to: Rgb, eased: f32) {
    let w = buf.w as f32;
    let h = buf.h as f32;
    let cx = w * 0.5;
    let cy = h * 0.5;
    let out_a = 0.4 * (1.0 - eased);
    let in_a = 0.45 * eased;
    for i in 0..4 {
        let fi = i as f32;
        if out_a > 0.01 {
            let r = w * (0.25 + fi * 0.12) * (1.0 + 0.12 * (time * 1.4 + fi).sin());
            stroke_ring(buf, cx, cy, r, 1.0 + fi * 0.5, from, out_a, 0.0, std::f32::consts::TAU);
        }
        if in_a > 0.01 {
            let r = w * (0.18 + fi * 0.1);
            let arc_off = (time * 1.6 + fi).sin() * std::f32::consts::PI * 0.6;
            stroke_ring(
                buf,
                cx,
                cy,
                r,
                1.0 + fi * 0.4,
                to,
                in_a,
                arc_off,
                std::f32::consts::PI * 1.2,
            )
        }
    }
}

/// Walk an arc parametrically and glow each pixel it touches. Terminal
/// pixels are roughly twice as tall as wide, so y is squashed to keep
/// rings round-ish.
#[allow(clippy::too_many_arguments)]
fn stroke_ring(
    buf: &mut PixelBuf,
    cx: f32,
    cy: f32,
    radius: f32,
    width: f32,
    color: Rgb,
    alpha: f32,
    arc_start: f32,
    arc_len: f32,
) {
    if radius < 1.0 {
        return;
    }
    let steps = (radius * arc_len).ceil().max(8.0) as u32;
    for s in 0..steps {
        let a = arc_start + arc_len * s as f32 / steps as f32;
        for wstep in 0..width.ceil() as i32 {
            let r = radius + wstep as f32;
            let x = cx + a.cos() * r;
            let y = cy + a.sin() * r * 0.55;
            buf.glow(x as i32, y as i32, color, alpha);
        }
    }
}

// ── 3x5 bitmap font ─────────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

#[rustfmt::skip]
const LETTERS: [[u8; 15]; 26] = [
    [0,1,0, 1,0,1, 1,1,1, 1,0,1, 1,0,1], // A
    [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,1,0], // B
    [0,1,1, 1,0,0, 1,0,0, 1,0,0, 0,1,1], // C
    [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,1,0], // D
    [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,1,1], // E
    [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,0,0], // F
    [0,1,1, 1,0,0, 1,0,1, 1,0,1, 0,1,1], // G
    [1,0,1, 1,0,1, 1,1,1, 1,0,1, 1,0,1], // H
    [1,1,1, 0,1,0, 0,1,0, 0,1,0, 1,1,1], // I
    [0,0,1, 0,0,1, 0,0,1, 1,0,1, 0,1,0], // J
    [1,0,1, 1,1,0, 1,0,0, 1,1,0, 1,0,1], // K
    [1,0,0, 1,0,0, 1,0,0, 1,0,0, 1,1,1], // L
    [1,0,1, 1,1,1, 1,0,1, 1,0,1, 1,0,1], // M
    [1,0,1, 1,1,1, 1,1,1, 1,0,1, 1,0,1], // N
    [0,1,0, 1,0,1, 1,0,1, 1,0,1, 0,1,0], // O
    [1,1,0, 1,0,1, 1,1,0, 1,0,0, 1,0,0], // P
    [0,1,0, 1,0,1, 1,0,1, 0,1,0, 0,0,1], // Q
    [1,1,0, 1,0,1, 1,1,0, 1,1,0, 1,0,1], // R
    [0,1,1, 1,0,0, 0,1,0, 0,0,1, 1,1,0], // S
    [1,1,1, 0,1,0, 0,1,0, 0,1,0, 0,1,0], // T
    [1,0,1, 1,0,1, 1,0,1, 1,0,1, 0,1,1], // U
    [1,0,1, 1,0,1, 1,0,1, 1,0,1, 0,1,0], // V
    [1,0,1, 1,0,1, 1,0,1, 1,1,1, 1,0,1], // W
    [1,0,1, 1,0,1, 0,1,0, 1,0,1, 1,0,1], // X
    [1,0,1, 1,0,1, 0,1,0, 0,1,0, 0,1,0], // Y
    [1,1,1, 0,0,1, 0,1,0, 1,0,0, 1,1,1], // Z
];

fn glyph_for(ch: char) -> Option<&'static [u8; 15]> {
    match ch {
        '0'..='9' => Some(&DIGITS[(ch as u8 - b'0') as usize]),
        'A'..='Z' => Some(&LETTERS[(ch as u8 - b'A') as usize]),
        'a'..='z' => Some(&LETTERS[(ch as u8 - b'a') as usize]),
        _ => None,
    }
}

fn draw_glyph(buf: &mut PixelBuf, x: i32, y: i32, glyph: &[u8; 15], fg: Rgb, shadow: bool) {
    for row in 0..5 {
        for col in 0..3 {
            if glyph[row * 3 + col] == 1 {
                let px = x + col as i32;
                let py = y + row as i32;
                if shadow {
                    buf.set(px + 1, py + 1, Rgb::SHADOW);
                }
                buf.set(px, py, fg);
            }
        }
    }
}

/// Width in pixels of a string drawn by `draw_text` (3px glyphs, 1px gaps).
pub fn text_width(s: &str) -> i32 {
    let n = s.chars().count() as i32;
    if n == 0 { 0 } else { n * 4 - 1 }
}

/// Draw a string of digits, letters and spaces; anything else renders as a
/// blank cell. `cx` is the horizontal center.
pub fn draw_text(buf: &mut PixelBuf, cx: i32, y: i32, text: &str, fg: Rgb) {
    let start_x = cx - text_width(text) / 2;
    for (i, ch) in text.chars().enumerate() {
        if let Some(glyph) = glyph_for(ch) {
            draw_glyph(buf, start_x + i as i32 * 4, y, glyph, fg, true);
        }
    }
}

pub fn draw_number(buf: &mut PixelBuf, cx: i32, y: i32, n: u32, fg: Rgb) {
    let s = n.to_string();
    let total_w = s.len() as i32 * 4 - 1; // 3px per digit + 1px spacing
    let start_x = cx - total_w / 2;
    for (i, ch) in s.chars().enumerate() {
        let d = ch as u8 - b'0';
        draw_glyph(buf, start_x + i as i32 * 4, y, &DIGITS[d as usize], fg, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints() {
        let a = Rgb(10, 20, 30);
        let b = Rgb(200, 100, 50);
        assert_eq!(Rgb::lerp(a, b, 0), a);
        assert_eq!(Rgb::lerp(a, b, 256), b);
    }

    #[test]
    fn hsl_primaries() {
        assert_eq!(hsl(0.0, 1.0, 0.5), Rgb(255, 0, 0));
        assert_eq!(hsl(120.0, 1.0, 0.5), Rgb(0, 255, 0));
        assert_eq!(hsl(240.0, 1.0, 0.5), Rgb(0, 0, 255));
    }

    #[test]
    fn hsl_wraps_hue() {
        assert_eq!(hsl(360.0, 1.0, 0.5), hsl(0.0, 1.0, 0.5));
        assert_eq!(hsl(-120.0, 1.0, 0.5), hsl(240.0, 1.0, 0.5));
    }

    #[test]
    fn blend_from_midpoint() {
        let mut base = PixelBuf::new(2, 2);
        base.fill_rect(0, 0, 2, 2, Rgb(0, 0, 0));
        let mut top = PixelBuf::new(2, 2);
        top.fill_rect(0, 0, 2, 2, Rgb(255, 255, 255));
        base.blend_from(&top, 0.5);
        let mid = base.get(0, 0);
        assert!(mid.0 > 100 && mid.0 < 156);
    }

    #[test]
    fn set_ignores_out_of_bounds() {
        let mut buf = PixelBuf::new(4, 4);
        buf.set(-1, 0, Rgb::WHITE);
        buf.set(0, -1, Rgb::WHITE);
        buf.set(4, 0, Rgb::WHITE);
        buf.set(0, 4, Rgb::WHITE);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(buf.get(x, y), Rgb::BLACK);
            }
        }
    }

    #[test]
    fn text_width_matches_draw_span() {
        assert_eq!(text_width(""), 0);
        assert_eq!(text_width("A"), 3);
        assert_eq!(text_width("AB"), 7);
        assert_eq!(text_width("GAME OVER"), 35);
    }
}
