//! Cyber Rave: data rain, strobing squares, and the loudest running mix
//! on the roster.

use crate::audio::profile::{
    AmbientOverrides, FilterKind, FilterSpec, FlapOverrides, GameOverOverrides, LevelOverrides,
    ProfileOverrides, ScoreOverrides, VoiceOverrides, Waveform,
};
use crate::physics::{Avatar, Obstacle};
use crate::render::{PixelBuf, Rgb};

use super::{
    BirdPalette, ColumnPalette, Theme, draw_bird_base, draw_column_pair, hash01, sky_gradient,
};

const SKY_TOP: Rgb = Rgb(2, 8, 20);
const SKY_MID: Rgb = Rgb(4, 20, 40);
const SKY_BOT: Rgb = Rgb(6, 34, 56);
const RAIN: Rgb = Rgb(3, 227, 255);
const RAIN_DIM: Rgb = Rgb(12, 96, 120);

pub struct CyberRave;

impl Theme for CyberRave {
    fn id(&self) -> &'static str {
        "cyber"
    }

    fn label(&self) -> &'static str {
        "CYBER RAVE"
    }

    fn accent(&self) -> Rgb {
        Rgb(3, 227, 255)
    }

    fn particle_hue(&self, time: f32, index: usize) -> f32 {
        let i = index as f32;
        (180.0 + (time * 6.0 + i).sin() * 90.0 + i * 15.0).rem_euclid(360.0)
    }

    fn draw_background(&self, frame: &mut PixelBuf, time: f32) {
        sky_gradient(frame, SKY_TOP, SKY_MID, SKY_BOT);
        let w = frame.w as i32;
        let h = frame.h as i32;

        // data rain: one glyph stream every few columns, speed per-column
        for x in (0..w).step_by(3) {
            let col = x as u32 / 3;
            let speed = 12.0 + hash01(col * 31) * 30.0;
            let len = 3 + (hash01(col * 57) * 6.0) as i32;
            let head = ((time * speed + hash01(col * 97) * h as f32) % (h as f32 + len as f32))
                as i32
                - len;
            for k in 0..len {
                let y = head + k;
                let c = if k == len - 1 { RAIN } else { RAIN_DIM };
                frame.set(x, y, c);
            }
        }

        // strobe squares low in the frame, beating with the rave
        let beat = ((time * 4.0).fract() < 0.15) as i32;
        for k in 0..6 {
            let bx = (hash01(k * 131 + 7) * w as f32) as i32;
            let by = h - 4 - (hash01(k * 77 + 3) * (h as f32 * 0.2)) as i32;
            if (k as i32 + beat) % 2 == 0 {
                frame.fill_rect(bx, by, 2, 2, RAIN);
            }
        }
    }

    fn draw_obstacle(&self, frame: &mut PixelBuf, obstacle: &Obstacle, width: f32, time: f32) {
        let palette = ColumnPalette {
            dark: Rgb(6, 30, 44),
            mid: Rgb(12, 62, 84),
            light: Rgb(26, 120, 150),
            edge: Rgb(3, 227, 255),
        };
        draw_column_pair(frame, obstacle, width, &palette);
        // lit windows stacked up the column, flickering by seed
        let x0 = obstacle.x as i32;
        let w = (width as i32).max(2);
        let h = frame.h as i32;
        let mut y = 2;
        let mut row = 0u32;
        while y < h - 2 {
            let in_block = y < obstacle.top as i32 - 2 || y > obstacle.bottom as i32 + 2;
            let lit = hash01((obstacle.seed * 4096.0) as u32 + row * 13) > 0.55;
            let flicker = ((time * 5.0 + row as f32).sin() * 0.5 + 0.5) > 0.3;
            if in_block && lit && flicker {
                frame.fill_rect(x0 + w / 4, y, (w / 4).max(1), 1, Rgb(120, 240, 255));
            }
            y += 4;
            row += 1;
        }
    }

    fn draw_avatar(&self, frame: &mut PixelBuf, avatar: &Avatar, time: f32) {
        let palette = BirdPalette {
            body: Rgb(38, 196, 228),
            highlight: Rgb(150, 240, 255),
            wing: Rgb(18, 112, 150),
            eye: Rgb::WHITE,
            pupil: Rgb(4, 16, 28),
            beak: Rgb(214, 235, 240),
        };
        draw_bird_base(frame, avatar, time, &palette);
        // visor stripe
        let r = avatar.radius;
        frame.fill_rect(
            (avatar.x + r * 0.1) as i32,
            (avatar.y - r * 0.35) as i32,
            (r * 0.9).max(2.0) as i32,
            1,
            Rgb(3, 227, 255),
        );
    }

    fn audio(&self) -> ProfileOverrides {
        ProfileOverrides {
            ambient: AmbientOverrides {
                voices: vec![
                    VoiceOverrides {
                        waveform: Some(Waveform::Square),
                        frequency: Some(128.0),
                        detune: Some(-6.0),
                        sweep_rate: Some(0.08),
                        sweep_depth: Some(120.0),
                        vibrato_rate: Some(1.6),
                        vibrato_depth: Some(4.5),
                        filter: Some(FilterSpec::new(FilterKind::Bandpass, 880.0, 9.0)),
                        pan_depth: Some(0.5),
                        pan_offset: Some(-0.4),
                        ..VoiceOverrides::default()
                    },
                    VoiceOverrides {
                        waveform: Some(Waveform::Square),
                        frequency: Some(196.0),
                        detune: Some(8.0),
                        sweep_rate: Some(0.06),
                        sweep_depth: Some(160.0),
                        vibrato_rate: Some(1.2),
                        vibrato_depth: Some(5.5),
                        filter: Some(FilterSpec::new(FilterKind::Bandpass, 760.0, 8.0)),
                        pan_depth: Some(0.6),
                        pan_offset: Some(0.3),
                        ..VoiceOverrides::default()
                    },
                    VoiceOverrides {
                        waveform: Some(Waveform::Sawtooth),
                        frequency: Some(288.0),
                        detune: Some(2.0),
                        sweep_rate: Some(0.07),
                        sweep_depth: Some(140.0),
                        vibrato_rate: Some(1.4),
                        vibrato_depth: Some(6.5),
                        filter: Some(FilterSpec::new(FilterKind::Highpass, 420.0, 7.0)),
                        pan_depth: Some(0.45),
                        ..VoiceOverrides::default()
                    },
                ],
                levels: LevelOverrides {
                    idle: Some(0.28),
                    running: Some(1.0),
                    game_over: Some(0.24),
                },
                transition: Some(0.6),
                ..AmbientOverrides::default()
            },
            flap: FlapOverrides {
                waveform: Some(Waveform::Square),
                start_freq: Some(420.0),
                peak_freq: Some(980.0),
                end_freq: Some(240.0),
                filter: Some(FilterSpec::new(FilterKind::Highpass, 860.0, 11.0)),
                attack: Some(0.015),
                max_gain: Some(0.42),
                decay: Some(0.32),
                ..FlapOverrides::default()
            },
            score: ScoreOverrides {
                high_wave: Some(Waveform::Square),
                low_wave: Some(Waveform::Square),
                high_start: Some(720.0),
                high_mid: Some(1080.0),
                high_end: Some(1560.0),
                high_mid_time: Some(0.1),
                high_end_time: Some(0.24),
                low_start: Some(320.0),
                low_end: Some(560.0),
                shimmer_gain: Some(0.22),
                delay_time: Some(0.16),
                feedback_gain: Some(0.34),
                ..ScoreOverrides::default()
            },
            game_over: GameOverOverrides {
                waveform: Some(Waveform::Square),
                start_freq: Some(640.0),
                end_freq: Some(220.0),
                filter_kind: Some(FilterKind::Bandpass),
                filter_start: Some(1800.0),
                filter_end: Some(380.0),
                attack: Some(0.03),
                max_gain: Some(0.5),
                release: Some(1.0),
                noise_amount: Some(0.28),
                ..GameOverOverrides::default()
            },
        }
    }
}
