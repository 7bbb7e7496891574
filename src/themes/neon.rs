//! Neon Pulse: synthwave grid under a magenta sky. The roster opener and
//! the theme every game-over fades back to.

use crate::audio::profile::{
    AmbientOverrides, FilterKind, FilterSpec, FlapOverrides, GameOverOverrides, LevelOverrides,
    ProfileOverrides, ScoreOverrides, VoiceOverrides, Waveform,
};
use crate::physics::{Avatar, Obstacle};
use crate::render::{PixelBuf, Rgb};

use super::{BirdPalette, ColumnPalette, Theme, draw_bird_base, draw_column_pair, sky_gradient};

const SKY_TOP: Rgb = Rgb(16, 6, 38);
const SKY_MID: Rgb = Rgb(52, 12, 74);
const SKY_BOT: Rgb = Rgb(96, 20, 96);
const GRID: Rgb = Rgb(255, 80, 240);
const GRID_DIM: Rgb = Rgb(140, 40, 150);
const FLOOR: Rgb = Rgb(28, 8, 44);

pub struct NeonPulse;

impl Theme for NeonPulse {
    fn id(&self) -> &'static str {
        "neon"
    }

    fn label(&self) -> &'static str {
        "NEON PULSE"
    }

    fn accent(&self) -> Rgb {
        Rgb(255, 103, 255)
    }

    fn particle_hue(&self, time: f32, index: usize) -> f32 {
        (time * 90.0 + index as f32 * 45.0).rem_euclid(360.0)
    }

    fn draw_background(&self, frame: &mut PixelBuf, time: f32) {
        sky_gradient(frame, SKY_TOP, SKY_MID, SKY_BOT);
        let w = frame.w as i32;
        let h = frame.h as i32;
        let horizon = h - (h / 6).max(2);

        // floor wash below the horizon
        frame.fill_rect(0, horizon, w, h - horizon, FLOOR);

        // perspective grid: verticals fan out from the center
        let cx = w / 2;
        for k in -8..=8 {
            let spread = k * w / 10;
            let x_top = cx + spread / 4;
            let x_bot = cx + spread * 2;
            for y in horizon..h {
                let t = (y - horizon) as f32 / (h - horizon).max(1) as f32;
                let x = x_top as f32 + (x_bot - x_top) as f32 * t;
                frame.set(x as i32, y, GRID_DIM);
            }
        }
        // horizontals scroll toward the viewer
        let scroll = (time * 10.0).fract();
        let mut row = 0.0;
        while row < 1.0 {
            let y = horizon + ((row + scroll).fract().powi(2) * (h - horizon) as f32) as i32;
            for x in 0..w {
                frame.set(x, y, GRID);
            }
            row += 0.25;
        }

        // pulse line at the horizon
        let glow = ((time * 2.4).sin() * 0.5 + 0.5) * 0.8;
        for x in 0..w {
            frame.glow(x, horizon, self.accent(), glow * 0.6);
        }
    }

    fn draw_obstacle(&self, frame: &mut PixelBuf, obstacle: &Obstacle, width: f32, time: f32) {
        let palette = ColumnPalette {
            dark: Rgb(40, 8, 60),
            mid: Rgb(96, 24, 128),
            light: Rgb(210, 70, 230),
            edge: Rgb(255, 120, 255),
        };
        draw_column_pair(frame, obstacle, width, &palette);
        // animated light crawling along the gap lip
        let phase = ((time * 3.0 + obstacle.seed * 7.0).sin() * 0.5 + 0.5) * width;
        frame.glow(
            (obstacle.x + phase) as i32,
            obstacle.top as i32 - 1,
            Rgb::WHITE,
            0.8,
        );
        frame.glow((obstacle.x + phase) as i32, obstacle.bottom as i32, Rgb::WHITE, 0.8);
    }

    fn draw_avatar(&self, frame: &mut PixelBuf, avatar: &Avatar, time: f32) {
        let palette = BirdPalette {
            body: Rgb(255, 103, 255),
            highlight: Rgb(255, 178, 255),
            wing: Rgb(184, 52, 214),
            eye: Rgb::WHITE,
            pupil: Rgb(24, 8, 32),
            beak: Rgb(255, 230, 96),
        };
        draw_bird_base(frame, avatar, time, &palette);
        // trailing glow pip
        frame.glow(
            (avatar.x - avatar.radius * 1.4) as i32,
            avatar.y as i32,
            self.accent(),
            0.7,
        );
    }

    fn audio(&self) -> ProfileOverrides {
        ProfileOverrides {
            ambient: AmbientOverrides {
                voices: vec![
                    VoiceOverrides {
                        waveform: Some(Waveform::Sawtooth),
                        frequency: Some(96.0),
                        detune: Some(-14.0),
                        sweep_rate: Some(0.05),
                        sweep_depth: Some(160.0),
                        vibrato_rate: Some(0.9),
                        vibrato_depth: Some(7.5),
                        filter: Some(FilterSpec::new(FilterKind::Lowpass, 620.0, 12.0)),
                        pan_depth: Some(0.8),
                        ..VoiceOverrides::default()
                    },
                    VoiceOverrides {
                        waveform: Some(Waveform::Sawtooth),
                        frequency: Some(162.0),
                        detune: Some(12.0),
                        sweep_rate: Some(0.04),
                        sweep_depth: Some(180.0),
                        vibrato_rate: Some(1.1),
                        vibrato_depth: Some(5.5),
                        filter: Some(FilterSpec::new(FilterKind::Lowpass, 580.0, 10.0)),
                        pan_depth: Some(0.65),
                        pan_offset: Some(0.35),
                        ..VoiceOverrides::default()
                    },
                    VoiceOverrides {
                        waveform: Some(Waveform::Triangle),
                        frequency: Some(220.0),
                        detune: Some(-6.0),
                        sweep_rate: Some(0.06),
                        sweep_depth: Some(190.0),
                        vibrato_rate: Some(0.7),
                        vibrato_depth: Some(8.5),
                        filter: Some(FilterSpec::new(FilterKind::Bandpass, 720.0, 8.0)),
                        pan_depth: Some(0.7),
                        pan_offset: Some(-0.45),
                        ..VoiceOverrides::default()
                    },
                ],
                levels: LevelOverrides {
                    idle: Some(0.32),
                    running: Some(0.9),
                    game_over: Some(0.22),
                },
                ..AmbientOverrides::default()
            },
            flap: FlapOverrides {
                waveform: Some(Waveform::Triangle),
                start_freq: Some(360.0),
                peak_freq: Some(920.0),
                end_freq: Some(210.0),
                filter: Some(FilterSpec::new(FilterKind::Bandpass, 760.0, 8.0)),
                attack: Some(0.018),
                max_gain: Some(0.48),
                ..FlapOverrides::default()
            },
            score: ScoreOverrides {
                shimmer_gain: Some(0.28),
                high_mid: Some(1020.0),
                high_end: Some(1400.0),
                high_mid_time: Some(0.1),
                high_end_time: Some(0.22),
                ..ScoreOverrides::default()
            },
            game_over: GameOverOverrides {
                start_freq: Some(520.0),
                end_freq: Some(160.0),
                filter_start: Some(1500.0),
                filter_end: Some(260.0),
                noise_amount: Some(0.42),
                ..GameOverOverrides::default()
            },
        }
    }
}
