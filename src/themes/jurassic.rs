//! Jurassic Dusk: amber sunset over ridge silhouettes, stone columns,
//! and a slow reedy pad underneath.

use crate::audio::profile::{
    AmbientOverrides, FilterKind, FilterSpec, FlapOverrides, GameOverOverrides, LevelOverrides,
    ProfileOverrides, ScoreOverrides, VoiceOverrides, Waveform,
};
use crate::physics::{Avatar, Obstacle};
use crate::render::{PixelBuf, Rgb};

use super::{BirdPalette, ColumnPalette, Theme, draw_bird_base, draw_column_pair, fill_ellipse, sky_gradient};

const SKY_TOP: Rgb = Rgb(64, 24, 52);
const SKY_MID: Rgb = Rgb(188, 92, 48);
const SKY_BOT: Rgb = Rgb(240, 168, 80);
const SUN: Rgb = Rgb(255, 214, 140);
const RIDGE_FAR: Rgb = Rgb(110, 52, 44);
const RIDGE_NEAR: Rgb = Rgb(70, 34, 36);
const GROUND: Rgb = Rgb(52, 26, 28);

pub struct JurassicDusk;

impl Theme for JurassicDusk {
    fn id(&self) -> &'static str {
        "jurassic"
    }

    fn label(&self) -> &'static str {
        "JURASSIC DUSK"
    }

    fn accent(&self) -> Rgb {
        Rgb(255, 179, 71)
    }

    fn particle_hue(&self, time: f32, index: usize) -> f32 {
        let i = index as f32;
        (40.0 + (time * 3.0 + i).sin() * 20.0 + i * 12.0).rem_euclid(360.0)
    }

    fn draw_background(&self, frame: &mut PixelBuf, time: f32) {
        sky_gradient(frame, SKY_TOP, SKY_MID, SKY_BOT);
        let w = frame.w as i32;
        let h = frame.h as i32;

        // low sun with a slow shimmer
        let sun_r = (h as f32 * 0.16).max(3.0) + (time * 0.7).sin() * 0.8;
        fill_ellipse(frame, w as f32 * 0.72, h as f32 * 0.58, sun_r, sun_r * 0.9, SUN);

        // two ridge lines, the near one darker and taller
        for x in 0..w {
            let fx = x as f32;
            let far = (fx * 0.05 + 1.3).sin() * 4.0 + (fx * 0.013).sin() * 6.0;
            let near = (fx * 0.08).sin() * 3.0 + (fx * 0.021 + 2.0).sin() * 8.0;
            let far_top = h - (h / 4) - far as i32;
            let near_top = h - (h / 6) - near as i32;
            for y in far_top..h {
                frame.set(x, y, RIDGE_FAR);
            }
            for y in near_top..h {
                frame.set(x, y, RIDGE_NEAR);
            }
        }
        frame.fill_rect(0, h - (h / 24).max(1), w, (h / 24).max(1), GROUND);
    }

    fn draw_obstacle(&self, frame: &mut PixelBuf, obstacle: &Obstacle, width: f32, _time: f32) {
        let palette = ColumnPalette {
            dark: Rgb(84, 62, 48),
            mid: Rgb(128, 98, 72),
            light: Rgb(168, 132, 92),
            edge: Rgb(96, 120, 52),
        };
        draw_column_pair(frame, obstacle, width, &palette);
        // moss specks seeded per column
        let n = (width as i32).max(2);
        for k in 0..n {
            let r = super::hash01((obstacle.seed * 1000.0) as u32 + k as u32 * 17);
            if r > 0.6 {
                let x = obstacle.x as i32 + (r * width) as i32 % n;
                let y = obstacle.top as i32 - 2 - (r * 9.0) as i32;
                frame.set(x, y, Rgb(86, 110, 48));
            }
        }
    }

    fn draw_avatar(&self, frame: &mut PixelBuf, avatar: &Avatar, time: f32) {
        let palette = BirdPalette {
            body: Rgb(205, 150, 85),
            highlight: Rgb(232, 186, 122),
            wing: Rgb(148, 98, 54),
            eye: Rgb(255, 248, 230),
            pupil: Rgb(40, 22, 12),
            beak: Rgb(188, 116, 58),
        };
        draw_bird_base(frame, avatar, time, &palette);
        // little head crest
        let r = avatar.radius;
        frame.set(
            (avatar.x + r * 0.3) as i32,
            (avatar.y - r * 1.05) as i32,
            Rgb(148, 98, 54),
        );
    }

    fn audio(&self) -> ProfileOverrides {
        ProfileOverrides {
            ambient: AmbientOverrides {
                voices: vec![
                    VoiceOverrides {
                        waveform: Some(Waveform::Triangle),
                        frequency: Some(96.0),
                        detune: Some(-10.0),
                        sweep_rate: Some(0.03),
                        sweep_depth: Some(90.0),
                        vibrato_rate: Some(0.6),
                        vibrato_depth: Some(4.5),
                        filter: Some(FilterSpec::new(FilterKind::Lowpass, 520.0, 10.0)),
                        pan_depth: Some(0.4),
                        pan_offset: Some(-0.3),
                        ..VoiceOverrides::default()
                    },
                    VoiceOverrides {
                        waveform: Some(Waveform::Sine),
                        frequency: Some(148.0),
                        detune: Some(6.0),
                        sweep_rate: Some(0.028),
                        sweep_depth: Some(120.0),
                        vibrato_rate: Some(0.7),
                        vibrato_depth: Some(6.5),
                        filter: Some(FilterSpec::new(FilterKind::Lowpass, 480.0, 8.0)),
                        pan_depth: Some(0.45),
                        pan_offset: Some(0.2),
                        ..VoiceOverrides::default()
                    },
                    VoiceOverrides {
                        waveform: Some(Waveform::Triangle),
                        frequency: Some(198.0),
                        detune: Some(-10.0),
                        sweep_rate: Some(0.025),
                        sweep_depth: Some(100.0),
                        vibrato_rate: Some(0.55),
                        vibrato_depth: Some(5.0),
                        filter: Some(FilterSpec::new(FilterKind::Bandpass, 420.0, 6.0)),
                        pan_depth: Some(0.35),
                        pan_offset: Some(0.45),
                        ..VoiceOverrides::default()
                    },
                ],
                levels: LevelOverrides {
                    idle: Some(0.3),
                    running: Some(0.75),
                    game_over: Some(0.2),
                },
                transition: Some(1.2),
                ..AmbientOverrides::default()
            },
            flap: FlapOverrides {
                waveform: Some(Waveform::Sine),
                start_freq: Some(280.0),
                peak_freq: Some(520.0),
                end_freq: Some(200.0),
                filter: Some(FilterSpec::new(FilterKind::Bandpass, 540.0, 6.0)),
                attack: Some(0.025),
                max_gain: Some(0.38),
                decay: Some(0.45),
                ..FlapOverrides::default()
            },
            score: ScoreOverrides {
                high_start: Some(520.0),
                high_mid: Some(680.0),
                high_end: Some(880.0),
                high_mid_time: Some(0.14),
                high_end_time: Some(0.3),
                low_start: Some(260.0),
                low_end: Some(340.0),
                shimmer_gain: Some(0.18),
                delay_time: Some(0.28),
                feedback_gain: Some(0.26),
                release: Some(0.75),
                ..ScoreOverrides::default()
            },
            game_over: GameOverOverrides {
                waveform: Some(Waveform::Triangle),
                start_freq: Some(420.0),
                end_freq: Some(120.0),
                filter_start: Some(1100.0),
                filter_end: Some(200.0),
                attack: Some(0.05),
                max_gain: Some(0.48),
                release: Some(1.2),
                noise_amount: Some(0.32),
                ..GameOverOverrides::default()
            },
        }
    }
}
