//! Canopy Glow: deep forest light shafts and mossy trunks. Shares its
//! gentle one-shot palette with Jurassic Dusk; only the pad differs.

use crate::audio::profile::{
    AmbientOverrides, FilterKind, FilterSpec, FlapOverrides, GameOverOverrides, LevelOverrides,
    ProfileOverrides, ScoreOverrides, VoiceOverrides, Waveform,
};
use crate::physics::{Avatar, Obstacle};
use crate::render::{PixelBuf, Rgb};

use super::{
    BirdPalette, ColumnPalette, Theme, draw_bird_base, draw_column_pair, hash01, sky_gradient,
};

const SKY_TOP: Rgb = Rgb(10, 34, 22);
const SKY_MID: Rgb = Rgb(18, 58, 34);
const SKY_BOT: Rgb = Rgb(30, 84, 46);
const SHAFT: Rgb = Rgb(180, 240, 160);
const VINE: Rgb = Rgb(24, 70, 36);
const VINE_LIT: Rgb = Rgb(60, 130, 70);
const FLOOR: Rgb = Rgb(16, 44, 26);

pub struct CanopyGlow;

impl Theme for CanopyGlow {
    fn id(&self) -> &'static str {
        "canopy"
    }

    fn label(&self) -> &'static str {
        "CANOPY GLOW"
    }

    fn accent(&self) -> Rgb {
        Rgb(104, 230, 145)
    }

    fn particle_hue(&self, time: f32, index: usize) -> f32 {
        let i = index as f32;
        (110.0 + (time * 4.0 + i).sin() * 30.0 + i * 8.0).rem_euclid(360.0)
    }

    fn draw_background(&self, frame: &mut PixelBuf, time: f32) {
        sky_gradient(frame, SKY_TOP, SKY_MID, SKY_BOT);
        let w = frame.w as i32;
        let h = frame.h as i32;

        // slanted light shafts drifting slowly
        for k in 0u32..4 {
            let base = hash01(k * 211 + 9) * w as f32;
            let x0 = base + (time * 0.4 + k as f32).sin() * 4.0;
            for y in 0..h {
                let x = x0 as i32 + y / 3;
                let strength = 0.25 * (1.0 - y as f32 / h as f32);
                frame.glow(x, y, SHAFT, strength);
                frame.glow(x + 1, y, SHAFT, strength * 0.5);
            }
        }

        // vines hanging from the canopy, swaying
        for k in 0u32..10 {
            let x = (hash01(k * 67 + 13) * w as f32) as i32;
            let len = (hash01(k * 41 + 2) * h as f32 * 0.35) as i32 + 3;
            let sway = (time * 0.9 + k as f32 * 1.7).sin();
            for y in 0..len {
                let dx = (sway * (y as f32 / len as f32) * 2.5) as i32;
                let c = if y % 4 == 0 { VINE_LIT } else { VINE };
                frame.set(x + dx, y, c);
            }
        }
        frame.fill_rect(0, h - (h / 18).max(1), w, (h / 18).max(1), FLOOR);
    }

    fn draw_obstacle(&self, frame: &mut PixelBuf, obstacle: &Obstacle, width: f32, _time: f32) {
        let palette = ColumnPalette {
            dark: Rgb(38, 30, 20),
            mid: Rgb(70, 52, 32),
            light: Rgb(104, 78, 46),
            edge: Rgb(72, 150, 84),
        };
        draw_column_pair(frame, obstacle, width, &palette);
        // leafy tufts at the gap lips
        let w = (width as i32).max(2);
        for k in 0..w {
            let r = hash01((obstacle.seed * 2048.0) as u32 + k as u32 * 29);
            if r > 0.45 {
                let x = obstacle.x as i32 + k;
                frame.set(x, obstacle.top as i32 - 2, Rgb(76, 160, 88));
                frame.set(x, obstacle.bottom as i32 + 1, Rgb(56, 128, 70));
            }
        }
    }

    fn draw_avatar(&self, frame: &mut PixelBuf, avatar: &Avatar, time: f32) {
        let palette = BirdPalette {
            body: Rgb(110, 210, 120),
            highlight: Rgb(170, 240, 170),
            wing: Rgb(58, 140, 80),
            eye: Rgb(250, 255, 240),
            pupil: Rgb(16, 36, 20),
            beak: Rgb(240, 200, 90),
        };
        draw_bird_base(frame, avatar, time, &palette);
    }

    fn audio(&self) -> ProfileOverrides {
        ProfileOverrides {
            ambient: AmbientOverrides {
                voices: vec![
                    VoiceOverrides {
                        waveform: Some(Waveform::Sine),
                        frequency: Some(86.0),
                        detune: Some(-4.0),
                        sweep_rate: Some(0.03),
                        sweep_depth: Some(110.0),
                        vibrato_rate: Some(0.5),
                        vibrato_depth: Some(5.5),
                        filter: Some(FilterSpec::new(FilterKind::Lowpass, 520.0, 9.0)),
                        pan_depth: Some(0.4),
                        pan_offset: Some(-0.35),
                        ..VoiceOverrides::default()
                    },
                    VoiceOverrides {
                        waveform: Some(Waveform::Triangle),
                        frequency: Some(148.0),
                        detune: Some(6.0),
                        sweep_rate: Some(0.028),
                        sweep_depth: Some(140.0),
                        vibrato_rate: Some(0.7),
                        vibrato_depth: Some(6.5),
                        filter: Some(FilterSpec::new(FilterKind::Lowpass, 480.0, 8.0)),
                        pan_depth: Some(0.45),
                        pan_offset: Some(0.2),
                        ..VoiceOverrides::default()
                    },
                    VoiceOverrides {
                        waveform: Some(Waveform::Sine),
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
