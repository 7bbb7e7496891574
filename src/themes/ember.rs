//! Ember Rift: obsidian columns over a lava floor, sparks riding the
//! updraft, and the hottest one-shots in the set.

use crate::audio::profile::{
    AmbientOverrides, FilterKind, FilterSpec, FlapOverrides, GameOverOverrides, LevelOverrides,
    ProfileOverrides, ScoreOverrides, VoiceOverrides, Waveform,
};
use crate::physics::{Avatar, Obstacle};
use crate::render::{PixelBuf, Rgb};

use super::{
    BirdPalette, ColumnPalette, Theme, draw_bird_base, draw_column_pair, hash01, sky_gradient,
};

const SKY_TOP: Rgb = Rgb(26, 6, 10);
const SKY_MID: Rgb = Rgb(66, 14, 14);
const SKY_BOT: Rgb = Rgb(120, 30, 16);
const LAVA: Rgb = Rgb(255, 120, 30);
const LAVA_DEEP: Rgb = Rgb(200, 62, 18);
const SPARK: Rgb = Rgb(255, 180, 90);

pub struct EmberRift;

impl Theme for EmberRift {
    fn id(&self) -> &'static str {
        "ember"
    }

    fn label(&self) -> &'static str {
        "EMBER RIFT"
    }

    fn accent(&self) -> Rgb {
        Rgb(255, 92, 47)
    }

    fn particle_hue(&self, time: f32, index: usize) -> f32 {
        let i = index as f32;
        (20.0 + (time * 5.0 + i).sin() * 40.0 + i * 25.0).rem_euclid(360.0)
    }

    fn draw_background(&self, frame: &mut PixelBuf, time: f32) {
        sky_gradient(frame, SKY_TOP, SKY_MID, SKY_BOT);
        let w = frame.w as i32;
        let h = frame.h as i32;

        // molten floor with a wobbling surface
        for x in 0..w {
            let surface = h - (h / 10).max(2) - ((x as f32 * 0.2 + time * 1.5).sin() * 1.5) as i32;
            for y in surface..h {
                let deep = y > surface + 1;
                frame.set(x, y, if deep { LAVA_DEEP } else { LAVA });
            }
            frame.glow(x, surface - 1, LAVA, 0.3);
        }

        // sparks rising on per-seed lanes
        for k in 0u32..24 {
            let lane = hash01(k * 101 + 5) * w as f32;
            let rate = 6.0 + hash01(k * 59 + 1) * 10.0;
            let y = h as f32 - ((time * rate + hash01(k * 23) * h as f32) % (h as f32 * 0.9));
            let drift = (time * 1.3 + k as f32).sin() * 2.0;
            frame.glow((lane + drift) as i32, y as i32, SPARK, 0.8);
        }
    }

    fn draw_obstacle(&self, frame: &mut PixelBuf, obstacle: &Obstacle, width: f32, time: f32) {
        let palette = ColumnPalette {
            dark: Rgb(20, 10, 14),
            mid: Rgb(48, 26, 30),
            light: Rgb(84, 46, 44),
            edge: Rgb(255, 120, 40),
        };
        draw_column_pair(frame, obstacle, width, &palette);
        // a lava seam running down the column, pulsing
        let seam_hi = (width as i32 - 2).max(1);
        let seam_x = obstacle.x as i32 + ((obstacle.seed * width) as i32).clamp(1, seam_hi);
        let pulse = 0.4 + ((time * 2.0 + obstacle.seed * 12.0).sin() * 0.5 + 0.5) * 0.5;
        let h = frame.h as i32;
        for y in (0..obstacle.top as i32 - 2).chain(obstacle.bottom as i32 + 2..h) {
            if y % 3 != 0 {
                frame.glow(seam_x, y, LAVA, pulse);
            }
        }
    }

    fn draw_avatar(&self, frame: &mut PixelBuf, avatar: &Avatar, time: f32) {
        let palette = BirdPalette {
            body: Rgb(255, 120, 40),
            highlight: Rgb(255, 190, 90),
            wing: Rgb(200, 60, 24),
            eye: Rgb(255, 244, 220),
            pupil: Rgb(40, 10, 8),
            beak: Rgb(255, 220, 110),
        };
        draw_bird_base(frame, avatar, time, &palette);
        // flame tail flicker
        let r = avatar.radius;
        let flicker = (time * 11.0).sin() * r * 0.2;
        frame.glow(
            (avatar.x - r * 1.3) as i32,
            (avatar.y + flicker) as i32,
            LAVA,
            0.9,
        );
    }

    fn audio(&self) -> ProfileOverrides {
        ProfileOverrides {
            ambient: AmbientOverrides {
                voices: vec![
                    VoiceOverrides {
                        waveform: Some(Waveform::Sawtooth),
                        frequency: Some(160.0),
                        detune: Some(-8.0),
                        sweep_rate: Some(0.06),
                        sweep_depth: Some(180.0),
                        vibrato_rate: Some(1.2),
                        vibrato_depth: Some(6.5),
                        filter: Some(FilterSpec::new(FilterKind::Bandpass, 960.0, 12.0)),
                        pan_depth: Some(0.45),
                        ..VoiceOverrides::default()
                    },
                    VoiceOverrides {
                        waveform: Some(Waveform::Triangle),
                        frequency: Some(220.0),
                        detune: Some(6.0),
                        sweep_rate: Some(0.05),
                        sweep_depth: Some(160.0),
                        vibrato_rate: Some(1.0),
                        vibrato_depth: Some(5.5),
                        filter: Some(FilterSpec::new(FilterKind::Bandpass, 840.0, 10.0)),
                        pan_depth: Some(0.55),
                        pan_offset: Some(-0.3),
                        ..VoiceOverrides::default()
                    },
                    VoiceOverrides {
                        waveform: Some(Waveform::Sawtooth),
                        frequency: Some(320.0),
                        detune: Some(-12.0),
                        sweep_rate: Some(0.045),
                        sweep_depth: Some(140.0),
                        vibrato_rate: Some(1.4),
                        vibrato_depth: Some(7.5),
                        filter: Some(FilterSpec::new(FilterKind::Highpass, 500.0, 9.0)),
                        pan_depth: Some(0.5),
                        pan_offset: Some(0.35),
                        ..VoiceOverrides::default()
                    },
                ],
                levels: LevelOverrides {
                    idle: Some(0.32),
                    running: Some(0.92),
                    game_over: Some(0.26),
                },
                transition: Some(0.5),
                ..AmbientOverrides::default()
            },
            flap: FlapOverrides {
                waveform: Some(Waveform::Sawtooth),
                start_freq: Some(520.0),
                peak_freq: Some(980.0),
                end_freq: Some(280.0),
                filter: Some(FilterSpec::new(FilterKind::Highpass, 860.0, 10.0)),
                attack: Some(0.015),
                max_gain: Some(0.5),
                ..FlapOverrides::default()
            },
            score: ScoreOverrides {
                high_wave: Some(Waveform::Sawtooth),
                high_start: Some(820.0),
                high_mid: Some(1160.0),
                high_end: Some(1680.0),
                high_mid_time: Some(0.08),
                high_end_time: Some(0.22),
                low_start: Some(340.0),
                low_end: Some(520.0),
                shimmer_gain: Some(0.3),
                delay_time: Some(0.18),
                feedback_gain: Some(0.36),
                ..ScoreOverrides::default()
            },
            game_over: GameOverOverrides {
                waveform: Some(Waveform::Sawtooth),
                start_freq: Some(720.0),
                end_freq: Some(200.0),
                filter_kind: Some(FilterKind::Bandpass),
                filter_start: Some(2000.0),
                filter_end: Some(320.0),
                attack: Some(0.02),
                max_gain: Some(0.58),
                release: Some(1.1),
                noise_amount: Some(0.35),
                ..GameOverOverrides::default()
            },
        }
    }
}
