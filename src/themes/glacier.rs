//! Glacier Drift: aurora ribbons over pack ice, the calmest board of the
//! roster with glassy sine pads.

use crate::audio::profile::{
    AmbientOverrides, FilterKind, FilterSpec, FlapOverrides, GameOverOverrides, LevelOverrides,
    ProfileOverrides, ScoreOverrides, VoiceOverrides, Waveform,
};
use crate::physics::{Avatar, Obstacle};
use crate::render::{PixelBuf, Rgb};

use super::{
    BirdPalette, ColumnPalette, Theme, draw_bird_base, draw_column_pair, hash01, sky_gradient,
};

const SKY_TOP: Rgb = Rgb(8, 20, 44);
const SKY_MID: Rgb = Rgb(20, 44, 80);
const SKY_BOT: Rgb = Rgb(54, 92, 130);
const AURORA_A: Rgb = Rgb(90, 230, 180);
const AURORA_B: Rgb = Rgb(140, 150, 255);
const SNOW: Rgb = Rgb(235, 245, 255);
const FLOE: Rgb = Rgb(190, 215, 235);
const FLOE_DIM: Rgb = Rgb(130, 160, 190);

pub struct GlacierDrift;

impl Theme for GlacierDrift {
    fn id(&self) -> &'static str {
        "glacier"
    }

    fn label(&self) -> &'static str {
        "GLACIER DRIFT"
    }

    fn accent(&self) -> Rgb {
        Rgb(157, 220, 255)
    }

    fn particle_hue(&self, time: f32, index: usize) -> f32 {
        let i = index as f32;
        (200.0 + (time * 4.0 + i).sin() * 25.0 + i * 10.0).rem_euclid(360.0)
    }

    fn draw_background(&self, frame: &mut PixelBuf, time: f32) {
        sky_gradient(frame, SKY_TOP, SKY_MID, SKY_BOT);
        let w = frame.w as i32;
        let h = frame.h as i32;

        // aurora ribbon weaving across the upper third
        for x in 0..w {
            let fx = x as f32;
            let wave = (fx * 0.08 + time * 0.6).sin() * h as f32 * 0.06;
            let y0 = (h as f32 * 0.16 + wave) as i32;
            let blend = ((fx * 0.05 + time * 0.3).sin() + 1.0) * 0.5;
            let c = Rgb::mix(AURORA_A, AURORA_B, blend);
            for dy in 0..3 {
                frame.glow(x, y0 + dy, c, 0.5 - dy as f32 * 0.14);
            }
        }

        // drifting snow
        for k in 0u32..40 {
            let speed = 2.0 + hash01(k * 97 + 5) * 4.0;
            let fx = hash01(k * 53 + 11) * w as f32 - time * speed * 0.6;
            let fy = (hash01(k * 31 + 7) * h as f32 + time * speed) % h as f32;
            frame.glow(fx.rem_euclid(w as f32) as i32, fy as i32, SNOW, 0.8);
        }

        // pack ice band along the floor
        let band = (h / 14).max(1);
        for y in (h - band)..h {
            for x in 0..w {
                let crack = hash01((x * 7 + y * 131) as u32);
                let c = if crack > 0.9 { FLOE_DIM } else { FLOE };
                frame.set(x, y, c);
            }
        }
    }

    fn draw_obstacle(&self, frame: &mut PixelBuf, obstacle: &Obstacle, width: f32, _time: f32) {
        let palette = ColumnPalette {
            dark: Rgb(66, 104, 150),
            mid: Rgb(120, 165, 205),
            light: Rgb(178, 215, 245),
            edge: Rgb(240, 250, 255),
        };
        draw_column_pair(frame, obstacle, width, &palette);
        // frozen glints caught in the ice
        let w = (width as i32).max(2);
        let h = frame.h as i32;
        for k in 0u32..6 {
            let r1 = hash01((obstacle.seed * 4096.0) as u32 + k * 17);
            let r2 = hash01((obstacle.seed * 4096.0) as u32 + k * 57 + 3);
            let x = obstacle.x as i32 + (r1 * w as f32) as i32;
            let y = (r2 * h as f32) as i32;
            if y < obstacle.top as i32 || y > obstacle.bottom as i32 {
                frame.glow(x, y, SNOW, 0.6);
            }
        }
    }

    fn draw_avatar(&self, frame: &mut PixelBuf, avatar: &Avatar, time: f32) {
        let palette = BirdPalette {
            body: Rgb(170, 215, 250),
            highlight: Rgb(225, 245, 255),
            wing: Rgb(110, 160, 215),
            eye: Rgb(255, 255, 255),
            pupil: Rgb(20, 40, 70),
            beak: Rgb(255, 170, 90),
        };
        draw_bird_base(frame, avatar, time, &palette);
    }

    fn audio(&self) -> ProfileOverrides {
        ProfileOverrides {
            ambient: AmbientOverrides {
                voices: vec![
                    VoiceOverrides {
                        waveform: Some(Waveform::Sine),
                        frequency: Some(142.0),
                        detune: Some(-6.0),
                        sweep_rate: Some(0.02),
                        sweep_depth: Some(120.0),
                        vibrato_rate: Some(0.5),
                        vibrato_depth: Some(5.0),
                        filter: Some(FilterSpec::new(FilterKind::Lowpass, 520.0, 11.0)),
                        pan_depth: Some(0.45),
                        ..VoiceOverrides::default()
                    },
                    VoiceOverrides {
                        waveform: Some(Waveform::Triangle),
                        frequency: Some(188.0),
                        detune: Some(4.0),
                        sweep_rate: Some(0.024),
                        sweep_depth: Some(130.0),
                        vibrato_rate: Some(0.6),
                        vibrato_depth: Some(6.0),
                        filter: Some(FilterSpec::new(FilterKind::Bandpass, 620.0, 9.0)),
                        pan_depth: Some(0.4),
                        pan_offset: Some(0.35),
                        ..VoiceOverrides::default()
                    },
                    VoiceOverrides {
                        waveform: Some(Waveform::Sawtooth),
                        frequency: Some(248.0),
                        detune: Some(12.0),
                        sweep_rate: Some(0.03),
                        sweep_depth: Some(150.0),
                        vibrato_rate: Some(0.7),
                        vibrato_depth: Some(7.0),
                        filter: Some(FilterSpec::new(FilterKind::Highpass, 380.0, 7.0)),
                        pan_depth: Some(0.6),
                        ..VoiceOverrides::default()
                    },
                ],
                levels: LevelOverrides {
                    idle: Some(0.28),
                    running: Some(0.82),
                    game_over: Some(0.22),
                },
                transition: Some(1.0),
                ..AmbientOverrides::default()
            },
            flap: FlapOverrides {
                waveform: Some(Waveform::Triangle),
                start_freq: Some(320.0),
                peak_freq: Some(620.0),
                end_freq: Some(210.0),
                filter: Some(FilterSpec::new(FilterKind::Bandpass, 600.0, 7.0)),
                attack: Some(0.02),
                max_gain: Some(0.4),
                decay: Some(0.42),
                ..FlapOverrides::default()
            },
            score: ScoreOverrides {
                high_wave: Some(Waveform::Sine),
                low_wave: Some(Waveform::Triangle),
                high_start: Some(620.0),
                high_mid: Some(840.0),
                high_end: Some(1120.0),
                high_mid_time: Some(0.16),
                high_end_time: Some(0.3),
                low_start: Some(320.0),
                low_end: Some(420.0),
                shimmer_gain: Some(0.2),
                delay_time: Some(0.2),
                feedback_gain: Some(0.22),
                release: Some(0.72),
                ..ScoreOverrides::default()
            },
            game_over: GameOverOverrides {
                waveform: Some(Waveform::Triangle),
                start_freq: Some(520.0),
                end_freq: Some(160.0),
                filter_start: Some(1200.0),
                filter_end: Some(260.0),
                attack: Some(0.04),
                max_gain: Some(0.5),
                release: Some(1.1),
                noise_amount: Some(0.28),
                ..GameOverOverrides::default()
            },
        }
    }
}
