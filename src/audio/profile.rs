//! Audio profile data model.
//!
//! Each theme ships a `ProfileOverrides` naming only what it wants to
//! change; `resolve` merges that onto engine-wide defaults so a missing
//! field never silences a voice. The merged `AudioProfile` is plain data
//! that `synth` consumes.

/// Envelope floor used wherever a gain decays toward silence. Exponential
/// ramps cannot reach zero, so this is the practical "off" level.
pub const GAIN_FLOOR: f32 = 1e-4;

/// Master bus level applied to every sink.
pub const MASTER_LEVEL: f32 = 0.3;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
    Square,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FilterKind {
    Lowpass,
    Bandpass,
    Highpass,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct FilterSpec {
    pub kind: FilterKind,
    pub cutoff: f32,
    pub q: f32,
}

impl FilterSpec {
    pub const fn new(kind: FilterKind, cutoff: f32, q: f32) -> Self {
        Self { kind, cutoff, q }
    }
}

// ── Resolved profile ────────────────────────────────────────────────────────

/// One fully resolved ambient pad voice.
#[derive(Clone, Copy, Debug)]
pub struct VoiceSpec {
    pub waveform: Waveform,
    pub frequency: f32,
    /// Cents, applied as `frequency * 2^(detune/1200)`.
    pub detune: f32,
    /// Cutoff wobble rate in Hz; 0 disables the sweep.
    pub sweep_rate: f32,
    pub sweep_depth: f32,
    /// Pitch wobble rate in Hz; 0 disables vibrato.
    pub vibrato_rate: f32,
    pub vibrato_depth: f32,
    /// Random spread added to the vibrato rate per built voice.
    pub vibrato_variance: f32,
    pub filter: FilterSpec,
    pub pan_depth: f32,
    pub pan_rate: f32,
    /// None picks a random stereo seat when the voice is built.
    pub pan_offset: Option<f32>,
    pub gain: f32,
}

/// Ambient bus target per game mode.
#[derive(Clone, Copy, Debug)]
pub struct AmbientLevels {
    pub idle: f32,
    pub running: f32,
    pub game_over: f32,
}

#[derive(Clone, Debug)]
pub struct AmbientProfile {
    pub voices: Vec<VoiceSpec>,
    pub levels: AmbientLevels,
    /// Smoothing time constant for level moves, seconds.
    pub transition: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct FlapProfile {
    pub waveform: Waveform,
    pub start_freq: f32,
    pub peak_freq: f32,
    pub end_freq: f32,
    pub peak_time: f32,
    pub end_time: f32,
    pub filter: FilterSpec,
    pub attack: f32,
    pub max_gain: f32,
    pub decay: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct ScoreProfile {
    pub high_wave: Waveform,
    pub low_wave: Waveform,
    pub high_start: f32,
    pub high_mid: f32,
    pub high_end: f32,
    pub high_mid_time: f32,
    pub high_end_time: f32,
    pub low_start: f32,
    pub low_end: f32,
    pub low_end_time: f32,
    /// Output trim on the whole chime, echoes included.
    pub shimmer_gain: f32,
    pub delay_time: f32,
    pub feedback_gain: f32,
    pub attack: f32,
    pub max_gain: f32,
    pub release: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct GameOverProfile {
    pub waveform: Waveform,
    pub start_freq: f32,
    pub end_freq: f32,
    pub duration: f32,
    pub filter_kind: FilterKind,
    pub filter_start: f32,
    pub filter_end: f32,
    pub attack: f32,
    pub max_gain: f32,
    pub release: f32,
    /// Noise burst level; 0 skips the burst entirely.
    pub noise_amount: f32,
    pub noise_duration: f32,
    pub noise_decay: f32,
}

#[derive(Clone, Debug)]
pub struct AudioProfile {
    pub ambient: AmbientProfile,
    pub flap: FlapProfile,
    pub score: ScoreProfile,
    pub game_over: GameOverProfile,
}

impl Default for AudioProfile {
    fn default() -> Self {
        ProfileOverrides::default().resolve()
    }
}

// ── Overrides ───────────────────────────────────────────────────────────────

#[derive(Clone, Default, Debug)]
pub struct ProfileOverrides {
    pub ambient: AmbientOverrides,
    pub flap: FlapOverrides,
    pub score: ScoreOverrides,
    pub game_over: GameOverOverrides,
}

#[derive(Clone, Default, Debug)]
pub struct AmbientOverrides {
    /// Empty keeps the default three-voice pad.
    pub voices: Vec<VoiceOverrides>,
    /// Fallback filter for voices that name none.
    pub filter: Option<FilterSpec>,
    pub levels: LevelOverrides,
    pub transition: Option<f32>,
}

#[derive(Clone, Copy, Default, Debug)]
pub struct LevelOverrides {
    pub idle: Option<f32>,
    pub running: Option<f32>,
    pub game_over: Option<f32>,
}

#[derive(Clone, Copy, Default, Debug)]
pub struct VoiceOverrides {
    pub waveform: Option<Waveform>,
    pub frequency: Option<f32>,
    pub detune: Option<f32>,
    pub sweep_rate: Option<f32>,
    pub sweep_depth: Option<f32>,
    pub vibrato_rate: Option<f32>,
    pub vibrato_depth: Option<f32>,
    pub vibrato_variance: Option<f32>,
    pub filter: Option<FilterSpec>,
    pub pan_depth: Option<f32>,
    pub pan_rate: Option<f32>,
    pub pan_offset: Option<f32>,
    pub gain: Option<f32>,
}

#[derive(Clone, Copy, Default, Debug)]
pub struct FlapOverrides {
    pub waveform: Option<Waveform>,
    pub start_freq: Option<f32>,
    pub peak_freq: Option<f32>,
    pub end_freq: Option<f32>,
    pub peak_time: Option<f32>,
    pub end_time: Option<f32>,
    pub filter: Option<FilterSpec>,
    pub attack: Option<f32>,
    pub max_gain: Option<f32>,
    pub decay: Option<f32>,
}

#[derive(Clone, Copy, Default, Debug)]
pub struct ScoreOverrides {
    pub high_wave: Option<Waveform>,
    pub low_wave: Option<Waveform>,
    pub high_start: Option<f32>,
    pub high_mid: Option<f32>,
    pub high_end: Option<f32>,
    pub high_mid_time: Option<f32>,
    pub high_end_time: Option<f32>,
    pub low_start: Option<f32>,
    pub low_end: Option<f32>,
    pub low_end_time: Option<f32>,
    pub shimmer_gain: Option<f32>,
    pub delay_time: Option<f32>,
    pub feedback_gain: Option<f32>,
    pub attack: Option<f32>,
    pub max_gain: Option<f32>,
    pub release: Option<f32>,
}

#[derive(Clone, Copy, Default, Debug)]
pub struct GameOverOverrides {
    pub waveform: Option<Waveform>,
    pub start_freq: Option<f32>,
    pub end_freq: Option<f32>,
    pub duration: Option<f32>,
    pub filter_kind: Option<FilterKind>,
    pub filter_start: Option<f32>,
    pub filter_end: Option<f32>,
    pub attack: Option<f32>,
    pub max_gain: Option<f32>,
    pub release: Option<f32>,
    pub noise_amount: Option<f32>,
    pub noise_duration: Option<f32>,
    pub noise_decay: Option<f32>,
}

// ── Defaults and merging ────────────────────────────────────────────────────

const DEFAULT_AMBIENT_FILTER: FilterSpec = FilterSpec::new(FilterKind::Lowpass, 560.0, 12.0);

fn default_voices() -> Vec<VoiceOverrides> {
    vec![
        VoiceOverrides {
            waveform: Some(Waveform::Sawtooth),
            frequency: Some(96.0),
            detune: Some(-14.0),
            sweep_rate: Some(0.05),
            sweep_depth: Some(180.0),
            vibrato_rate: Some(0.9),
            vibrato_depth: Some(7.2),
            filter: Some(FilterSpec::new(FilterKind::Lowpass, 560.0, 12.0)),
            pan_depth: Some(0.75),
            ..VoiceOverrides::default()
        },
        VoiceOverrides {
            waveform: Some(Waveform::Sawtooth),
            frequency: Some(162.0),
            detune: Some(9.0),
            sweep_rate: Some(0.035),
            sweep_depth: Some(150.0),
            vibrato_rate: Some(1.0),
            vibrato_depth: Some(5.5),
            filter: Some(FilterSpec::new(FilterKind::Lowpass, 580.0, 11.0)),
            pan_depth: Some(0.7),
            ..VoiceOverrides::default()
        },
        VoiceOverrides {
            waveform: Some(Waveform::Sawtooth),
            frequency: Some(224.0),
            detune: Some(16.0),
            sweep_rate: Some(0.045),
            sweep_depth: Some(170.0),
            vibrato_rate: Some(0.95),
            vibrato_depth: Some(8.4),
            filter: Some(FilterSpec::new(FilterKind::Lowpass, 600.0, 12.0)),
            pan_depth: Some(0.7),
            ..VoiceOverrides::default()
        },
    ]
}

impl VoiceOverrides {
    fn resolve(&self, fallback_filter: FilterSpec, voice_count: usize) -> VoiceSpec {
        VoiceSpec {
            waveform: self.waveform.unwrap_or(Waveform::Sawtooth),
            frequency: self.frequency.unwrap_or(220.0),
            detune: self.detune.unwrap_or(0.0),
            sweep_rate: self.sweep_rate.unwrap_or(0.0),
            sweep_depth: self.sweep_depth.unwrap_or(160.0),
            vibrato_rate: self.vibrato_rate.unwrap_or(0.0),
            vibrato_depth: self.vibrato_depth.unwrap_or(6.0),
            vibrato_variance: self.vibrato_variance.unwrap_or(0.35),
            filter: self.filter.unwrap_or(fallback_filter),
            pan_depth: self.pan_depth.unwrap_or(0.75),
            pan_rate: self.pan_rate.unwrap_or(0.03),
            pan_offset: self.pan_offset,
            gain: self.gain.unwrap_or(0.24 / voice_count.max(1) as f32),
        }
    }
}

impl ProfileOverrides {
    /// Merge these overrides onto the global defaults. Every field of the
    /// result is concrete; the synth layer never sees an `Option` except
    /// the deliberately-random pan seat.
    pub fn resolve(&self) -> AudioProfile {
        let a = &self.ambient;
        let fallback_filter = a.filter.unwrap_or(DEFAULT_AMBIENT_FILTER);
        let voice_overrides = if a.voices.is_empty() {
            default_voices()
        } else {
            a.voices.clone()
        };
        let count = voice_overrides.len();
        let voices = voice_overrides
            .iter()
            .map(|v| v.resolve(fallback_filter, count))
            .collect();

        let f = &self.flap;
        let s = &self.score;
        let g = &self.game_over;
        AudioProfile {
            ambient: AmbientProfile {
                voices,
                levels: AmbientLevels {
                    idle: a.levels.idle.unwrap_or(0.35),
                    running: a.levels.running.unwrap_or(0.85),
                    game_over: a.levels.game_over.unwrap_or(0.2),
                },
                transition: a.transition.unwrap_or(0.9),
            },
            flap: FlapProfile {
                waveform: f.waveform.unwrap_or(Waveform::Triangle),
                start_freq: f.start_freq.unwrap_or(360.0),
                peak_freq: f.peak_freq.unwrap_or(880.0),
                end_freq: f.end_freq.unwrap_or(220.0),
                peak_time: f.peak_time.unwrap_or(0.08),
                end_time: f.end_time.unwrap_or(0.34),
                filter: f
                    .filter
                    .unwrap_or(FilterSpec::new(FilterKind::Bandpass, 720.0, 8.0)),
                attack: f.attack.unwrap_or(0.02),
                max_gain: f.max_gain.unwrap_or(0.45),
                decay: f.decay.unwrap_or(0.4),
            },
            score: ScoreProfile {
                high_wave: s.high_wave.unwrap_or(Waveform::Sine),
                low_wave: s.low_wave.unwrap_or(Waveform::Triangle),
                high_start: s.high_start.unwrap_or(640.0),
                high_mid: s.high_mid.unwrap_or(960.0),
                high_end: s.high_end.unwrap_or(1280.0),
                high_mid_time: s.high_mid_time.unwrap_or(0.12),
                high_end_time: s.high_end_time.unwrap_or(0.22),
                low_start: s.low_start.unwrap_or(280.0),
                low_end: s.low_end.unwrap_or(420.0),
                low_end_time: s.low_end_time.unwrap_or(0.18),
                shimmer_gain: s.shimmer_gain.unwrap_or(0.26),
                delay_time: s.delay_time.unwrap_or(0.24),
                feedback_gain: s.feedback_gain.unwrap_or(0.3),
                attack: s.attack.unwrap_or(0.02),
                max_gain: s.max_gain.unwrap_or(0.5),
                release: s.release.unwrap_or(0.6),
            },
            game_over: GameOverProfile {
                waveform: g.waveform.unwrap_or(Waveform::Sawtooth),
                start_freq: g.start_freq.unwrap_or(520.0),
                end_freq: g.end_freq.unwrap_or(140.0),
                duration: g.duration.unwrap_or(1.2),
                filter_kind: g.filter_kind.unwrap_or(FilterKind::Lowpass),
                filter_start: g.filter_start.unwrap_or(1400.0),
                filter_end: g.filter_end.unwrap_or(220.0),
                attack: g.attack.unwrap_or(0.04),
                max_gain: g.max_gain.unwrap_or(0.55),
                release: g.release.unwrap_or(1.1),
                noise_amount: g.noise_amount.unwrap_or(0.4),
                noise_duration: g.noise_duration.unwrap_or(0.6),
                noise_decay: g.noise_decay.unwrap_or(0.5),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_three_voice_pad() {
        let profile = AudioProfile::default();
        assert_eq!(profile.ambient.voices.len(), 3);
        assert_eq!(profile.ambient.voices[0].frequency, 96.0);
        assert_eq!(profile.ambient.voices[1].frequency, 162.0);
        assert_eq!(profile.ambient.voices[2].frequency, 224.0);
        assert_eq!(profile.ambient.levels.running, 0.85);
        assert_eq!(profile.flap.peak_freq, 880.0);
        assert_eq!(profile.game_over.noise_amount, 0.4);
    }

    #[test]
    fn partial_override_keeps_unnamed_defaults() {
        let overrides = ProfileOverrides {
            flap: FlapOverrides {
                start_freq: Some(500.0),
                ..FlapOverrides::default()
            },
            ..ProfileOverrides::default()
        };
        let profile = overrides.resolve();
        assert_eq!(profile.flap.start_freq, 500.0);
        // everything not named stays at the default
        assert_eq!(profile.flap.peak_freq, 880.0);
        assert_eq!(profile.flap.decay, 0.4);
        assert_eq!(profile.score.release, 0.6);
    }

    #[test]
    fn sparse_voice_fills_in_generic_fields() {
        let overrides = ProfileOverrides {
            ambient: AmbientOverrides {
                voices: vec![VoiceOverrides {
                    frequency: Some(440.0),
                    ..VoiceOverrides::default()
                }],
                ..AmbientOverrides::default()
            },
            ..ProfileOverrides::default()
        };
        let profile = overrides.resolve();
        let voice = &profile.ambient.voices[0];
        assert_eq!(voice.frequency, 440.0);
        assert_eq!(voice.waveform, Waveform::Sawtooth);
        assert_eq!(voice.vibrato_rate, 0.0);
        assert_eq!(voice.filter, DEFAULT_AMBIENT_FILTER);
        // a lone voice gets the whole default pad gain
        assert_eq!(voice.gain, 0.24);
        assert_eq!(voice.pan_offset, None);
    }

    #[test]
    fn ambient_filter_override_becomes_voice_fallback() {
        let custom = FilterSpec::new(FilterKind::Highpass, 300.0, 5.0);
        let overrides = ProfileOverrides {
            ambient: AmbientOverrides {
                filter: Some(custom),
                voices: vec![VoiceOverrides::default()],
                ..AmbientOverrides::default()
            },
            ..ProfileOverrides::default()
        };
        let profile = overrides.resolve();
        assert_eq!(profile.ambient.voices[0].filter, custom);
    }

    #[test]
    fn level_overrides_merge_per_field() {
        let overrides = ProfileOverrides {
            ambient: AmbientOverrides {
                levels: LevelOverrides {
                    running: Some(1.0),
                    ..LevelOverrides::default()
                },
                ..AmbientOverrides::default()
            },
            ..ProfileOverrides::default()
        };
        let levels = overrides.resolve().ambient.levels;
        assert_eq!(levels.running, 1.0);
        assert_eq!(levels.idle, 0.35);
        assert_eq!(levels.game_over, 0.2);
    }

    #[test]
    fn voice_gain_splits_across_pad_size() {
        let overrides = ProfileOverrides {
            ambient: AmbientOverrides {
                voices: vec![VoiceOverrides::default(); 4],
                ..AmbientOverrides::default()
            },
            ..ProfileOverrides::default()
        };
        let profile = overrides.resolve();
        for voice in &profile.ambient.voices {
            assert_eq!(voice.gain, 0.06);
        }
    }
}
