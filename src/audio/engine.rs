//! Audio device ownership and playback entry points.
//!
//! The engine is built cold: no device is opened until the first real
//! user gesture calls `arm`. Every public entry degrades to a no-op when
//! the device is missing or was refused, so the game never branches on
//! audio availability.

use fundsp::prelude32::AudioUnit;
use rand::Rng;
use rodio::{OutputStream, OutputStreamHandle, Sink};
use std::sync::Arc;

use super::profile::{AudioProfile, MASTER_LEVEL, ProfileOverrides};
use super::source::{AmbientBed, AmbientControl, OneShot};
use super::synth;

/// What the ambient bed should feel like right now. Paused play maps to
/// `Idle` at the call site.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mood {
    Idle,
    Running,
    GameOver,
}

struct Output {
    // kept alive for the duration of the engine; dropping it kills the stream
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

struct AmbientHandle {
    sink: Sink,
    control: Arc<AmbientControl>,
}

pub struct AudioEngine {
    output: Option<Output>,
    /// Device probe failed; stop trying.
    unavailable: bool,
    profile: AudioProfile,
    muted: bool,
    mood: Mood,
    ambient: Option<AmbientHandle>,
}

impl AudioEngine {
    /// Cold engine; call `arm` on the first user gesture.
    pub fn new() -> Self {
        Self {
            output: None,
            unavailable: false,
            profile: AudioProfile::default(),
            muted: false,
            mood: Mood::Idle,
            ambient: None,
        }
    }

    /// Engine that never opens a device. Headless tests run on this.
    pub fn disabled() -> Self {
        Self {
            unavailable: true,
            ..Self::new()
        }
    }

    /// True once a device is open and sound can actually come out.
    pub fn is_live(&self) -> bool {
        self.output.is_some()
    }

    /// True when the device probe failed and audio is permanently off.
    pub fn is_unavailable(&self) -> bool {
        self.unavailable
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    pub fn profile(&self) -> &AudioProfile {
        &self.profile
    }

    /// Open the output device if this is the first gesture, then bring
    /// the ambient bed in line with the given theme and mood. Idempotent.
    pub fn arm<R: Rng>(&mut self, overrides: &ProfileOverrides, mood: Mood, rng: &mut R) {
        if self.output.is_none() && !self.unavailable {
            match OutputStream::try_default() {
                Ok((stream, handle)) => {
                    self.output = Some(Output {
                        _stream: stream,
                        handle,
                    });
                }
                Err(_) => {
                    self.unavailable = true;
                }
            }
        }
        self.set_theme(overrides, true, rng);
        self.mood = mood;
        self.apply_level(true);
    }

    /// Swap the soundscape to a new theme. The old bed fades itself out
    /// in the background; the new one starts silent and moves to the
    /// current mood's level.
    pub fn set_theme<R: Rng>(&mut self, overrides: &ProfileOverrides, immediate: bool, rng: &mut R) {
        self.profile = overrides.resolve();
        let Some(output) = &self.output else {
            return;
        };

        if let Some(old) = self.ambient.take() {
            old.control.retire();
            old.sink.detach();
        }

        let voices = self
            .profile
            .ambient
            .voices
            .iter()
            .map(|spec| {
                let vibrato = if spec.vibrato_rate > 0.0 {
                    spec.vibrato_rate + (rng.r#gen::<f32>() - 0.5) * spec.vibrato_variance
                } else {
                    0.0
                };
                let pan_offset = spec
                    .pan_offset
                    .unwrap_or_else(|| -0.6 + rng.r#gen::<f32>() * 1.2);
                synth::ambient_voice(spec, vibrato, pan_offset)
            })
            .collect();

        let control = AmbientControl::new(self.profile.ambient.transition);
        let Ok(sink) = Sink::try_new(&output.handle) else {
            return;
        };
        sink.set_volume(if self.muted { 0.0 } else { MASTER_LEVEL });
        sink.append(AmbientBed::new(voices, control.clone()));
        self.ambient = Some(AmbientHandle { sink, control });
        self.apply_level(immediate);
    }

    pub fn set_mood(&mut self, mood: Mood, immediate: bool) {
        self.mood = mood;
        self.apply_level(immediate);
    }

    fn apply_level(&self, immediate: bool) {
        let Some(ambient) = &self.ambient else {
            return;
        };
        let levels = &self.profile.ambient.levels;
        let target = match self.mood {
            Mood::Idle => levels.idle,
            Mood::Running => levels.running,
            Mood::GameOver => levels.game_over,
        };
        ambient.control.set_transition(self.profile.ambient.transition);
        ambient.control.set_level(target, immediate);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if let Some(ambient) = &self.ambient {
            ambient
                .sink
                .set_volume(if muted { 0.0 } else { MASTER_LEVEL });
        }
    }

    pub fn play_flap(&self) {
        if self.muted {
            return;
        }
        let spec = self.profile.flap;
        self.fire(
            vec![synth::flap_voice(&spec)],
            synth::flap_post(&spec),
            synth::flap_duration(&spec),
        );
    }

    pub fn play_score(&self) {
        if self.muted {
            return;
        }
        let spec = self.profile.score;
        self.fire(
            synth::score_voices(&spec),
            synth::score_post(&spec),
            synth::score_duration(&spec),
        );
    }

    pub fn play_game_over(&self) {
        if self.muted {
            return;
        }
        let spec = self.profile.game_over;
        self.fire(
            vec![synth::game_over_voice(&spec)],
            synth::game_over_post(&spec),
            spec.duration.max(0.1),
        );
        if spec.noise_amount > 0.0 {
            self.fire(
                vec![synth::noise_burst_voice(&spec)],
                synth::center_post(),
                spec.noise_duration.max(0.05),
            );
        }
    }

    /// Fire-and-forget a one-shot on its own sink.
    fn fire(&self, voices: Vec<Box<dyn AudioUnit>>, post: Box<dyn AudioUnit>, duration: f32) {
        let Some(output) = &self.output else {
            return;
        };
        let Ok(sink) = Sink::try_new(&output.handle) else {
            return;
        };
        sink.set_volume(MASTER_LEVEL);
        sink.append(OneShot::new(voices, post, duration));
        sink.detach();
    }
}

impl Default for AudioEngine {
    fn default() -> Self {
        Self::new()
    }
}
