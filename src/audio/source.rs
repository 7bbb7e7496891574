//! rodio sources that pull their samples out of fundsp units.
//!
//! `AmbientBed` is long-lived: it sums the pad voices, chases a shared
//! level target with one-pole smoothing, and drains itself after a
//! teardown fade so swapping themes never pops. `OneShot` runs a fixed
//! number of frames through a mono voice bank plus a stereo post stage.

use fundsp::prelude32::*;
use rodio::Source;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub const SAMPLE_RATE: u32 = 44_100;

/// Seconds to silence when a bed is being replaced.
const TEARDOWN_FADE: f32 = 0.25;

// ── Ambient bed ─────────────────────────────────────────────────────────────

/// Control surface shared between the engine and a playing `AmbientBed`.
pub struct AmbientControl {
    /// Level the bed chases.
    level: Shared,
    /// Smoothing time constant in seconds.
    transition: Shared,
    /// One-shot request to jump straight to the target.
    snap: AtomicBool,
    /// Set once; the bed fades out and then finishes.
    closing: AtomicBool,
}

impl AmbientControl {
    pub fn new(transition: f32) -> Arc<Self> {
        Arc::new(Self {
            level: shared(0.0),
            transition: shared(transition.max(0.01)),
            snap: AtomicBool::new(false),
            closing: AtomicBool::new(false),
        })
    }

    pub fn set_level(&self, level: f32, immediate: bool) {
        self.level.set_value(level);
        if immediate {
            self.snap.store(true, Ordering::Relaxed);
        }
    }

    pub fn set_transition(&self, seconds: f32) {
        self.transition.set_value(seconds.max(0.01));
    }

    /// Begin the teardown fade; the bed ends on its own afterwards.
    pub fn retire(&self) {
        self.closing.store(true, Ordering::Relaxed);
    }

    fn take_snap(&self) -> bool {
        self.snap.swap(false, Ordering::Relaxed)
    }

    fn closing(&self) -> bool {
        self.closing.load(Ordering::Relaxed)
    }
}

pub struct AmbientBed {
    voices: Vec<Box<dyn AudioUnit>>,
    control: Arc<AmbientControl>,
    /// Smoothed bus gain.
    gain: f32,
    /// Cached smoothing coefficient and the tau it was derived from.
    coeff: f32,
    coeff_tau: f32,
    /// Teardown fade multiplier, 1 while live.
    fade: f32,
    pending_right: f32,
    emit_right: bool,
}

impl AmbientBed {
    pub fn new(mut voices: Vec<Box<dyn AudioUnit>>, control: Arc<AmbientControl>) -> Self {
        for voice in &mut voices {
            voice.set_sample_rate(SAMPLE_RATE as f64);
            voice.allocate();
        }
        Self {
            voices,
            control,
            gain: 0.0,
            coeff: 0.0,
            coeff_tau: 0.0,
            fade: 1.0,
            pending_right: 0.0,
            emit_right: false,
        }
    }

    fn coeff_for(&mut self, tau: f32) -> f32 {
        if tau != self.coeff_tau {
            self.coeff_tau = tau;
            self.coeff = 1.0 - (-1.0 / (tau * SAMPLE_RATE as f32)).exp();
        }
        self.coeff
    }
}

impl Iterator for AmbientBed {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.emit_right {
            self.emit_right = false;
            return Some(self.pending_right);
        }

        if self.control.closing() {
            if self.fade <= 0.0 {
                return None;
            }
            self.fade -= 1.0 / (TEARDOWN_FADE * SAMPLE_RATE as f32);
        }

        let target = self.control.level.value();
        if self.control.take_snap() {
            self.gain = target;
        } else {
            let tau = self.control.transition.value();
            let coeff = self.coeff_for(tau);
            self.gain += (target - self.gain) * coeff;
        }

        let mut left = 0.0;
        let mut right = 0.0;
        for voice in &mut self.voices {
            let (l, r) = voice.get_stereo();
            left += l;
            right += r;
        }
        let g = self.gain * self.fade.max(0.0);
        self.pending_right = right * g;
        self.emit_right = true;
        Some(left * g)
    }
}

impl Source for AmbientBed {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        2
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

// ── One-shot effects ────────────────────────────────────────────────────────

/// Fixed-length effect: mono voices summed, shaped by a stereo post
/// stage. Ends exactly after `duration` seconds of frames.
pub struct OneShot {
    voices: Vec<Box<dyn AudioUnit>>,
    post: Box<dyn AudioUnit>,
    frames_left: u32,
    pending_right: f32,
    emit_right: bool,
}

impl OneShot {
    pub fn new(
        mut voices: Vec<Box<dyn AudioUnit>>,
        mut post: Box<dyn AudioUnit>,
        duration: f32,
    ) -> Self {
        for voice in &mut voices {
            voice.set_sample_rate(SAMPLE_RATE as f64);
            voice.allocate();
        }
        post.set_sample_rate(SAMPLE_RATE as f64);
        post.allocate();
        Self {
            voices,
            post,
            frames_left: (duration.max(0.0) * SAMPLE_RATE as f32) as u32,
            pending_right: 0.0,
            emit_right: false,
        }
    }
}

impl Iterator for OneShot {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.emit_right {
            self.emit_right = false;
            return Some(self.pending_right);
        }
        if self.frames_left == 0 {
            return None;
        }
        self.frames_left -= 1;

        let mut sum = 0.0;
        for voice in &mut self.voices {
            sum += voice.get_mono();
        }
        let mut out = [0.0f32; 2];
        self.post.tick(&[sum], &mut out);
        self.pending_right = out[1];
        self.emit_right = true;
        Some(out[0])
    }
}

impl Source for OneShot {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        2
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f32(
            self.frames_left as f32 / SAMPLE_RATE as f32,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::profile::AudioProfile;
    use crate::audio::synth;

    fn default_bed(control: Arc<AmbientControl>) -> AmbientBed {
        let profile = AudioProfile::default();
        let voices = profile
            .ambient
            .voices
            .iter()
            .map(|v| synth::ambient_voice(v, v.vibrato_rate, 0.0))
            .collect();
        AmbientBed::new(voices, control)
    }

    #[test]
    fn bed_interleaves_stereo_frames() {
        let control = AmbientControl::new(0.9);
        control.set_level(0.8, true);
        let mut bed = default_bed(control);
        let samples: Vec<f32> = (&mut bed).take(64).collect();
        assert_eq!(samples.len(), 64);
        assert_eq!(bed.channels(), 2);
        assert_eq!(bed.sample_rate(), SAMPLE_RATE);
    }

    #[test]
    fn snap_applies_level_without_smoothing() {
        let control = AmbientControl::new(0.9);
        control.set_level(0.85, true);
        let mut bed = default_bed(control);
        bed.next();
        assert!((bed.gain - 0.85).abs() < 1e-6);
    }

    #[test]
    fn smoothed_level_chases_target_monotonically() {
        let control = AmbientControl::new(0.05);
        control.set_level(1.0, false);
        let mut bed = default_bed(control.clone());
        let mut last = 0.0;
        for _ in 0..4410 {
            bed.next();
            bed.next();
            assert!(bed.gain >= last);
            last = bed.gain;
        }
        // two time constants in: most of the way there
        assert!(bed.gain > 0.8, "gain was {}", bed.gain);
        // now move the target down; the gain must follow without jumping
        control.set_level(0.2, false);
        bed.next();
        assert!(bed.gain > 0.7);
        for _ in 0..44_100 {
            bed.next();
            bed.next();
        }
        assert!((bed.gain - 0.2).abs() < 0.05);
    }

    #[test]
    fn retired_bed_fades_then_finishes() {
        let control = AmbientControl::new(0.9);
        control.set_level(0.8, true);
        let mut bed = default_bed(control.clone());
        for _ in 0..128 {
            assert!(bed.next().is_some());
        }
        control.retire();
        // fade lasts 0.25s: the source must end within ~0.3s of frames
        let mut remaining = 0usize;
        while bed.next().is_some() {
            remaining += 1;
            assert!(remaining < (0.3 * 2.0 * SAMPLE_RATE as f32) as usize);
        }
    }

    #[test]
    fn one_shot_ends_after_duration() {
        let profile = AudioProfile::default();
        let shot = OneShot::new(
            vec![synth::flap_voice(&profile.flap)],
            synth::flap_post(&profile.flap),
            0.1,
        );
        let n = shot.count();
        assert_eq!(n, (0.1 * SAMPLE_RATE as f32) as usize * 2);
    }

    #[test]
    fn one_shot_flap_is_audible_and_bounded() {
        let profile = AudioProfile::default();
        let shot = OneShot::new(
            vec![synth::flap_voice(&profile.flap)],
            synth::flap_post(&profile.flap),
            synth::flap_duration(&profile.flap),
        );
        let mut peak = 0.0f32;
        for s in shot {
            assert!(s.is_finite());
            peak = peak.max(s.abs());
        }
        assert!(peak > 0.01, "flap should be audible, peak {peak}");
        assert!(peak < 2.0, "flap should stay bounded, peak {peak}");
    }

    #[test]
    fn score_shot_outlives_release_for_echoes() {
        let profile = AudioProfile::default();
        let duration = synth::score_duration(&profile.score);
        assert!(duration > profile.score.release + profile.score.delay_time * 2.0);
        let shot = OneShot::new(
            synth::score_voices(&profile.score),
            synth::score_post(&profile.score),
            duration,
        );
        assert_eq!(shot.channels(), 2);
        let frames = shot.count() / 2;
        assert_eq!(frames, (duration * SAMPLE_RATE as f32) as usize);
    }
}
