//! fundsp graph construction.
//!
//! Everything here turns resolved profile data into ready-to-run units:
//! ambient pad voices (0-in, stereo out) and one-shot effect stages. The
//! envelope closures mirror ramp-style parameter automation: linear
//! attack, exponential fall toward `GAIN_FLOOR`.

use core::f32::consts::TAU;
use fundsp::prelude32::*;

use super::profile::{
    FilterKind, FlapProfile, GAIN_FLOOR, GameOverProfile, ScoreProfile, VoiceSpec, Waveform,
};

/// Attack-then-decay gain envelope: linear rise to `peak` over `attack`
/// seconds, then an exponential fall that lands on the floor at `end`
/// seconds from note start.
fn rise_fall_env(attack: f32, peak: f32, end: f32) -> impl Fn(f32) -> f32 + Clone + Send + Sync {
    let attack = attack.max(0.001);
    let end = end.max(attack + 0.001);
    move |t: f32| {
        if t < attack {
            lerp(GAIN_FLOOR, peak.max(GAIN_FLOOR), t / attack)
        } else {
            xerp(
                peak.max(GAIN_FLOOR),
                GAIN_FLOOR,
                ((t - attack) / (end - attack)).min(1.0),
            )
        }
    }
}

/// Oscillator selected at runtime, driven by a frequency envelope.
fn osc_with<F>(waveform: Waveform, freq: F) -> Box<dyn AudioUnit>
where
    F: Fn(f32) -> f32 + Clone + Send + Sync + 'static,
{
    match waveform {
        Waveform::Sine => Box::new(lfo(freq) >> sine()),
        Waveform::Triangle => Box::new(lfo(freq) >> triangle()),
        Waveform::Sawtooth => Box::new(lfo(freq) >> saw()),
        Waveform::Square => Box::new(lfo(freq) >> square()),
    }
}

// ── Ambient pad ─────────────────────────────────────────────────────────────

/// Build one pad voice: detuned oscillator through a swept resonant
/// filter, autopanned across the stereo field.
///
/// `vibrato_rate` and `pan_offset` are the per-instance randomized values;
/// the engine rolls them so the pad sounds slightly different every time a
/// theme arrives.
pub fn ambient_voice(spec: &VoiceSpec, vibrato_rate: f32, pan_offset: f32) -> Box<dyn AudioUnit> {
    let tuned = spec.frequency * (2.0f32).powf(spec.detune / 1200.0);
    let vib_depth = if vibrato_rate > 0.0 { spec.vibrato_depth } else { 0.0 };
    let freq = lfo(move |t| tuned + vib_depth * (TAU * vibrato_rate * t).sin());

    let base_cut = spec.filter.cutoff;
    let sweep_rate = spec.sweep_rate;
    let sweep_depth = if sweep_rate > 0.0 { spec.sweep_depth } else { 0.0 };
    let cut = lfo(move |t| (base_cut + sweep_depth * (TAU * sweep_rate * t).sin()).max(30.0));

    let pan_rate = spec.pan_rate;
    let pan_depth = if pan_rate > 0.0 { spec.pan_depth } else { 0.0 };
    let pos = lfo(move |t| {
        (pan_offset + pan_depth * (TAU * pan_rate * t).sin()).clamp(-1.0, 1.0)
    });

    let q_dc = dc(spec.filter.q);
    let gain = spec.gain;
    match (spec.waveform, spec.filter.kind) {
        (Waveform::Sine, FilterKind::Lowpass) => {
            Box::new(((freq >> sine() | cut | q_dc) >> lowpass() * gain | pos) >> panner())
        }
        (Waveform::Sine, FilterKind::Bandpass) => {
            Box::new(((freq >> sine() | cut | q_dc) >> bandpass() * gain | pos) >> panner())
        }
        (Waveform::Sine, FilterKind::Highpass) => {
            Box::new(((freq >> sine() | cut | q_dc) >> highpass() * gain | pos) >> panner())
        }
        (Waveform::Triangle, FilterKind::Lowpass) => {
            Box::new(((freq >> triangle() | cut | q_dc) >> lowpass() * gain | pos) >> panner())
        }
        (Waveform::Triangle, FilterKind::Bandpass) => {
            Box::new(((freq >> triangle() | cut | q_dc) >> bandpass() * gain | pos) >> panner())
        }
        (Waveform::Triangle, FilterKind::Highpass) => {
            Box::new(((freq >> triangle() | cut | q_dc) >> highpass() * gain | pos) >> panner())
        }
        (Waveform::Sawtooth, FilterKind::Lowpass) => {
            Box::new(((freq >> saw() | cut | q_dc) >> lowpass() * gain | pos) >> panner())
        }
        (Waveform::Sawtooth, FilterKind::Bandpass) => {
            Box::new(((freq >> saw() | cut | q_dc) >> bandpass() * gain | pos) >> panner())
        }
        (Waveform::Sawtooth, FilterKind::Highpass) => {
            Box::new(((freq >> saw() | cut | q_dc) >> highpass() * gain | pos) >> panner())
        }
        (Waveform::Square, FilterKind::Lowpass) => {
            Box::new(((freq >> square() | cut | q_dc) >> lowpass() * gain | pos) >> panner())
        }
        (Waveform::Square, FilterKind::Bandpass) => {
            Box::new(((freq >> square() | cut | q_dc) >> bandpass() * gain | pos) >> panner())
        }
        (Waveform::Square, FilterKind::Highpass) => {
            Box::new(((freq >> square() | cut | q_dc) >> highpass() * gain | pos) >> panner())
        }
    }
}

// ── Flap chirp ──────────────────────────────────────────────────────────────

/// Rising-then-falling chirp; frequency moves on exponential ramps.
pub fn flap_voice(spec: &FlapProfile) -> Box<dyn AudioUnit> {
    let (f0, f1, f2) = (spec.start_freq, spec.peak_freq, spec.end_freq);
    let t1 = spec.peak_time.max(0.001);
    let t2 = spec.end_time.max(t1 + 0.001);
    osc_with(spec.waveform, move |t| {
        if t < t1 {
            xerp(f0, f1, t / t1)
        } else {
            xerp(f1, f2, ((t - t1) / (t2 - t1)).min(1.0))
        }
    })
}

/// Fixed bandpass-style color plus the gain envelope, panned center.
pub fn flap_post(spec: &FlapProfile) -> Box<dyn AudioUnit> {
    let env = lfo(rise_fall_env(spec.attack, spec.max_gain, spec.decay));
    let (fc, fq) = (spec.filter.cutoff, spec.filter.q);
    match spec.filter.kind {
        FilterKind::Lowpass => Box::new(lowpass_hz(fc, fq) * env >> pan(0.0)),
        FilterKind::Bandpass => Box::new(bandpass_hz(fc, fq) * env >> pan(0.0)),
        FilterKind::Highpass => Box::new(highpass_hz(fc, fq) * env >> pan(0.0)),
    }
}

pub fn flap_duration(spec: &FlapProfile) -> f32 {
    spec.decay.max(0.5)
}

// ── Score chime ─────────────────────────────────────────────────────────────

/// Two-oscillator chime: a high voice gliding up in two linear segments
/// and a low voice gliding beneath it.
pub fn score_voices(spec: &ScoreProfile) -> Vec<Box<dyn AudioUnit>> {
    let (h0, h1, h2) = (spec.high_start, spec.high_mid, spec.high_end);
    let mt = spec.high_mid_time.max(0.001);
    let et = spec.high_end_time.max(mt + 0.001);
    let high = osc_with(spec.high_wave, move |t| {
        if t < mt {
            lerp(h0, h1, t / mt)
        } else {
            lerp(h1, h2, ((t - mt) / (et - mt)).min(1.0))
        }
    });

    let (l0, l1) = (spec.low_start, spec.low_end);
    let lt = spec.low_end_time.max(0.001);
    let low = osc_with(spec.low_wave, move |t| lerp(l0, l1, (t / lt).min(1.0)));

    vec![high, low]
}

/// Shared gain envelope, a feedback echo line, and the shimmer trim.
pub fn score_post(spec: &ScoreProfile) -> Box<dyn AudioUnit> {
    let env = lfo(rise_fall_env(spec.attack, spec.max_gain, spec.release));
    let d = spec.delay_time.max(0.001);
    let fb = spec.feedback_gain.clamp(0.0, 0.98);
    let shimmer = spec.shimmer_gain;
    // first echo arrives at full level, later ones decay by `fb`
    let echo = (pass() & feedback(delay(d) * fb)) >> delay(d);
    Box::new(pass() * env >> (pass() & echo) * shimmer >> pan(0.0))
}

/// Long enough for the envelope plus three echo repeats.
pub fn score_duration(spec: &ScoreProfile) -> f32 {
    spec.release.max(0.5) + spec.delay_time.max(0.001) * 3.0
}

// ── Game-over dive ──────────────────────────────────────────────────────────

/// Falling drone: frequency dives exponentially over the whole duration.
pub fn game_over_voice(spec: &GameOverProfile) -> Box<dyn AudioUnit> {
    let (f0, f1) = (spec.start_freq, spec.end_freq);
    let dur = spec.duration.max(0.001);
    osc_with(spec.waveform, move |t| xerp(f0, f1, (t / dur).min(1.0)))
}

/// Filter cutoff dives alongside the pitch; gain rises then bleeds out.
pub fn game_over_post(spec: &GameOverProfile) -> Box<dyn AudioUnit> {
    let (c0, c1) = (spec.filter_start, spec.filter_end);
    let dur = spec.duration.max(0.001);
    let cut = lfo(move |t| xerp(c0, c1, (t / dur).min(1.0)));
    let env = lfo(rise_fall_env(spec.attack, spec.max_gain, spec.release));
    match spec.filter_kind {
        FilterKind::Lowpass => Box::new((pass() | cut | dc(1.0)) >> lowpass() * env >> pan(0.0)),
        FilterKind::Bandpass => Box::new((pass() | cut | dc(1.0)) >> bandpass() * env >> pan(0.0)),
        FilterKind::Highpass => Box::new((pass() | cut | dc(1.0)) >> highpass() * env >> pan(0.0)),
    }
}

/// White-noise impact layered under the dive. The linear fade over the
/// burst length multiplies the usual attack/decay envelope.
pub fn noise_burst_voice(spec: &GameOverProfile) -> Box<dyn AudioUnit> {
    let nd = spec.noise_duration.max(0.001);
    let env = rise_fall_env(0.02, spec.noise_amount, spec.noise_decay.max(0.05));
    let shaped = move |t: f32| (1.0 - t / nd).max(0.0) * env(t);
    Box::new(noise() * lfo(shaped))
}

/// Center-panned pass-through for voices that need no further shaping.
pub fn center_post() -> Box<dyn AudioUnit> {
    Box::new(pan(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::profile::AudioProfile;

    #[test]
    fn envelope_rises_then_bleeds_to_floor() {
        let env = rise_fall_env(0.02, 0.45, 0.4);
        assert!(env(0.0) <= GAIN_FLOOR + 1e-6);
        assert!((env(0.02) - 0.45).abs() < 1e-3);
        assert!(env(0.2) < 0.45);
        assert!(env(0.2) > GAIN_FLOOR);
        assert!(env(0.4) <= GAIN_FLOOR * 1.01);
        // holds at the floor past the end
        assert!(env(2.0) <= GAIN_FLOOR * 1.01);
    }

    #[test]
    fn envelope_is_monotone_after_attack() {
        let env = rise_fall_env(0.02, 0.5, 0.6);
        let mut last = env(0.02);
        let mut t = 0.025;
        while t < 0.7 {
            let v = env(t);
            assert!(v <= last + 1e-6, "decay must not rise at t={t}");
            last = v;
            t += 0.005;
        }
    }

    #[test]
    fn ambient_voice_is_stereo_and_audible() {
        let profile = AudioProfile::default();
        let mut unit = ambient_voice(&profile.ambient.voices[0], 0.9, 0.2);
        assert_eq!(unit.inputs(), 0);
        assert_eq!(unit.outputs(), 2);
        unit.set_sample_rate(44_100.0);
        let mut peak = 0.0f32;
        for _ in 0..8820 {
            let (l, r) = unit.get_stereo();
            assert!(l.is_finite() && r.is_finite());
            peak = peak.max(l.abs()).max(r.abs());
        }
        assert!(peak > 1e-4, "pad voice should be audible, peak {peak}");
        assert!(peak < 2.0, "pad voice should not blow up, peak {peak}");
    }

    #[test]
    fn ambient_voice_covers_every_waveform_and_filter() {
        let profile = AudioProfile::default();
        let base = profile.ambient.voices[0];
        for waveform in [
            Waveform::Sine,
            Waveform::Triangle,
            Waveform::Sawtooth,
            Waveform::Square,
        ] {
            for kind in [FilterKind::Lowpass, FilterKind::Bandpass, FilterKind::Highpass] {
                let mut spec = base;
                spec.waveform = waveform;
                spec.filter.kind = kind;
                let mut unit = ambient_voice(&spec, 0.0, 0.0);
                unit.set_sample_rate(44_100.0);
                for _ in 0..256 {
                    let (l, r) = unit.get_stereo();
                    assert!(l.is_finite() && r.is_finite());
                }
            }
        }
    }

    #[test]
    fn flap_stages_have_matching_arity() {
        let profile = AudioProfile::default();
        let voice = flap_voice(&profile.flap);
        assert_eq!(voice.inputs(), 0);
        assert_eq!(voice.outputs(), 1);
        let post = flap_post(&profile.flap);
        assert_eq!(post.inputs(), 1);
        assert_eq!(post.outputs(), 2);
        assert!(flap_duration(&profile.flap) >= 0.5);
    }

    #[test]
    fn score_builds_two_voices_and_an_echo_tail() {
        let profile = AudioProfile::default();
        let voices = score_voices(&profile.score);
        assert_eq!(voices.len(), 2);
        for v in &voices {
            assert_eq!(v.inputs(), 0);
            assert_eq!(v.outputs(), 1);
        }
        let post = score_post(&profile.score);
        assert_eq!(post.inputs(), 1);
        assert_eq!(post.outputs(), 2);
        // tail must be longer than the bare release
        assert!(score_duration(&profile.score) > profile.score.release);
    }

    #[test]
    fn game_over_voice_pitch_dives() {
        let profile = AudioProfile::default();
        let mut unit = game_over_voice(&profile.game_over);
        unit.set_sample_rate(44_100.0);
        // count zero crossings early vs late; the dive means fewer later
        let crossings = |u: &mut Box<dyn AudioUnit>, n: usize| {
            let mut count = 0;
            let mut last = 0.0f32;
            for _ in 0..n {
                let s = u.get_mono();
                if last < 0.0 && s >= 0.0 {
                    count += 1;
                }
                last = s;
            }
            count
        };
        let early = crossings(&mut unit, 8820);
        // skip to the end of the dive
        for _ in 0..30_000 {
            unit.get_mono();
        }
        let late = crossings(&mut unit, 8820);
        assert!(
            late < early,
            "pitch should fall over the dive: early {early}, late {late}"
        );
    }

    #[test]
    fn noise_burst_fades_to_silence() {
        let profile = AudioProfile::default();
        let mut unit = noise_burst_voice(&profile.game_over);
        assert_eq!(unit.inputs(), 0);
        assert_eq!(unit.outputs(), 1);
        unit.set_sample_rate(44_100.0);
        let mut early_peak = 0.0f32;
        for _ in 0..4410 {
            early_peak = early_peak.max(unit.get_mono().abs());
        }
        // past noise_duration the linear fade has zeroed everything
        for _ in 0..30_000 {
            unit.get_mono();
        }
        let mut late_peak = 0.0f32;
        for _ in 0..4410 {
            late_peak = late_peak.max(unit.get_mono().abs());
        }
        assert!(early_peak > 0.01);
        assert!(late_peak < 1e-3);
    }
}
