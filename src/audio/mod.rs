//! Procedural audio: every sound is an oscillator graph built at runtime,
//! no samples on disk.
//!
//! `profile` holds the data model (per-theme overrides merged onto global
//! defaults), `synth` turns resolved profiles into fundsp graphs, `source`
//! adapts those graphs into rodio sources, and `engine` owns the output
//! device, the live ambient bed and the one-shot sinks.

pub mod engine;
pub mod profile;
pub mod source;
pub mod synth;

pub use engine::{AudioEngine, Mood};
