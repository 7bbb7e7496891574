//! Flappy Dopamine: a terminal flappy game that chases the dopamine hit.
//!
//! Six visual themes crossfade into each other as the score climbs, every
//! sound is synthesized from oscillator graphs at runtime, and the whole
//! thing renders as half-block pixels over crossterm. The binary in
//! `main.rs` owns the terminal session and the frame clock; everything
//! else lives here so the pieces stay testable headlessly.

pub mod audio;
pub mod config;
pub mod game;
pub mod leaderboard;
pub mod particles;
pub mod persist;
pub mod physics;
pub mod render;
pub mod sequencer;
pub mod share;
pub mod themes;
