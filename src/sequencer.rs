//! Score-driven theme sequencing and the crossfade clock.
//!
//! The sequencer owns which theme is showing, which one is fading out,
//! and how far along the fade is. It never touches drawing or audio; the
//! game asks it what changed and reacts.

/// A theme switch fires every time the score crosses a multiple of this.
pub const SWITCH_INTERVAL: u32 = 2;

/// Crossfade length for a milestone switch, seconds.
pub const MILESTONE_FADE: f32 = 0.9;

/// Crossfade length for the forced return to the first theme on game
/// over, seconds.
pub const GAME_OVER_FADE: f32 = 0.85;

#[derive(Debug)]
pub struct ThemeSequencer {
    theme_count: usize,
    pub current: usize,
    pub previous: usize,
    /// 0 at switch time, 1 once the fade has fully landed.
    pub progress: f32,
    pub duration: f32,
    last_switch_score: u32,
}

impl ThemeSequencer {
    pub fn new(theme_count: usize) -> Self {
        Self {
            theme_count: theme_count.max(1),
            current: 0,
            previous: 0,
            progress: 1.0,
            duration: 1.0,
            last_switch_score: 0,
        }
    }

    /// Advance the fade clock. Runs every frame regardless of game mode,
    /// so a fade keeps landing even while paused.
    pub fn advance(&mut self, dt: f32) {
        if self.progress < 1.0 {
            self.progress = (self.progress + dt / self.duration.max(0.001)).min(1.0);
        }
    }

    /// Tell the sequencer the score changed. Returns true when this score
    /// crossed a milestone and the roster rotated to the next theme.
    pub fn note_score(&mut self, score: u32) -> bool {
        if score > 0 && score % SWITCH_INTERVAL == 0 && score != self.last_switch_score {
            self.previous = self.current;
            self.current = (self.current + 1) % self.theme_count;
            self.progress = 0.0;
            self.duration = MILESTONE_FADE;
            self.last_switch_score = score;
            true
        } else {
            false
        }
    }

    /// Game over: fade back to the first theme and forget the milestone
    /// bookmark so the next run starts its own rotation.
    pub fn reset_to_first(&mut self) {
        self.previous = self.current;
        self.current = 0;
        self.progress = 0.0;
        self.duration = GAME_OVER_FADE;
        self.last_switch_score = 0;
    }

    /// Cancel any running fade without moving. A new run starts on
    /// whatever theme is showing, fully landed.
    pub fn settle(&mut self) {
        self.previous = self.current;
        self.progress = 1.0;
        self.duration = 1.0;
        self.last_switch_score = 0;
    }

    pub fn crossfading(&self) -> bool {
        self.progress < 1.0 && self.previous != self.current
    }

    /// Eased fade weight for visuals.
    pub fn eased(&self) -> f32 {
        ease_in_out_cubic(self.progress)
    }
}

pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t <= 0.0 {
        0.0
    } else if t >= 1.0 {
        1.0
    } else if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn milestone_rotates_to_next_theme() {
        let mut seq = ThemeSequencer::new(6);
        assert!(!seq.note_score(1));
        assert!(seq.note_score(2));
        assert_eq!(seq.current, 1);
        assert_eq!(seq.previous, 0);
        assert_eq!(seq.progress, 0.0);
        assert_eq!(seq.duration, MILESTONE_FADE);
    }

    #[test]
    fn same_milestone_never_fires_twice() {
        let mut seq = ThemeSequencer::new(6);
        assert!(seq.note_score(2));
        assert!(!seq.note_score(2));
        assert!(!seq.note_score(3));
        assert!(seq.note_score(4));
    }

    #[test]
    fn score_zero_never_switches() {
        let mut seq = ThemeSequencer::new(6);
        assert!(!seq.note_score(0));
        assert_eq!(seq.current, 0);
    }

    #[test]
    fn six_points_make_exactly_three_switches() {
        let mut seq = ThemeSequencer::new(6);
        let mut switches = 0;
        for score in 1..=6 {
            if seq.note_score(score) {
                switches += 1;
            }
        }
        assert_eq!(switches, 3);
        assert_eq!(seq.current, 3);
    }

    #[test]
    fn rotation_wraps_around_roster() {
        let mut seq = ThemeSequencer::new(3);
        seq.note_score(2);
        seq.note_score(4);
        assert_eq!(seq.current, 2);
        seq.note_score(6);
        assert_eq!(seq.current, 0);
        assert_eq!(seq.previous, 2);
    }

    #[test]
    fn fade_progress_is_monotone_and_lands() {
        let mut seq = ThemeSequencer::new(6);
        seq.note_score(2);
        let mut last = seq.progress;
        for _ in 0..100 {
            seq.advance(0.016);
            assert!(seq.progress >= last);
            last = seq.progress;
        }
        assert_eq!(seq.progress, 1.0);
        // exactly duration seconds in one lump also lands
        seq.note_score(4);
        seq.advance(MILESTONE_FADE);
        assert_eq!(seq.progress, 1.0);
    }

    #[test]
    fn game_over_returns_to_first_theme() {
        let mut seq = ThemeSequencer::new(6);
        seq.note_score(2);
        seq.note_score(4);
        assert_eq!(seq.current, 2);
        seq.reset_to_first();
        assert_eq!(seq.current, 0);
        assert_eq!(seq.previous, 2);
        assert_eq!(seq.duration, GAME_OVER_FADE);
        assert!(seq.crossfading());
    }

    #[test]
    fn milestone_bookmark_clears_on_game_over() {
        let mut seq = ThemeSequencer::new(6);
        seq.note_score(2);
        seq.reset_to_first();
        // a fresh run reaching 2 again must switch again
        assert!(seq.note_score(2));
    }

    #[test]
    fn settle_cancels_fade_in_place() {
        let mut seq = ThemeSequencer::new(6);
        seq.note_score(2);
        seq.settle();
        assert_eq!(seq.current, 1);
        assert!(!seq.crossfading());
        assert_eq!(seq.progress, 1.0);
    }

    #[test]
    fn easing_is_clamped_and_symmetric() {
        assert_eq!(ease_in_out_cubic(-1.0), 0.0);
        assert_eq!(ease_in_out_cubic(2.0), 1.0);
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-6);
        assert!(ease_in_out_cubic(0.25) < 0.25);
        assert!(ease_in_out_cubic(0.75) > 0.75);
    }
}
