//! Run orchestration. One `Game` owns every subsystem and is driven by
//! `update(dt)` then `render(frame, time)` once per frame. All simulation
//! state changes happen inside `update`; `render` only writes pixels (its
//! scratch buffer is the one thing it mutates).

use rand::RngCore;

use crate::audio::{AudioEngine, Mood};
use crate::config::{Metrics, Tuning};
use crate::leaderboard::{BoardEvent, HISTORY_LIMIT, LeaderboardClient, ScoreEntry};
use crate::particles::ParticleField;
use crate::persist::{PlayerProfile, ProfileStore, sanitize_name};
use crate::physics::{Avatar, ObstacleField};
use crate::render::{self, PixelBuf, Rgb};
use crate::sequencer::ThemeSequencer;
use crate::share;
use crate::themes::{self, Theme};

/// Seconds a toast stays up; a newer toast replaces it outright.
const TOAST_SECONDS: f32 = 2.2;

/// Leaderboard rows shown on the over panel.
const BOARD_ROWS: usize = 4;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Idle,
    Running,
    Paused,
    Over,
}

struct Toast {
    text: String,
    expires_at: f32,
}

pub struct Game {
    pub tuning: Tuning,
    pub metrics: Metrics,
    pub mode: Mode,
    pub score: u32,
    speed: f32,
    /// Game clock in seconds; keeps ticking through pause so toasts and
    /// fades still land.
    pub elapsed: f32,
    needs_time_reset: bool,
    pub avatar: Avatar,
    pub obstacles: ObstacleField,
    pub particles: ParticleField,
    pub sequencer: ThemeSequencer,
    themes: Vec<Box<dyn Theme>>,
    pub audio: AudioEngine,
    store: ProfileStore,
    pub profile: PlayerProfile,
    leaderboard: LeaderboardClient,
    pub board: Vec<ScoreEntry>,
    toast: Option<Toast>,
    pending_share: Option<String>,
    save_error: Option<String>,
    scratch: PixelBuf,
    rng: Box<dyn RngCore>,
}

impl Game {
    pub fn new(
        metrics: Metrics,
        audio: AudioEngine,
        store: ProfileStore,
        leaderboard: LeaderboardClient,
        rng: Box<dyn RngCore>,
    ) -> Self {
        let tuning = Tuning::default();
        let themes = themes::roster();
        let profile = store.load();
        let avatar = Avatar::new(&metrics);
        let obstacles = ObstacleField::new(metrics.obstacle_width());
        let sequencer = ThemeSequencer::new(themes.len());
        let scratch = PixelBuf::new(metrics.width as usize, metrics.height as usize);
        let speed = tuning.base_speed * metrics.scale;
        let game = Self {
            tuning,
            metrics,
            mode: Mode::Idle,
            score: 0,
            speed,
            elapsed: 0.0,
            needs_time_reset: true,
            avatar,
            obstacles,
            particles: ParticleField::new(),
            sequencer,
            themes,
            audio,
            store,
            profile,
            leaderboard,
            board: Vec::new(),
            toast: None,
            pending_share: None,
            save_error: None,
            scratch,
            rng,
        };
        game.leaderboard.request_top(HISTORY_LIMIT);
        game
    }

    pub fn current_theme(&self) -> &dyn Theme {
        self.themes[self.sequencer.current].as_ref()
    }

    fn mood(&self) -> Mood {
        match self.mode {
            Mode::Running => Mood::Running,
            Mode::Over => Mood::GameOver,
            Mode::Idle | Mode::Paused => Mood::Idle,
        }
    }

    // ── Input entry points ──────────────────────────────────────────────

    /// Start, flap, resume or restart, depending on mode. Always arms the
    /// audio device first: this is the user gesture that makes sound legal.
    pub fn primary_action(&mut self) {
        self.arm_audio();
        match self.mode {
            Mode::Idle | Mode::Over => {
                self.start_run();
                self.flap();
            }
            Mode::Running => self.flap(),
            Mode::Paused => self.resume(),
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.mode {
            Mode::Running => {
                self.mode = Mode::Paused;
                self.audio.set_mood(Mood::Idle, false);
            }
            Mode::Paused => self.resume(),
            _ => {}
        }
    }

    pub fn toggle_mute(&mut self) {
        let muted = !self.audio.muted();
        if !muted {
            self.arm_audio();
        }
        self.audio.set_muted(muted);
        self.show_toast(if muted { "AUDIO OFF" } else { "AUDIO ON" }.to_string());
    }

    /// Queue the share URL for printing once the terminal is restored.
    /// Only meaningful on the over panel.
    pub fn queue_share(&mut self) {
        if self.mode != Mode::Over {
            return;
        }
        self.pending_share = Some(share::share_url(
            &self.profile.name,
            self.score,
            self.profile.best,
        ));
        self.show_toast("SHARE LINK READY".to_string());
    }

    pub fn set_player_name(&mut self, raw: &str) {
        self.profile.name = sanitize_name(raw);
        if let Err(err) = self.store.save(&self.profile) {
            self.save_error = Some(err.to_string());
        }
    }

    // ── Deferred output for the shell ───────────────────────────────────

    pub fn take_share_url(&mut self) -> Option<String> {
        self.pending_share.take()
    }

    pub fn take_save_error(&mut self) -> Option<String> {
        self.save_error.take()
    }

    /// True once per resume/start; the caller must rebase its frame clock
    /// so the next dt is zero.
    pub fn take_time_reset(&mut self) -> bool {
        std::mem::replace(&mut self.needs_time_reset, false)
    }

    // ── Mode changes ────────────────────────────────────────────────────

    fn arm_audio(&mut self) {
        let fresh_probe = !self.audio.is_unavailable();
        let overrides = self.themes[self.sequencer.current].audio();
        self.audio.arm(&overrides, self.mood(), &mut self.rng);
        // the gesture that discovers the missing device is the one that toasts
        if fresh_probe && self.audio.is_unavailable() {
            self.show_toast("AUDIO UNAVAILABLE".to_string());
        }
    }

    fn start_run(&mut self) {
        self.mode = Mode::Running;
        self.needs_time_reset = true;
        self.score = 0;
        self.speed = self.tuning.base_speed * self.metrics.scale;
        self.sequencer.settle();
        self.particles.clear();
        self.obstacles.reset(self.metrics.obstacle_width());
        self.avatar.reset(&self.metrics);
        self.audio.set_mood(Mood::Running, true);
    }

    fn resume(&mut self) {
        if self.mode != Mode::Paused {
            return;
        }
        self.mode = Mode::Running;
        self.needs_time_reset = true;
        self.audio.set_mood(Mood::Running, true);
    }

    fn flap(&mut self) {
        if self.mode != Mode::Running {
            return;
        }
        self.avatar.flap(self.tuning.flap_impulse * self.metrics.scale);
        let x = self.avatar.x - self.avatar.radius * 0.4;
        let y = self.avatar.y + self.avatar.radius * 0.2;
        let time = self.elapsed;
        let theme: &dyn Theme = self.themes[self.sequencer.current].as_ref();
        self.particles.emit_flap(
            x,
            y,
            self.metrics.scale,
            |i| theme.particle_hue(time, i),
            &mut self.rng,
        );
        self.audio.play_flap();
    }

    fn add_score(&mut self, earned: u32) {
        self.score += earned;
        let x = self.avatar.x + self.metrics.scale * 12.0;
        let y = self.avatar.y - self.metrics.scale * 8.0;
        let time = self.elapsed;
        {
            let theme: &dyn Theme = self.themes[self.sequencer.current].as_ref();
            self.particles.emit_burst(
                x,
                y,
                self.metrics.scale,
                |i| theme.particle_hue(time, i),
                &mut self.rng,
            );
        }
        self.audio.play_score();

        if self.sequencer.note_score(self.score) {
            let overrides = self.themes[self.sequencer.current].audio();
            self.audio.set_theme(&overrides, true, &mut self.rng);
            let label = self.themes[self.sequencer.current].label();
            self.show_toast(format!("THEME {label}"));
        }
    }

    fn end_run(&mut self) {
        self.mode = Mode::Over;
        let final_score = self.score;
        let is_new_best = final_score > self.profile.best;

        let x = self.avatar.x;
        let y = self
            .avatar
            .y
            .min(self.metrics.height - 60.0 * self.metrics.scale);
        let time = self.elapsed;
        {
            let theme: &dyn Theme = self.themes[self.sequencer.current].as_ref();
            self.particles.emit_burst(
                x,
                y,
                self.metrics.scale,
                |i| theme.particle_hue(time, i),
                &mut self.rng,
            );
        }

        if is_new_best {
            self.profile.best = final_score;
            if let Err(err) = self.store.save(&self.profile) {
                self.save_error = Some(err.to_string());
                self.show_toast("SAVE FAILED".to_string());
            }
        }
        self.leaderboard.submit(&self.profile.name, final_score);

        self.audio.play_game_over();
        self.audio.set_mood(Mood::GameOver, false);
        if is_new_best {
            self.show_toast("NEW PERSONAL BEST".to_string());
        }

        // every run ends back on the first theme
        self.sequencer.reset_to_first();
        let overrides = self.themes[0].audio();
        self.audio.set_theme(&overrides, true, &mut self.rng);
    }

    // ── Frame step ──────────────────────────────────────────────────────

    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
        self.sequencer.advance(dt);
        self.poll_leaderboard();
        if let Some(toast) = &self.toast {
            if self.elapsed >= toast.expires_at {
                self.toast = None;
            }
        }

        match self.mode {
            Mode::Paused => {}
            Mode::Idle => {
                self.avatar.idle_bob(self.elapsed, &self.metrics);
                self.particles.update(dt, self.metrics.height);
            }
            Mode::Over => {
                // the body tumbles off screen in raw tuning units, slightly
                // slowed
                self.avatar
                    .update(dt * 0.9, self.tuning.gravity, self.tuning.max_velocity);
                self.particles.update(dt, self.metrics.height);
            }
            Mode::Running => {
                self.speed = (self.tuning.base_speed
                    + self.score as f32 * self.tuning.speed_ramp)
                    * self.metrics.scale;
                self.avatar.update(
                    dt,
                    self.tuning.gravity * self.metrics.scale,
                    self.tuning.max_velocity * self.metrics.scale,
                );
                self.obstacles.advance(
                    dt,
                    self.speed,
                    self.tuning.spawn_interval,
                    &self.metrics,
                    &mut self.rng,
                );
                self.particles.update(dt, self.metrics.height);

                if self.avatar.top() <= 0.0
                    || self.avatar.bottom() >= self.metrics.floor_y(&self.tuning)
                    || self.obstacles.collides_with(&self.avatar, self.metrics.height)
                {
                    self.end_run();
                    return;
                }
                let earned = self.obstacles.claim_passed(self.avatar.x);
                if earned > 0 {
                    self.add_score(earned);
                }
            }
        }
    }

    fn poll_leaderboard(&mut self) {
        for event in self.leaderboard.poll() {
            match event {
                BoardEvent::Refreshed(entries) => self.board = entries,
                BoardEvent::Unavailable(_) => {
                    self.show_toast("SCOREBOARD OFFLINE".to_string());
                }
            }
        }
    }

    fn show_toast(&mut self, text: String) {
        self.toast = Some(Toast {
            text,
            expires_at: self.elapsed + TOAST_SECONDS,
        });
    }

    /// Viewport changed: re-derive metrics and put the world back in a
    /// sane spot. The run itself keeps going.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.metrics = Metrics::new(width, height);
        self.scratch
            .resize(width as usize, height as usize);
        self.avatar.reset(&self.metrics);
        self.obstacles.reset(self.metrics.obstacle_width());
    }

    // ── Drawing ─────────────────────────────────────────────────────────

    pub fn render(&mut self, frame: &mut PixelBuf, time: f32) {
        let current: &dyn Theme = self.themes[self.sequencer.current].as_ref();
        let previous: &dyn Theme = self.themes[self.sequencer.previous].as_ref();
        let eased = self.sequencer.eased();

        if self.sequencer.crossfading() {
            previous.draw_background(frame, time);
            current.draw_background(&mut self.scratch, time);
            frame.blend_from(&self.scratch, eased);
            render::draw_aura(frame, time - 0.3, previous.accent(), (1.0 - eased) * 0.6);
            render::draw_aura(frame, time, current.accent(), eased * 0.85);
            render::draw_transition_rings(frame, time, previous.accent(), current.accent(), eased);
        } else {
            current.draw_background(frame, time);
            render::draw_aura(frame, time, current.accent(), 0.7);
        }

        for obstacle in self.obstacles.iter() {
            current.draw_obstacle(frame, obstacle, self.obstacles.width, time);
        }
        self.particles.draw(frame);
        current.draw_avatar(frame, &self.avatar, time);

        if self.mode == Mode::Paused {
            frame.veil(Rgb::SHADOW, 0.35);
        }
        self.draw_hud(frame);
    }

    fn draw_hud(&self, frame: &mut PixelBuf) {
        let w = frame.w as i32;
        let h = frame.h as i32;
        let cx = w / 2;
        let accent = self.current_theme().accent();
        let dim = Rgb(180, 180, 196);

        match self.mode {
            Mode::Idle => {
                render::draw_text(frame, cx, h / 2 - 14, "FLAPPY DOPAMINE", accent);
                let best = format!("BEST {}", self.profile.best);
                render::draw_text(frame, cx, h / 2 - 6, &best, Rgb::WHITE);
                render::draw_text(frame, cx, h / 2 + 2, "SPACE TO START", dim);
            }
            Mode::Running | Mode::Paused => {
                render::draw_number(frame, cx, 3, self.score, Rgb::WHITE);
                let best = format!("BEST {}", self.profile.best);
                render::draw_text(frame, render::text_width(&best) / 2 + 2, 2, &best, dim);
            }
            Mode::Over => {
                render::draw_text(frame, cx, h / 2 - 16, "GAME OVER", accent);
                let line = format!("SCORE {} BEST {}", self.score, self.profile.best);
                render::draw_text(frame, cx, h / 2 - 9, &line, Rgb::WHITE);
                let mut y = h / 2 - 2;
                for (i, entry) in self.board.iter().take(BOARD_ROWS).enumerate() {
                    let name: String = entry.name.chars().take(10).collect();
                    let row = format!("{} {} {}", i + 1, name, entry.score);
                    render::draw_text(frame, cx, y, &row, dim);
                    y += 7;
                }
                render::draw_text(frame, cx, y + 1, "SPACE TO RETRY", dim);
            }
        }

        if self.mode == Mode::Paused {
            render::draw_text(frame, cx, h / 2 - 3, "PAUSED", Rgb::WHITE);
        }
        if self.audio.muted() {
            let tw = render::text_width("MUTED");
            render::draw_text(frame, w - tw / 2 - 2, 2, "MUTED", dim);
        }
        if let Some(toast) = &self.toast {
            render::draw_text(frame, cx, h - 8, &toast.text, accent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn test_game() -> Game {
        Game::new(
            Metrics::new(320.0, 180.0),
            AudioEngine::disabled(),
            ProfileStore::disabled(),
            LeaderboardClient::offline(),
            Box::new(StdRng::seed_from_u64(7)),
        )
    }

    #[test]
    fn fresh_game_sits_idle() {
        let game = test_game();
        assert_eq!(game.mode, Mode::Idle);
        assert_eq!(game.score, 0);
        assert!(game.obstacles.is_empty());
    }

    #[test]
    fn primary_action_starts_and_flaps() {
        let mut game = test_game();
        game.primary_action();
        assert_eq!(game.mode, Mode::Running);
        let expected = game.tuning.flap_impulse * game.metrics.scale;
        assert!((game.avatar.velocity - expected).abs() < 0.001);
        assert!(!game.particles.is_empty());
    }

    #[test]
    fn pause_freezes_the_avatar() {
        let mut game = test_game();
        game.primary_action();
        game.update(0.016);
        game.toggle_pause();
        assert_eq!(game.mode, Mode::Paused);
        let y = game.avatar.y;
        for _ in 0..20 {
            game.update(0.016);
        }
        assert_eq!(game.avatar.y, y);
    }

    #[test]
    fn resume_rebases_the_frame_clock() {
        let mut game = test_game();
        game.primary_action();
        assert!(game.take_time_reset());
        game.toggle_pause();
        game.toggle_pause();
        assert_eq!(game.mode, Mode::Running);
        assert!(game.take_time_reset());
        assert!(!game.take_time_reset());
    }

    #[test]
    fn falling_to_the_floor_ends_the_run_on_the_first_theme() {
        let mut game = test_game();
        game.primary_action();
        // score a few points first so the roster has moved
        game.add_score(2);
        assert_eq!(game.sequencer.current, 1);
        for _ in 0..600 {
            game.update(0.016);
            if game.mode == Mode::Over {
                break;
            }
        }
        assert_eq!(game.mode, Mode::Over);
        assert_eq!(game.sequencer.current, 0);
    }

    #[test]
    fn over_mode_keeps_the_avatar_tumbling() {
        let mut game = test_game();
        game.primary_action();
        for _ in 0..600 {
            game.update(0.016);
            if game.mode == Mode::Over {
                break;
            }
        }
        let y = game.avatar.y;
        game.update(0.016);
        assert!(game.avatar.y > y);
        assert_eq!(game.mode, Mode::Over);
    }

    #[test]
    fn restart_clears_the_board() {
        let mut game = test_game();
        game.primary_action();
        game.add_score(3);
        for _ in 0..600 {
            game.update(0.016);
            if game.mode == Mode::Over {
                break;
            }
        }
        game.primary_action();
        assert_eq!(game.mode, Mode::Running);
        assert_eq!(game.score, 0);
        assert!(game.obstacles.is_empty());
        assert!(!game.sequencer.crossfading());
    }

    #[test]
    fn game_over_records_a_new_best() {
        let mut game = test_game();
        game.primary_action();
        game.add_score(5);
        for _ in 0..600 {
            game.update(0.016);
            if game.mode == Mode::Over {
                break;
            }
        }
        assert_eq!(game.profile.best, 5);
    }

    #[test]
    fn milestone_score_switches_theme_and_toasts() {
        let mut game = test_game();
        game.primary_action();
        game.add_score(1);
        assert_eq!(game.sequencer.current, 0);
        game.add_score(1);
        assert_eq!(game.sequencer.current, 1);
        assert!(game.toast.is_some());
    }

    #[test]
    fn toast_expires_on_the_game_clock() {
        let mut game = test_game();
        game.toggle_mute();
        assert!(game.toast.is_some());
        game.update(TOAST_SECONDS + 0.1);
        assert!(game.toast.is_none());
    }

    #[test]
    fn share_only_arms_on_the_over_panel() {
        let mut game = test_game();
        game.queue_share();
        assert!(game.take_share_url().is_none());
        game.primary_action();
        for _ in 0..600 {
            game.update(0.016);
            if game.mode == Mode::Over {
                break;
            }
        }
        game.queue_share();
        let url = game.take_share_url().unwrap();
        assert!(url.contains("twitter.com"));
    }

    #[test]
    fn resize_rederives_metrics_and_resets_the_field() {
        let mut game = test_game();
        game.primary_action();
        for _ in 0..200 {
            game.update(0.016);
        }
        game.resize(200.0, 100.0);
        assert!((game.metrics.width - 200.0).abs() < f32::EPSILON);
        assert!(game.obstacles.is_empty());
        assert!((game.avatar.x - 200.0 * 0.3).abs() < 0.001);
    }

    #[test]
    fn name_edit_is_sanitized() {
        let mut game = test_game();
        game.set_player_name("  Neo  ");
        assert_eq!(game.profile.name, "Neo");
        game.set_player_name("   ");
        assert_eq!(game.profile.name, crate::persist::DEFAULT_NAME);
    }

    #[test]
    fn render_survives_every_mode() {
        let mut game = test_game();
        let mut frame = PixelBuf::new(320, 180);
        game.render(&mut frame, 0.5);
        game.primary_action();
        game.add_score(2); // mid-crossfade
        game.render(&mut frame, 1.0);
        game.toggle_pause();
        game.render(&mut frame, 1.5);
        game.toggle_pause();
        for _ in 0..600 {
            game.update(0.016);
            if game.mode == Mode::Over {
                break;
            }
        }
        game.render(&mut frame, 2.0);
    }
}
