//! Terminal shell: argument parsing, raw-mode session, the frame loop,
//! and input mapping. Everything game-shaped lives in the library.

use std::io::{self, stdout};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode};
use crossterm::{cursor, execute, terminal};
use rand::SeedableRng;
use rand::rngs::StdRng;

use flappy_dopamine::audio::AudioEngine;
use flappy_dopamine::config::{MAX_FRAME_DT, Metrics};
use flappy_dopamine::game::Game;
use flappy_dopamine::leaderboard::LeaderboardClient;
use flappy_dopamine::persist::ProfileStore;
use flappy_dopamine::render::PixelBuf;

struct CliOptions {
    name: Option<String>,
    muted: bool,
}

fn parse_args() -> CliOptions {
    let mut options = CliOptions {
        name: None,
        muted: false,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--name" => match args.next() {
                Some(value) => options.name = Some(value),
                None => {
                    eprintln!("--name needs a value");
                    eprintln!("Run 'flappy-dopamine --help' for usage.");
                    std::process::exit(1);
                }
            },
            "--muted" => options.muted = true,
            "--help" | "-h" => {
                println!("Flappy Dopamine - terminal reflex game\n");
                println!("Usage: flappy-dopamine [options]\n");
                println!("Options:");
                println!("  --name NAME  Set and save the player display name");
                println!("  --muted      Start with audio muted");
                println!("  --version    Show version information");
                println!("  --help       Show this help message");
                println!();
                println!("Keys: Space/Up/Enter flap, p pause, m mute, t share, q quit.");
                println!("Set FLAPPY_SCOREBOARD_URL to enable the online leaderboard.");
                std::process::exit(0);
            }
            "--version" | "-v" => {
                println!("flappy-dopamine {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown option: {}", other);
                eprintln!("Run 'flappy-dopamine --help' for usage.");
                std::process::exit(1);
            }
        }
    }
    options
}

fn main() -> io::Result<()> {
    let options = parse_args();

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
    )?;

    let cleanup = |out: &mut io::Stdout| -> io::Result<()> {
        execute!(
            out,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        terminal::disable_raw_mode()
    };

    let (cols, rows) = terminal::size()?;
    let pw = cols as usize;
    let ph = rows as usize * 2;

    let mut frame = PixelBuf::new(pw, ph);
    let mut game = Game::new(
        Metrics::new(pw as f32, ph as f32),
        AudioEngine::new(),
        ProfileStore::open(),
        LeaderboardClient::from_env(),
        Box::new(StdRng::from_entropy()),
    );
    if let Some(name) = &options.name {
        game.set_player_name(name);
    }
    if options.muted {
        game.toggle_mute();
    }

    let frame_duration = Duration::from_millis(16); // ~60 fps
    let start = Instant::now();
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();

        // Input
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        cleanup(&mut out)?;
                        print_deferred(&mut game);
                        return Ok(());
                    }
                    KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => {
                        game.primary_action();
                    }
                    KeyCode::Char('p') => game.toggle_pause(),
                    KeyCode::Char('m') => game.toggle_mute(),
                    KeyCode::Char('t') => game.queue_share(),
                    _ => {}
                },
                Event::Resize(c, r) => {
                    let npw = c as usize;
                    let nph = r as usize * 2;
                    frame.resize(npw, nph);
                    game.resize(npw as f32, nph as f32);
                }
                _ => {}
            }
        }

        // Simulation step; a start or resume rebases the clock so the
        // first frame after it sees dt = 0
        let now = Instant::now();
        if game.take_time_reset() {
            last = now;
        }
        let dt = (now - last).as_secs_f32().min(MAX_FRAME_DT);
        last = now;
        game.update(dt);

        // Render
        game.render(&mut frame, start.elapsed().as_secs_f32());
        frame.render(&mut out)?;

        // Frame pacing
        let spent = frame_start.elapsed();
        if spent < frame_duration {
            std::thread::sleep(frame_duration - spent);
        }
    }
}

/// Lines held back while the alternate screen was active.
fn print_deferred(game: &mut Game) {
    if let Some(err) = game.take_save_error() {
        eprintln!("warning: could not save profile: {err}");
    }
    if let Some(url) = game.take_share_url() {
        println!("Share your run: {url}");
    }
}
