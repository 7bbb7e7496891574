//! Remote top-score client.
//!
//! The endpoint comes from `FLAPPY_SCOREBOARD_URL`; when it is unset the
//! client is offline and every call is a cheap no-op. A worker thread owns
//! the HTTP agent so the game loop never blocks on the network: the game
//! sends commands down one channel and drains results from another once per
//! frame. Dropping the client closes the command channel, which ends the
//! worker.

use std::error::Error;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use serde::Deserialize;

use crate::persist::DEFAULT_NAME;

/// Rows kept in the cached view, matching the over-panel table.
pub const HISTORY_LIMIT: usize = 12;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(6);
const USER_AGENT: &str = "flappy-dopamine";

#[derive(Clone, Debug, Deserialize)]
pub struct ScoreEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub score: i64,
    /// Milliseconds since the epoch; 0 when the service omits it.
    #[serde(default)]
    pub timestamp: i64,
}

pub enum Command {
    Submit { name: String, score: u32 },
    FetchTop { limit: usize },
}

pub enum BoardEvent {
    /// A fresh ordered view; replaces whatever the game cached.
    Refreshed(Vec<ScoreEntry>),
    /// Fetch or submit failed; the cached view stays as it was.
    Unavailable(String),
}

pub struct LeaderboardClient {
    tx: Option<mpsc::Sender<Command>>,
    rx: Option<mpsc::Receiver<BoardEvent>>,
}

impl LeaderboardClient {
    /// Online when `FLAPPY_SCOREBOARD_URL` is set to a non-empty value,
    /// offline otherwise.
    pub fn from_env() -> Self {
        match std::env::var("FLAPPY_SCOREBOARD_URL") {
            Ok(url) if !url.trim().is_empty() => Self::online(url.trim().to_string()),
            _ => Self::offline(),
        }
    }

    pub fn online(base: String) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (event_tx, event_rx) = mpsc::channel::<BoardEvent>();
        thread::spawn(move || worker(base, cmd_rx, event_tx));
        Self {
            tx: Some(cmd_tx),
            rx: Some(event_rx),
        }
    }

    /// Client that drops submits and never produces events.
    pub fn offline() -> Self {
        Self { tx: None, rx: None }
    }

    pub fn is_offline(&self) -> bool {
        self.tx.is_none()
    }

    pub fn submit(&self, name: &str, score: u32) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(Command::Submit {
                name: name.to_string(),
                score,
            });
        }
    }

    pub fn request_top(&self, limit: usize) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(Command::FetchTop { limit });
        }
    }

    /// Drain everything the worker produced since the last frame.
    pub fn poll(&self) -> Vec<BoardEvent> {
        let mut events = Vec::new();
        if let Some(rx) = &self.rx {
            while let Ok(event) = rx.try_recv() {
                events.push(event);
            }
        }
        events
    }
}

fn worker(base: String, commands: mpsc::Receiver<Command>, events: mpsc::Sender<BoardEvent>) {
    let agent = ureq::AgentBuilder::new()
        .timeout(REQUEST_TIMEOUT)
        .build();
    while let Ok(command) = commands.recv() {
        match command {
            Command::Submit { name, score } => {
                if let Err(err) = submit_score(&agent, &base, &name, score) {
                    let _ = events.send(BoardEvent::Unavailable(err.to_string()));
                    continue;
                }
                // a successful submit refreshes the view it just changed
                push_top(&agent, &base, HISTORY_LIMIT, &events);
            }
            Command::FetchTop { limit } => push_top(&agent, &base, limit, &events),
        }
    }
}

fn push_top(agent: &ureq::Agent, base: &str, limit: usize, events: &mpsc::Sender<BoardEvent>) {
    match fetch_top(agent, base, limit) {
        Ok(entries) => {
            let _ = events.send(BoardEvent::Refreshed(entries));
        }
        Err(err) => {
            let _ = events.send(BoardEvent::Unavailable(err.to_string()));
        }
    }
}

fn fetch_top(
    agent: &ureq::Agent,
    base: &str,
    limit: usize,
) -> Result<Vec<ScoreEntry>, Box<dyn Error>> {
    let url = format!("{}/scores?limit={}", base.trim_end_matches('/'), limit);
    let raw: Vec<ScoreEntry> = agent
        .get(&url)
        .set("User-Agent", USER_AGENT)
        .call()?
        .into_json()?;
    Ok(sanitize_entries(raw, limit))
}

fn submit_score(
    agent: &ureq::Agent,
    base: &str,
    name: &str,
    score: u32,
) -> Result<(), Box<dyn Error>> {
    let url = format!("{}/scores", base.trim_end_matches('/'));
    agent
        .post(&url)
        .set("User-Agent", USER_AGENT)
        .send_json(serde_json::json!({ "name": name, "score": score }))?;
    Ok(())
}

/// Drop negative scores, fall back to the stock name, order by score then
/// recency, and cap the list. Junk rows degrade individually instead of
/// failing the whole fetch.
fn sanitize_entries(mut entries: Vec<ScoreEntry>, limit: usize) -> Vec<ScoreEntry> {
    entries.retain(|entry| entry.score >= 0);
    for entry in &mut entries {
        let trimmed = entry.name.trim().to_string();
        entry.name = if trimmed.is_empty() {
            DEFAULT_NAME.to_string()
        } else {
            trimmed
        };
    }
    entries.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(b.timestamp.cmp(&a.timestamp))
    });
    entries.truncate(limit);
    entries
}
