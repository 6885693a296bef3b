//! Glyphcast terminal client.
//!
//! Drives a core game session from stdin, with the round clock ticking on a
//! tokio interval.
//!
//! Usage: glyphcast [--config <path>] [--seed <n>] [--json] [--log <level>]
//!
//! `--json` reads one JSON command per line and writes one JSON snapshot per
//! line; otherwise a text panel is drawn after every action.

mod input;
mod view;

use std::io::{stdout, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use glyph_core::logging::{init_tracing, LogLevel, TracingConfig};
use glyph_core::timer::CountdownStatus;
use glyph_core::{Command, GameSession, SessionConfig, SessionSnapshot, SessionView};

use input::{parse_line, Action, HELP};
use view::{JsonView, TerminalView};

enum Frontend {
    Terminal(TerminalView<Stdout>),
    Json(JsonView<Stdout>),
}

impl SessionView for Frontend {
    fn present(&mut self, snapshot: &SessionSnapshot) {
        match self {
            Frontend::Terminal(view) => view.present(snapshot),
            Frontend::Json(view) => view.present(snapshot),
        }
    }
}

impl Frontend {
    fn time_notice(&mut self, seconds_left: u32) {
        // JSON consumers poll snapshots instead
        if let Frontend::Terminal(view) = self {
            view.time_notice(seconds_left);
        }
    }

    fn message(&mut self, text: &str) {
        if let Frontend::Terminal(view) = self {
            view.message(text);
        }
    }
}

/// What the main loop should do after a line of input
enum Flow {
    Continue,
    Quit,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let json_mode = has_flag(&args, "--json");

    let tracing_config = match parse_str_arg(&args, "--log") {
        Some(level) => {
            let level: LogLevel = level
                .parse()
                .map_err(anyhow::Error::msg)
                .context("invalid --log level")?;
            TracingConfig::with_level(level)
        }
        // stderr noise would interleave with the text panel
        None if json_mode => TracingConfig::default(),
        None => TracingConfig::quiet(),
    };
    init_tracing(&tracing_config);

    let mut config = match parse_str_arg(&args, "--config") {
        Some(path) => SessionConfig::load(&path)
            .with_context(|| format!("failed to load session config from {path}"))?,
        None => SessionConfig::default(),
    };
    if let Some(seed) = parse_num_arg(&args, "--seed") {
        config.seed = Some(seed);
    }
    config.validate().context("invalid session config")?;
    info!(?config, json_mode, "Glyphcast client starting");

    let tick = Duration::from_millis(config.tick_interval_ms);
    let mut session = GameSession::new(config);
    let mut frontend = if json_mode {
        Frontend::Json(JsonView::new(stdout()))
    } else {
        let mut view = TerminalView::new(stdout());
        view.message("Glyphcast. Type :start to begin the ritual, :help for commands.");
        Frontend::Terminal(view)
    };
    session.present_to(&mut frontend);

    let mut lines = spawn_stdin_reader();
    let mut ticker = tokio::time::interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let shown = session.state().countdown.display_seconds();
                match session.tick_once() {
                    CountdownStatus::Expired => session.present_to(&mut frontend),
                    CountdownStatus::Running => {
                        let left = session.state().countdown.display_seconds();
                        if left != shown && (left <= 5 || left % 10 == 0) {
                            frontend.time_notice(left);
                        }
                    }
                    CountdownStatus::Idle => {}
                }
            }
            line = lines.recv() => {
                let Some(line) = line else {
                    info!("Input closed");
                    break;
                };
                let flow = if json_mode {
                    handle_json_line(&mut session, &line)
                } else {
                    handle_text_line(&mut session, &mut frontend, &line)
                };
                match flow {
                    Flow::Continue => session.present_to(&mut frontend),
                    Flow::Quit => break,
                }
            }
        }
    }

    let state = session.state();
    info!(
        score = state.progression.score,
        stage = state.stage,
        "Session closed"
    );
    if let Frontend::Terminal(view) = &mut frontend {
        view.message(&format!(
            "Final essence {} at stage {}.",
            state.progression.score, state.stage
        ));
    }
    Ok(())
}

fn handle_text_line(session: &mut GameSession, frontend: &mut Frontend, line: &str) -> Flow {
    match parse_line(line) {
        Action::Play(commands) => {
            for command in commands {
                session.dispatch(command);
            }
        }
        Action::Help => frontend.message(HELP),
        Action::Quit => return Flow::Quit,
        Action::Unknown(text) => frontend.message(&format!("Unknown command {text}; try :help")),
    }
    Flow::Continue
}

fn handle_json_line(session: &mut GameSession, line: &str) -> Flow {
    if line.trim().is_empty() {
        return Flow::Continue;
    }
    match serde_json::from_str::<Command>(line) {
        Ok(command) => {
            session.dispatch(command);
        }
        Err(err) => warn!(%err, line, "Ignoring malformed command"),
    }
    Flow::Continue
}

/// Forwards stdin lines over a channel; the channel closes on EOF.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(32);
    tokio::spawn(async move {
        let mut reader = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match reader.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    warn!(%err, "Failed to read stdin");
                    break;
                }
            }
        }
    });
    rx
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|arg| arg == flag)
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn parse_num_arg<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    parse_str_arg(args, flag).and_then(|v| v.parse().ok())
}
