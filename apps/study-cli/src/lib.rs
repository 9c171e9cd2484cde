pub mod audio;
pub mod command;
pub mod config;
pub mod display;
pub mod store;

use std::time::Duration;

use chrono::Utc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Instant, MissedTickBehavior};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use word_deck_core::{
    render, AudioPlayer, Decision, DeckRng, LearnedSink, ReleaseOutcome, StudySession, WordSource,
};

use crate::audio::LoggingAudio;
use crate::command::{Command, HELP};
use crate::config::CliConfig;
use crate::display::{describe, describe_stats, COMPLETION_MESSAGE};
use crate::store::JsonWordStore;

pub async fn run() -> anyhow::Result<()> {
    let config = CliConfig::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let store = JsonWordStore::load(&config.words_file)?;
    let rng = config.seed.map(DeckRng::new).unwrap_or_else(DeckRng::from_entropy);
    tracing::info!(seed = rng.seed(), width = config.viewport_width, "starting study session");

    let mut session = StudySession::new(
        store,
        LoggingAudio::default(),
        config.settings.clone(),
        config.viewport_width,
        rng,
    )?;

    let started_at = Utc::now();
    let clock = Instant::now();
    let now = || clock.elapsed().as_millis() as u64;

    println!("{HELP}\n");
    println!("{}", describe(&render(&session, now())));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_millis(config.tick_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    while !session.is_finished() {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(command) => println!("{}", execute(&mut session, command, now())),
                    Err(err) => println!("{err}"),
                }
            }
            _ = ticker.tick() => {
                let now_ms = now();
                if session.advance(now_ms) > 0 {
                    println!("{}", describe(&render(&session, now_ms)));
                }
            }
        }
    }

    let finished_at = Utc::now();
    if session.is_finished() {
        println!("{COMPLETION_MESSAGE}");
    }
    println!("{}", describe_stats(&session.stats()));
    println!(
        "session {} - {} ({}s)",
        started_at.format("%H:%M:%S"),
        finished_at.format("%H:%M:%S"),
        (finished_at - started_at).num_seconds()
    );
    tracing::info!(
        learned = session.store().learned_count(),
        pending = session.store().pending_count(),
        audio_played = session.audio().played(),
        "session ended"
    );

    Ok(())
}

/// Apply one command and describe the result.
pub fn execute<S, A>(session: &mut StudySession<S, A>, command: Command, now_ms: u64) -> String
where
    S: WordSource + LearnedSink,
    A: AudioPlayer,
{
    session.advance(now_ms);
    let message = match command {
        Command::Tap => {
            if session.tap(now_ms) {
                "flipping..."
            } else {
                "the front card is already face up"
            }
        }
        Command::Drag { dx, dy } => {
            if session.drag_update(dx, dy, now_ms) {
                "dragging"
            } else {
                "tap the card and wait for it to turn first"
            }
        }
        Command::Release => release_message(session.drag_end(now_ms)),
        Command::Swipe { dx } => {
            if session.drag_update(dx, 0.0, now_ms) {
                release_message(session.drag_end(now_ms))
            } else {
                "tap the card and wait for it to turn first"
            }
        }
        Command::Play => {
            if session.play_audio(now_ms) {
                "playing"
            } else {
                "nothing to play"
            }
        }
        Command::Stats => return describe_stats(&session.stats()),
        Command::Help => return HELP.to_string(),
        Command::Show => "",
        Command::Quit => return String::new(),
    };

    let view = describe(&render(session, now_ms));
    if message.is_empty() {
        view
    } else {
        format!("{message}\n{view}")
    }
}

fn release_message(outcome: ReleaseOutcome) -> &'static str {
    match outcome {
        ReleaseOutcome::Ignored => "nothing to release",
        ReleaseOutcome::Cancelled => "not far enough, the card springs back",
        ReleaseOutcome::Committed(Decision::Remember) => "I know it",
        ReleaseOutcome::Committed(Decision::DoNotRemember) => "learn again",
    }
}
