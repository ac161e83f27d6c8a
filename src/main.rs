use std::{
    fs::OpenOptions,
    io::BufWriter,
    sync::Arc,
    time::Instant,
};

use anyhow::{Context, Result};
use tokio::time::MissedTickBehavior;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use wordfall::{
    config::Config,
    dictionary::Dictionary,
    game::GameSession,
    input::spawn_stdin_reader,
    ports::KeyFrameState,
    presenter::TracingPresenter,
    telemetry::JsonLinesSink,
};

/// Buffered input events between the stdin reader and the game loop
const INPUT_CHANNEL_CAPACITY: usize = 64;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wordfall=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting wordfall...");

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    let dictionary = match Dictionary::load(&config.host.dictionary_path).await {
        Ok(dict) => dict,
        Err(e) => {
            tracing::warn!("Failed to load dictionary: {}. Every word will be rejected.", e);
            tracing::warn!(
                "Put a word list at {} for full functionality",
                config.host.dictionary_path.display()
            );
            Dictionary::empty()
        }
    };

    let game_id = Uuid::new_v4();
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.host.telemetry_path)
        .with_context(|| {
            format!(
                "Failed to open telemetry log {}",
                config.host.telemetry_path.display()
            )
        })?;
    let telemetry = JsonLinesSink::new(
        BufWriter::new(log_file),
        game_id,
        config.game.radius_x,
        config.game.radius_y,
    );

    let mut session = GameSession::new(&config.game, Arc::new(dictionary))
        .with_id(game_id)
        .with_presenter(Box::new(TracingPresenter))
        .with_telemetry(Box::new(telemetry));

    tracing::info!(
        "Game {} started: {}x{} board, {:?} mode",
        game_id,
        session.grid().width(),
        session.grid().height(),
        session.mode()
    );
    session.key_frame(KeyFrameState::GameStart);

    let (mut events, reader) = spawn_stdin_reader(INPUT_CHANNEL_CAPACITY);

    let mut ticker = tokio::time::interval(config.host.tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_tick = Instant::now();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Instant::now();
                session.tick(now - last_tick);
                last_tick = now;
            }
            event = events.recv() => {
                let Some(event) = event else {
                    tracing::info!("Input closed");
                    break;
                };
                if let Some(commit) = session.handle_input(event) {
                    tracing::info!("Played {} for {} points", commit.word, commit.points);
                }
                match serde_json::to_string(&session.snapshot()) {
                    Ok(json) => println!("{}", json),
                    Err(e) => tracing::error!("Failed to serialize snapshot: {}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    session.key_frame(KeyFrameState::GameEnd);

    let stats = session.stats();
    tracing::info!(
        "Game {} over: score {}, {} words, {} interactions",
        game_id,
        session.score(),
        stats.words_played,
        stats.interactions
    );

    // A pending blocking stdin read keeps the runtime from shutting down
    if !reader.is_finished() {
        drop(session);
        std::process::exit(0);
    }

    Ok(())
}
