use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::game::{
    grid::{DEFAULT_RADIUS_X, DEFAULT_RADIUS_Y, MAX_RADIUS},
    policy::DEFAULT_MIN_WORD_LENGTH,
    InteractionMode, ScoringRule, DEFAULT_FALL_SPEED,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub game: SessionConfig,
    pub host: HostConfig,
}

/// Everything a single game session needs to start.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionConfig {
    pub radius_x: u32,
    pub radius_y: u32,
    pub fall_speed: Duration,
    pub interaction_mode: InteractionMode,
    pub min_word_length: usize,
    pub scoring: ScoringRule,
    pub auto_refill: bool,
    pub rng_seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            radius_x: DEFAULT_RADIUS_X,
            radius_y: DEFAULT_RADIUS_Y,
            fall_speed: DEFAULT_FALL_SPEED,
            interaction_mode: InteractionMode::default(),
            min_word_length: DEFAULT_MIN_WORD_LENGTH,
            scoring: ScoringRule::default(),
            auto_refill: true,
            rng_seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HostConfig {
    pub tick_interval: Duration,
    pub dictionary_path: PathBuf,
    pub telemetry_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let game = SessionConfig {
            radius_x: var("GRID_WIDTH_RADIUS", "5")
                .parse()
                .context("GRID_WIDTH_RADIUS must be a number")?,
            radius_y: var("GRID_HEIGHT_RADIUS", "4")
                .parse()
                .context("GRID_HEIGHT_RADIUS must be a number")?,
            fall_speed: Duration::from_millis(
                var("FALL_SPEED_MS", "50")
                    .parse()
                    .context("FALL_SPEED_MS must be a number")?,
            ),
            interaction_mode: var("INTERACTION_MODE", "swipe")
                .parse()
                .map_err(anyhow::Error::msg)
                .context("INTERACTION_MODE must be tap or swipe")?,
            min_word_length: var("MIN_WORD_LENGTH", "3")
                .parse()
                .context("MIN_WORD_LENGTH must be a number")?,
            scoring: var("SCORING_RULE", "length")
                .parse()
                .map_err(anyhow::Error::msg)
                .context("SCORING_RULE must be length or letters")?,
            auto_refill: var("AUTO_REFILL", "true")
                .parse()
                .context("AUTO_REFILL must be true or false")?,
            rng_seed: lookup("RNG_SEED")
                .map(|seed| seed.parse())
                .transpose()
                .context("RNG_SEED must be a number")?,
        };

        let host = HostConfig {
            tick_interval: Duration::from_millis(
                var("TICK_INTERVAL_MS", "16")
                    .parse()
                    .context("TICK_INTERVAL_MS must be a number")?,
            ),
            dictionary_path: var("DICTIONARY_PATH", "./dictionary.txt").into(),
            telemetry_path: var("TELEMETRY_PATH", "./telemetry.jsonl").into(),
        };

        ensure!(
            game.radius_x <= MAX_RADIUS && game.radius_y <= MAX_RADIUS,
            "GRID_WIDTH_RADIUS and GRID_HEIGHT_RADIUS must be at most {}",
            MAX_RADIUS
        );
        ensure!(
            !host.tick_interval.is_zero(),
            "TICK_INTERVAL_MS must be greater than zero"
        );

        Ok(Config { game, host })
    }
}
