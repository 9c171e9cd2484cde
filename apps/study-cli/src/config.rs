//! Environment configuration for the study CLI.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file in the working directory.

use anyhow::{Context, Result};
use std::path::PathBuf;
use word_deck_core::DeckSettings;

const DEFAULT_WORDS_FILE: &str = "words.json";
const DEFAULT_VIEWPORT_WIDTH: f32 = 600.0;
const DEFAULT_TICK_MS: u64 = 50;

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub words_file: PathBuf,
    pub viewport_width: f32,
    /// Fixed RNG seed; a random one is drawn when unset.
    pub seed: Option<u64>,
    /// Interval at which the animation timeline is advanced.
    pub tick_ms: u64,
    pub settings: DeckSettings,
}

impl CliConfig {
    /// Read configuration from `.env` and the environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let words_file = lookup("WORD_DECK_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_WORDS_FILE));

        let viewport_width = match lookup("WORD_DECK_VIEWPORT_WIDTH") {
            Some(raw) => raw
                .parse::<f32>()
                .with_context(|| format!("WORD_DECK_VIEWPORT_WIDTH is not a number: {raw}"))?,
            None => DEFAULT_VIEWPORT_WIDTH,
        };

        let seed = lookup("WORD_DECK_SEED")
            .map(|raw| {
                raw.parse::<u64>()
                    .with_context(|| format!("WORD_DECK_SEED is not an integer: {raw}"))
            })
            .transpose()?;

        let tick_ms = match lookup("WORD_DECK_TICK_MS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("WORD_DECK_TICK_MS is not an integer: {raw}"))?,
            None => DEFAULT_TICK_MS,
        };
        anyhow::ensure!(tick_ms > 0, "WORD_DECK_TICK_MS must be positive");

        let settings = match lookup("WORD_DECK_SETTINGS") {
            Some(path) => {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading settings file {path}"))?;
                serde_json::from_str::<DeckSettings>(&content)
                    .with_context(|| format!("parsing settings file {path}"))?
            }
            None => DeckSettings::default(),
        };
        settings.validate()?;

        Ok(Self {
            words_file,
            viewport_width,
            seed,
            tick_ms,
            settings,
        })
    }
}
