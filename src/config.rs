use std::env;

use anyhow::{Context, Result};

use crate::stem::DEFAULT_STEMMER;

/// Width used when rendering column lists, unless overridden.
pub const DEFAULT_WIDTH: usize = 60;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every
/// value has a default, so an empty environment is valid.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Stemmer name for new steps (STEMSTEP_STEMMER).
    pub stemmer: String,
    /// Snowball language for new steps (STEMSTEP_LANGUAGE).
    pub language: String,
    /// Character budget for rendered column lists (STEMSTEP_WIDTH).
    pub width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stemmer: DEFAULT_STEMMER.to_string(),
            language: "english".to_string(),
            width: DEFAULT_WIDTH,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the environment, in `load`).
    ///
    /// The stemmer name is not checked here; unsupported names fail when a
    /// step is applied.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let width = match lookup("STEMSTEP_WIDTH") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("STEMSTEP_WIDTH must be a positive integer, got {raw:?}"))?,
            None => defaults.width,
        };
        if width == 0 {
            anyhow::bail!("STEMSTEP_WIDTH must be at least 1");
        }

        Ok(Self {
            stemmer: lookup("STEMSTEP_STEMMER").unwrap_or(defaults.stemmer),
            language: lookup("STEMSTEP_LANGUAGE").unwrap_or(defaults.language),
            width,
        })
    }
}
