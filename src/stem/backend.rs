// Stemmer backends — the closed set of algorithms a stem step can name.
//
// The algorithm itself lives in the `rust-stemmers` crate. This module only
// maps a stemmer name to a backend and hands that backend the step's
// options untouched, once per apply.

use rust_stemmers::{Algorithm, Stemmer};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Result, StepError};

/// Algorithm-specific options, passed through verbatim from the step.
pub type StemOptions = Map<String, Value>;

/// A configured stemmer: one output token per input token.
pub trait TokenStemmer: Send + Sync {
    fn stem_tokens(&self, tokens: &[String]) -> Vec<String>;
}

/// A resolved backend: validates the options once and returns a stemmer.
pub type StemFn = fn(&StemOptions) -> Result<Box<dyn TokenStemmer>>;

/// Stemmer names accepted by `resolve_stemmer`.
pub const SUPPORTED_STEMMERS: &[&str] = &["snowball"];

/// The default stemmer for new steps.
pub const DEFAULT_STEMMER: &str = "snowball";

/// Look up the backend for a stemmer name.
pub fn resolve_stemmer(name: &str) -> Result<StemFn> {
    match name {
        "snowball" => Ok(snowball as StemFn),
        other => Err(StepError::Configuration(format!(
            "unsupported stemmer `{other}`; supported stemmers: {}",
            SUPPORTED_STEMMERS.join(", ")
        ))),
    }
}

/// Snowball stemming via `rust-stemmers`.
pub struct SnowballStemmer {
    stemmer: Stemmer,
}

impl TokenStemmer for SnowballStemmer {
    /// Tokens are not case-folded.
    fn stem_tokens(&self, tokens: &[String]) -> Vec<String> {
        tokens
            .iter()
            .map(|token| self.stemmer.stem(token).into_owned())
            .collect()
    }
}

/// Build a snowball stemmer from the `language` option (default "english").
///
/// Every other key is ignored.
pub fn snowball(options: &StemOptions) -> Result<Box<dyn TokenStemmer>> {
    let algorithm = snowball_algorithm(options)?;
    Ok(Box::new(SnowballStemmer {
        stemmer: Stemmer::create(algorithm),
    }))
}

fn snowball_algorithm(options: &StemOptions) -> Result<Algorithm> {
    let language = match options.get("language") {
        None | Some(Value::Null) => "english",
        Some(Value::String(s)) => s.as_str(),
        Some(other) => {
            return Err(StepError::Configuration(format!(
                "snowball option `language` must be a string, got {other}"
            )))
        }
    };

    let algorithm = parse_language(language).ok_or_else(|| {
        StepError::Configuration(format!(
            "snowball does not support language `{language}`; supported languages: {}",
            SNOWBALL_LANGUAGES.join(", ")
        ))
    })?;
    debug!(language, "Resolved snowball algorithm");
    Ok(algorithm)
}

/// Languages understood by the snowball backend.
pub const SNOWBALL_LANGUAGES: &[&str] = &[
    "arabic",
    "danish",
    "dutch",
    "english",
    "finnish",
    "french",
    "german",
    "greek",
    "hungarian",
    "italian",
    "norwegian",
    "porter",
    "portuguese",
    "romanian",
    "russian",
    "spanish",
    "swedish",
    "tamil",
    "turkish",
];

fn parse_language(value: &str) -> Option<Algorithm> {
    let algorithm = match value.to_lowercase().as_str() {
        "arabic" | "ar" => Algorithm::Arabic,
        "danish" | "da" => Algorithm::Danish,
        "dutch" | "nl" => Algorithm::Dutch,
        // "porter" has no separate implementation; English is Porter2.
        "english" | "en" | "porter" => Algorithm::English,
        "finnish" | "fi" => Algorithm::Finnish,
        "french" | "fr" => Algorithm::French,
        "german" | "de" => Algorithm::German,
        "greek" | "el" => Algorithm::Greek,
        "hungarian" | "hu" => Algorithm::Hungarian,
        "italian" | "it" => Algorithm::Italian,
        "norwegian" | "no" => Algorithm::Norwegian,
        "portuguese" | "pt" => Algorithm::Portuguese,
        "romanian" | "ro" => Algorithm::Romanian,
        "russian" | "ru" => Algorithm::Russian,
        "spanish" | "es" => Algorithm::Spanish,
        "swedish" | "sv" => Algorithm::Swedish,
        "tamil" | "ta" => Algorithm::Tamil,
        "turkish" | "tr" => Algorithm::Turkish,
        _ => return None,
    };
    Some(algorithm)
}
