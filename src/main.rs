use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;
use tracing::info;

use stemstep::config::Config;
use stemstep::data::{Dataset, Schema, Selector};
use stemstep::output::terminal;
use stemstep::stem::{resolve_stemmer, StemOptions};
use stemstep::steps::StemStep;

/// stemstep: stem tokenized text columns.
///
/// Train a stem step against a JSON dataset, apply the saved step to new
/// data, or inspect what a saved step will do.
#[derive(Parser)]
#[command(name = "stemstep", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a stem step on a dataset and save it as JSON
    Prep {
        /// Training dataset (JSON)
        #[arg(long)]
        data: PathBuf,

        /// Column selectors, e.g. `text` or `ends_with(_tok)`
        #[arg(long, num_args = 1.., required = true)]
        columns: Vec<String>,

        /// Stemmer name (default from STEMSTEP_STEMMER)
        #[arg(long)]
        stemmer: Option<String>,

        /// Snowball language (default from STEMSTEP_LANGUAGE)
        #[arg(long)]
        language: Option<String>,

        /// Column roles as column=role, usable with has_role(..)
        #[arg(long = "role")]
        roles: Vec<String>,

        /// Leave this step out when baking new data
        #[arg(long)]
        skip: bool,

        /// Where to write the trained step
        #[arg(long)]
        out: PathBuf,
    },

    /// Apply a trained step to a dataset
    Bake {
        /// Trained step (JSON from `prep`)
        #[arg(long)]
        step: PathBuf,

        /// Dataset to transform (JSON)
        #[arg(long)]
        data: PathBuf,

        /// Write the result here instead of printing a preview
        #[arg(long)]
        out: Option<PathBuf>,

        /// Rows to show in the preview (default: 10)
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Show the tidy summary of a saved step
    Describe {
        /// Step JSON (trained or not)
        #[arg(long)]
        step: PathBuf,
    },

    /// Stem words given on the command line
    Stem {
        /// Words to stem
        #[arg(required = true)]
        words: Vec<String>,

        /// Snowball language (default from STEMSTEP_LANGUAGE)
        #[arg(long)]
        language: Option<String>,
    },
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("stemstep=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Prep {
            data,
            columns,
            stemmer,
            language,
            roles,
            skip,
            out,
        } => {
            let dataset = read_dataset(&data)?;

            let mut schema = Schema::from_dataset(&dataset);
            for pair in &roles {
                let (column, role) = pair
                    .split_once('=')
                    .with_context(|| format!("--role expects column=role, got {pair:?}"))?;
                schema = schema.with_role(column.trim(), role.trim());
            }

            let selectors = columns
                .iter()
                .map(|c| c.parse::<Selector>())
                .collect::<Result<Vec<_>, _>>()?;

            let step = StemStep::new(selectors)
                .stemmer(stemmer.unwrap_or_else(|| config.stemmer.clone()))
                .options(language_options(language.unwrap_or_else(|| config.language.clone())))
                .skip(skip);

            let trained = step.train(&dataset, &schema)?;
            fs::write(&out, serde_json::to_string_pretty(&trained)?)
                .with_context(|| format!("writing {}", out.display()))?;

            info!(path = %out.display(), "Saved trained step");
            trained.print(&mut std::io::stdout(), config.width)?;
            terminal::display_tidy(&trained.describe());
        }

        Commands::Bake {
            step,
            data,
            out,
            limit,
        } => {
            let step = read_step(&step)?;
            let dataset = read_dataset(&data)?;
            let baked = step.apply(&dataset)?;

            match out {
                Some(path) => {
                    fs::write(&path, serde_json::to_string_pretty(&baked)?)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!(
                        "Baked {} rows into {}",
                        baked.n_rows(),
                        path.display().to_string().bold()
                    );
                }
                None => terminal::display_dataset(&baked, limit),
            }
        }

        Commands::Describe { step } => {
            let step = read_step(&step)?;
            step.print(&mut std::io::stdout(), config.width)?;
            terminal::display_tidy(&step.describe());
        }

        Commands::Stem { words, language } => {
            let build = resolve_stemmer(&config.stemmer)?;
            let options = language_options(language.unwrap_or_else(|| config.language.clone()));
            let stems = build(&options)?.stem_tokens(&words);
            for (word, stemmed) in words.iter().zip(&stems) {
                println!("  {:<24} {}", word, stemmed.green());
            }
        }
    }

    Ok(())
}

fn language_options(language: String) -> StemOptions {
    let mut options = StemOptions::new();
    options.insert("language".to_string(), Value::String(language));
    options
}

fn read_dataset(path: &Path) -> Result<Dataset> {
    let json =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(Dataset::from_json(&json)?)
}

fn read_step(path: &Path) -> Result<StemStep> {
    let json =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing step {}", path.display()))
}
