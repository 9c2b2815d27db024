use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use recite_config::Config;
use recite_storage::{JsonFileStore, KeyValueStore};
use recite_tts::{HttpProber, SpeechCache};
use recite_types::{Unit, WordItem};
use recite_words::WrongWordStore;
use tracing_subscriber::EnvFilter;

pub mod cli;
pub mod drill;


use self::cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_profile(path)
            .with_context(|| format!("failed to load config profile {}", path.display()))?,
        None => Config::new(),
    };

    let backend: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::open(&config.storage.path));
    let words = WrongWordStore::new(backend.clone(), &config.review);

    match cli.command {
        Command::List { owner } => {
            let entries = words.wrong_words(&owner);
            if entries.is_empty() {
                println!("no wrong words for {owner}");
            }
            for entry in entries {
                println!(
                    "{}\t{}\t(streak {})",
                    entry.name, entry.description, entry.correct_count
                );
            }
        }

        Command::Clear { owner } => {
            words.clear_wrong_words(&owner);
            println!("cleared wrong words for {owner}");
        }

        Command::Drill {
            data,
            unit,
            wrong_words,
            owner,
        } => {
            let (drill_words, drill_owner, retry_pool) = if wrong_words {
                let owner = owner.context("--wrong-words requires --owner")?;
                let pool: Vec<WordItem> = words
                    .wrong_words(&owner)
                    .into_iter()
                    .map(|entry| WordItem {
                        name: entry.name,
                        description: entry.description,
                        owner: Some(entry.owner),
                    })
                    .collect();
                (pool, owner, true)
            } else {
                let path = data.context("either --data or --wrong-words is required")?;
                let units = load_units(&path)?;
                let selected = match &unit {
                    Some(name) => units
                        .iter()
                        .find(|u| u.name() == name.as_str())
                        .with_context(|| format!("no unit named {name:?} in {}", path.display()))?,
                    None => units.first().context("unit data file is empty")?,
                };
                let drill_owner = owner.unwrap_or_else(|| selected.owner().to_string());
                (drill::unit_words(selected), drill_owner, false)
            };

            if drill_words.is_empty() {
                println!("nothing to drill");
                return Ok(());
            }

            let stdin = io::stdin();
            drill::run_drill(
                &drill_words,
                &drill_owner,
                &words,
                retry_pool,
                stdin.lock(),
                io::stdout(),
            )?;
        }

        Command::Say { text } => {
            let timeout = Duration::from_millis(config.tts.probe_timeout_ms);
            let prober = Arc::new(HttpProber::new(timeout));
            let cache = SpeechCache::new(backend, prober, config.tts.clone());

            match cache.resolve_audio(&text).await {
                Ok(handle) => {
                    tracing::info!("resolved {} bytes", handle.bytes.len());
                    println!("{}", handle.url);
                }
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

/// Load an array of units from a JSON data file.
fn load_units(path: &Path) -> anyhow::Result<Vec<Unit>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open unit data {}", path.display()))?;
    let units = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse unit data {}", path.display()))?;
    Ok(units)
}
