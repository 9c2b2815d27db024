use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use self::review::ReviewConfig;
use self::storage::StorageConfig;
use self::tts::TtsConfig;

pub mod review;
pub mod storage;
pub mod tts;

#[derive(Default, Serialize, Deserialize)]
pub struct Config {
    pub tts: TtsConfig,
    pub review: ReviewConfig,
    pub storage: StorageConfig,
}

impl Config {
    pub fn new() -> Self {
        Config {
            tts: TtsConfig::new(),
            review: ReviewConfig::new(),
            storage: StorageConfig::new(),
        }
    }

    /// Load a config profile from a JSON file, e.g. a repo-local `config.json`
    pub fn load_profile(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let config = serde_json::from_reader(reader)?;
        Ok(config)
    }
}
