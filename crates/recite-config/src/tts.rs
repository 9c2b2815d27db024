use std::env;

use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    /// Base URL of the speech endpoint
    pub endpoint: String,
    /// Fixed voice identifier sent with every request
    pub voice: String,
    /// Speech rate adjustment, negative = slower
    pub rate: i32,
    /// Upper bound on a single playability probe
    pub probe_timeout_ms: u64,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TtsConfig {
    pub fn new() -> Self {
        let endpoint = env::var("RECITE_TTS_ENDPOINT")
            .unwrap_or_else(|_| "https://tts.mzzsfy.eu.org".to_string());

        let voice =
            env::var("RECITE_TTS_VOICE").unwrap_or_else(|_| "zh-CN-YunxiaNeural".to_string());

        let rate = env::var("RECITE_TTS_RATE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(-30);

        let probe_timeout_ms = env::var("RECITE_TTS_PROBE_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8000); // 8 seconds default

        Self {
            endpoint,
            voice,
            rate,
            probe_timeout_ms,
        }
    }
}
