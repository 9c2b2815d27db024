use std::sync::Arc;

use recite_config::tts::TtsConfig;
use recite_storage::KeyValueStore;

use crate::probe::{AudioHandle, AudioProber, ProbeError};

const CACHE_KEY_PREFIX: &str = "tts_";
const SPEECH_PATH: &str = "/v1/audio/speech";

#[derive(Debug, thiserror::Error)]
pub enum TtsError {
    /// The one error shown to the user; always transient, never a data
    /// problem, so the message invites a retry.
    #[error("无法获取语音，请检查网络连接或稍后重试")]
    ServiceUnavailable(#[source] ProbeError),

    #[error("invalid TTS endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

/// Resolves text to playable audio, caching validated URLs in the
/// key-value store under `"tts_" + text`.
///
/// Concurrent resolutions of the same text are not deduplicated; the last
/// cache write wins. Callers drive one resolution per key at a time.
pub struct SpeechCache {
    store: Arc<dyn KeyValueStore>,
    prober: Arc<dyn AudioProber>,
    config: TtsConfig,
}

impl SpeechCache {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        prober: Arc<dyn AudioProber>,
        config: TtsConfig,
    ) -> Self {
        Self {
            store,
            prober,
            config,
        }
    }

    /// Resolve `text` to audio: reuse a cached URL when it still plays,
    /// evict it and fall back to a fresh request when it does not. A fresh
    /// URL is cached only after it has been probed successfully.
    pub async fn resolve_audio(&self, text: &str) -> Result<AudioHandle, TtsError> {
        let key = cache_key(text);

        if let Some(cached_url) = self.store.get(&key) {
            match self.prober.probe(&cached_url).await {
                Ok(handle) => {
                    tracing::debug!("tts cache hit for {text:?}");
                    return Ok(handle);
                }
                Err(e) => {
                    tracing::debug!("evicting stale tts url for {text:?}: {e}");
                    self.store.remove(&key);
                }
            }
        }

        let url = self.request_url(text)?;
        match self.prober.probe(&url).await {
            Ok(handle) => {
                self.store.set(&key, &url);
                Ok(handle)
            }
            Err(e) => {
                tracing::error!("tts resolution failed for {text:?}: {e}");
                Err(TtsError::ServiceUnavailable(e))
            }
        }
    }

    /// Build the speech request URL for `text` with the configured voice
    /// and rate. The query builder percent-encodes, so the key stays
    /// injective for any input text.
    fn request_url(&self, text: &str) -> Result<String, TtsError> {
        let invalid = |reason: String| TtsError::InvalidEndpoint {
            endpoint: self.config.endpoint.clone(),
            reason,
        };

        let base =
            reqwest::Url::parse(&self.config.endpoint).map_err(|e| invalid(e.to_string()))?;
        let mut url = base
            .join(SPEECH_PATH)
            .map_err(|e| invalid(e.to_string()))?;

        url.query_pairs_mut()
            .append_pair("input", text)
            .append_pair("voice", &self.config.voice)
            .append_pair("rate", &self.config.rate.to_string());

        Ok(url.into())
    }
}

fn cache_key(text: &str) -> String {
    format!("{CACHE_KEY_PREFIX}{text}")
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use recite_storage::MemoryStore;

    use super::*;

    /// Prober that records every probed URL and fails the ones marked bad.
    #[derive(Default)]
    struct FakeProber {
        bad: Mutex<HashSet<String>>,
        probed: Mutex<Vec<String>>,
    }

    impl FakeProber {
        fn mark_bad(&self, url: &str) {
            self.bad.lock().unwrap().insert(url.to_string());
        }

        fn probed(&self) -> Vec<String> {
            self.probed.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl AudioProber for FakeProber {
        async fn probe(&self, url: &str) -> Result<AudioHandle, ProbeError> {
            self.probed.lock().unwrap().push(url.to_string());
            if self.bad.lock().unwrap().contains(url) {
                return Err(ProbeError::BadStatus(404));
            }
            Ok(AudioHandle {
                url: url.to_string(),
                bytes: vec![0xff],
                content_type: Some("audio/mpeg".to_string()),
            })
        }
    }

    fn config() -> TtsConfig {
        TtsConfig {
            endpoint: "https://tts.example.org".to_string(),
            voice: "zh-CN-YunxiaNeural".to_string(),
            rate: -30,
            probe_timeout_ms: 100,
        }
    }

    fn cache_with(
        store: Arc<MemoryStore>,
        prober: Arc<FakeProber>,
    ) -> SpeechCache {
        SpeechCache::new(store, prober, config())
    }

    #[tokio::test]
    async fn first_resolution_builds_url_and_caches_it() {
        let store = Arc::new(MemoryStore::new());
        let prober = Arc::new(FakeProber::default());
        let cache = cache_with(store.clone(), prober.clone());

        let handle = cache.resolve_audio("hello").await.unwrap();

        assert_eq!(
            handle.url,
            "https://tts.example.org/v1/audio/speech?input=hello&voice=zh-CN-YunxiaNeural&rate=-30"
        );
        assert_eq!(store.get("tts_hello"), Some(handle.url.clone()));
    }

    #[tokio::test]
    async fn second_resolution_hits_the_cache() {
        let store = Arc::new(MemoryStore::new());
        let prober = Arc::new(FakeProber::default());
        let cache = cache_with(store.clone(), prober.clone());

        let first = cache.resolve_audio("hello").await.unwrap();
        let second = cache.resolve_audio("hello").await.unwrap();

        assert_eq!(first.url, second.url);
        // one fresh construction plus one cached probe, nothing more
        assert_eq!(prober.probed().len(), 2);
        assert_eq!(prober.probed()[0], prober.probed()[1]);
    }

    #[tokio::test]
    async fn stale_cache_entry_is_evicted_and_replaced() {
        let store = Arc::new(MemoryStore::new());
        let prober = Arc::new(FakeProber::default());
        let cache = cache_with(store.clone(), prober.clone());

        store.set("tts_hello", "https://old.example.org/expired");
        prober.mark_bad("https://old.example.org/expired");

        let handle = cache.resolve_audio("hello").await.unwrap();

        assert!(handle.url.starts_with("https://tts.example.org/"));
        assert_eq!(store.get("tts_hello"), Some(handle.url.clone()));
        // stale probe first, fresh probe second
        assert_eq!(prober.probed().len(), 2);
    }

    #[tokio::test]
    async fn failed_fresh_probe_surfaces_error_and_caches_nothing() {
        let store = Arc::new(MemoryStore::new());
        let prober = Arc::new(FakeProber::default());
        let cache = cache_with(store.clone(), prober.clone());

        prober.mark_bad(
            "https://tts.example.org/v1/audio/speech?input=hello&voice=zh-CN-YunxiaNeural&rate=-30",
        );

        let err = cache.resolve_audio("hello").await.unwrap_err();
        assert!(matches!(err, TtsError::ServiceUnavailable(_)));
        assert!(store.get("tts_hello").is_none());
    }

    #[tokio::test]
    async fn query_encoding_keeps_distinct_texts_distinct() {
        let store = Arc::new(MemoryStore::new());
        let prober = Arc::new(FakeProber::default());
        let cache = cache_with(store.clone(), prober.clone());

        cache.resolve_audio("a b").await.unwrap();
        cache.resolve_audio("a&b").await.unwrap();

        let probed = prober.probed();
        assert_ne!(probed[0], probed[1]);
        assert!(store.get("tts_a b").is_some());
        assert!(store.get("tts_a&b").is_some());
    }

    #[tokio::test]
    async fn chinese_text_resolves_and_caches_under_raw_key() {
        let store = Arc::new(MemoryStore::new());
        let prober = Arc::new(FakeProber::default());
        let cache = cache_with(store.clone(), prober.clone());

        cache.resolve_audio("苹果").await.unwrap();

        // raw text in the storage key, percent-encoded text on the wire
        let cached = store.get("tts_苹果").unwrap();
        assert!(cached.contains("input=%E8%8B%B9%E6%9E%9C"));
    }
}
