use std::time::Duration;

/// Audio confirmed ready for playback.
#[derive(Debug, Clone)]
pub struct AudioHandle {
    /// The URL the audio was fetched from
    pub url: String,
    /// Raw audio bytes, ready to hand to a player
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("audio request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("audio endpoint returned status {0}")]
    BadStatus(u16),

    #[error("audio response was empty")]
    EmptyBody,

    #[error("audio probe timed out after {0:?}")]
    Timeout(Duration),
}

/// Confirm a media URL currently yields playable audio.
#[async_trait::async_trait]
pub trait AudioProber: Send + Sync {
    async fn probe(&self, url: &str) -> Result<AudioHandle, ProbeError>;
}

/// Probes by fetching the URL over HTTP. A probe that succeeds also yields
/// the audio itself, so a cache hit costs exactly one request.
pub struct HttpProber {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpProber {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    async fn fetch(&self, url: &str) -> Result<AudioHandle, ProbeError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::BadStatus(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(ProbeError::EmptyBody);
        }

        Ok(AudioHandle {
            url: url.to_string(),
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

#[async_trait::async_trait]
impl AudioProber for HttpProber {
    async fn probe(&self, url: &str) -> Result<AudioHandle, ProbeError> {
        // The endpoint may simply never answer; a timed-out probe counts as
        // a failed one.
        match tokio::time::timeout(self.timeout, self.fetch(url)).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout(self.timeout)),
        }
    }
}
