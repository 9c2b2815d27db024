mod cache;
mod probe;

pub use cache::{SpeechCache, TtsError};
pub use probe::{AudioHandle, AudioProber, HttpProber, ProbeError};
