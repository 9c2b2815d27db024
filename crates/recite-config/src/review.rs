use std::env;

use serde::{Deserialize, Serialize};

/// Wrong-word review policy.
///
/// A miss always resets the streak to zero; an incorrect answer on a word
/// already in the pool decrements the streak, floored at zero. The word
/// leaves the pool after `mastery_threshold` consecutive correct answers.
#[derive(Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Consecutive correct answers needed to retire a word
    pub mastery_threshold: u32,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewConfig {
    pub fn new() -> Self {
        let mastery_threshold = env::var("RECITE_MASTERY_THRESHOLD")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3);

        Self { mastery_threshold }
    }
}
