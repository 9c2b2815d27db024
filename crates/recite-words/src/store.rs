use std::collections::BTreeMap;
use std::sync::Arc;

use recite_config::review::ReviewConfig;
use recite_storage::KeyValueStore;
use recite_types::{WordItem, WrongWordEntry};

const STORAGE_KEY: &str = "recite-wrong-words";
const LEGACY_KEY: &str = "wrongWords";

type WrongWordsMap = BTreeMap<String, Vec<WrongWordEntry>>;

/// Tracks missed words per owner and retires them once a streak of
/// consecutive correct answers reaches the mastery threshold.
///
/// Every operation is a full read-modify-write of one serialized map under
/// [`STORAGE_KEY`]. Malformed persisted data degrades to an empty map and
/// is never surfaced to callers.
pub struct WrongWordStore {
    store: Arc<dyn KeyValueStore>,
    mastery_threshold: u32,
}

impl WrongWordStore {
    /// Construct the store and run the one-time legacy-key migration.
    pub fn new(store: Arc<dyn KeyValueStore>, review: &ReviewConfig) -> Self {
        let this = Self {
            store,
            mastery_threshold: review.mastery_threshold.max(1),
        };
        this.migrate_legacy_data();
        this
    }

    /// Words currently in `owner`'s retry pool. Empty when the owner is
    /// unknown or the persisted blob is missing or corrupt.
    pub fn wrong_words(&self, owner: &str) -> Vec<WrongWordEntry> {
        self.read_map().remove(owner).unwrap_or_default()
    }

    /// Record a miss. New words enter the pool with a zero streak; a word
    /// already in the pool has its streak reset to zero. Idempotent under
    /// repeated misses.
    pub fn add_wrong_word(&self, word: &WordItem, owner: &str) {
        let mut map = self.read_map();
        let list = map.entry(owner.to_string()).or_default();

        match list.iter_mut().find(|w| w.name == word.name) {
            Some(existing) => existing.correct_count = 0,
            None => list.push(WrongWordEntry::new(word, owner)),
        }

        self.write_map(&map);
    }

    /// Record an answer for a word already in the pool. A correct answer
    /// extends the streak and retires the word at the mastery threshold; an
    /// incorrect answer decrements the streak, floored at zero. Unknown
    /// owner or word is a silent no-op.
    pub fn update_correct_count(&self, owner: &str, name: &str, is_correct: bool) {
        let mut map = self.read_map();
        let Some(list) = map.get_mut(owner) else {
            return;
        };
        let Some(index) = list.iter().position(|w| w.name == name) else {
            return;
        };

        if is_correct {
            list[index].correct_count += 1;
            if list[index].correct_count >= self.mastery_threshold {
                let retired = list.remove(index);
                tracing::info!("word mastered, leaving retry pool: {}", retired.name);
            }
        } else {
            list[index].correct_count = list[index].correct_count.saturating_sub(1);
        }

        self.write_map(&map);
    }

    /// Empty `owner`'s retry pool, leaving other owners untouched.
    pub fn clear_wrong_words(&self, owner: &str) {
        let mut map = self.read_map();
        map.insert(owner.to_string(), Vec::new());
        self.write_map(&map);
    }

    /// Merge the flat legacy map into the current key, then drop the legacy
    /// key. Legacy lists win per owner. Idempotent: a second run finds no
    /// legacy key and does nothing.
    fn migrate_legacy_data(&self) {
        let Some(raw) = self.store.get(LEGACY_KEY) else {
            return;
        };

        let legacy: WrongWordsMap = match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(e) => {
                tracing::error!("failed to migrate legacy wrong words: {e}");
                return;
            }
        };

        let mut merged = self.read_map();
        for (owner, entries) in legacy {
            merged.insert(owner, entries);
        }

        self.write_map(&merged);
        self.store.remove(LEGACY_KEY);
        tracing::info!("migrated legacy wrong-word data");
    }

    fn read_map(&self) -> WrongWordsMap {
        let Some(raw) = self.store.get(STORAGE_KEY) else {
            return WrongWordsMap::new();
        };

        match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!("corrupt wrong-word map, starting empty: {e}");
                WrongWordsMap::new()
            }
        }
    }

    fn write_map(&self, map: &WrongWordsMap) {
        match serde_json::to_string(map) {
            Ok(raw) => self.store.set(STORAGE_KEY, &raw),
            Err(e) => tracing::error!("failed to serialize wrong-word map: {e}"),
        }
    }
}
