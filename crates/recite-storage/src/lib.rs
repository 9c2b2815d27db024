mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Persistent string key-value storage.
///
/// The interface is deliberately infallible, matching browser-style local
/// storage: backends swallow and log their own IO problems and degrade to
/// the empty state rather than propagating errors to the stores built on
/// top. Every mutation rewrites the backing blob in full; the model assumes
/// a single logical writer (see crate consumers for the concurrency
/// contract).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}
