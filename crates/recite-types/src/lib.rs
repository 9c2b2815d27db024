pub mod types;

pub use types::{SentenceItem, SentenceSection, Unit, WordItem, WrongWordEntry};
