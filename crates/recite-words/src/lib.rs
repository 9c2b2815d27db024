mod store;

pub use store::WrongWordStore;
