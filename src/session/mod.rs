/// Session management module - Gateway

mod store;

pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
