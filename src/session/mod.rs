// ABOUTME: Session module — bearer token lifecycle and its durable storage.
// ABOUTME: The store is injected with a storage backend so it can run without a real disk.

pub mod storage;
pub mod store;

pub use storage::{FileTokenStorage, MemoryTokenStorage, TokenStorage};
pub use store::SessionStore;
