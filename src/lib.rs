//! Music Recommendation Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod analytics;
pub mod config;
pub mod music_store;
pub mod server;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use music_store::{MusicStore, SqliteMusicStore};
pub use server::{run_server, RequestsLoggingLevel};
