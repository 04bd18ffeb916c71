use axum::extract::FromRef;

use crate::music_store::MusicStore;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedMusicStore = Arc<dyn MusicStore>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub music_store: GuardedMusicStore,
    pub hash: String,
}

impl FromRef<ServerState> for GuardedMusicStore {
    fn from_ref(input: &ServerState) -> Self {
        input.music_store.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
