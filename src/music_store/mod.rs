mod models;
mod schema;
mod sqlite_music_store;

use anyhow::Result;
use std::collections::HashMap;

pub use models::{ListenEvent, Song, User};
pub use sqlite_music_store::SqliteMusicStore;

/// Storage for users, songs and listen events. Users and songs are
/// keyed by caller-assigned ids and re-inserting an id overwrites the
/// row; listens are append-only and idempotent on the
/// (user, date, song) triple.
pub trait MusicStore: Send + Sync {
    fn add_user(&self, user: &User) -> Result<()>;
    fn get_user(&self, id: i64) -> Result<Option<User>>;
    fn get_all_users(&self) -> Result<Vec<User>>;
    fn get_users_count(&self) -> Result<usize>;

    fn add_song(&self, song: &Song) -> Result<()>;
    fn get_song(&self, id: i64) -> Result<Option<Song>>;
    fn get_all_songs(&self) -> Result<Vec<Song>>;
    fn get_songs_count(&self) -> Result<usize>;

    /// Records a listen. Returns false when the exact same event was
    /// already recorded, in which case nothing changes.
    fn add_listen(&self, listen: &ListenEvent) -> Result<bool>;
    fn get_user_listens(&self, user_id: i64) -> Result<Vec<ListenEvent>>;
    fn get_all_listens(&self) -> Result<Vec<ListenEvent>>;
    fn get_listens_count(&self) -> Result<usize>;

    /// song id -> genre, for every registered song.
    fn song_genres(&self) -> Result<HashMap<i64, String>>;

    /// user id -> city, for every registered user.
    fn user_cities(&self) -> Result<HashMap<i64, String>>;
}
