//! SQLite schema definitions for the music database.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table, VersionedSchema};

const USERS_TABLE_V1: Table = Table {
    name: "users",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("city", &SqlType::Text, non_null = true),
    ],
    indices: &[("idx_users_city", "city")],
    unique_constraints: &[],
};

const SONGS_TABLE_V1: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("artist", &SqlType::Text, non_null = true),
        sqlite_column!("genre", &SqlType::Text, non_null = true),
    ],
    indices: &[("idx_songs_genre", "genre")],
    unique_constraints: &[],
};

/// Listen events. No foreign keys on purpose: a listen may reference a
/// user or song that was never registered, and the read paths substitute
/// a sentinel instead of rejecting the row.
const LISTENS_TABLE_V1: Table = Table {
    name: "listens",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true), // AUTOINCREMENT
        sqlite_column!("user_id", &SqlType::Integer, non_null = true),
        sqlite_column!("listen_date", &SqlType::Text, non_null = true), // YYYY-MM-DD
        sqlite_column!("song_id", &SqlType::Integer, non_null = true),
    ],
    indices: &[
        ("idx_listens_user_id", "user_id"),
        ("idx_listens_song_id", "song_id"),
    ],
    unique_constraints: &[&["user_id", "listen_date", "song_id"]],
};

/// All versioned schemas for the music database.
///
/// Version 1: users, songs and listens tables
pub const MUSIC_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 1,
    tables: &[USERS_TABLE_V1, SONGS_TABLE_V1, LISTENS_TABLE_V1],
    migration: None,
}];
