use super::models::{ListenEvent, Song, User};
use super::schema::MUSIC_VERSIONED_SCHEMAS;
use super::MusicStore;
use crate::sqlite_persistence::BASE_DB_VERSION;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqliteMusicStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteMusicStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let path = db_path.as_ref();
        let is_new_db = !path.exists();

        let mut conn = Connection::open(path).context("Failed to open music database")?;

        if is_new_db {
            info!("Creating new music database at {:?}", path);
            MUSIC_VERSIONED_SCHEMAS.last().unwrap().create(&conn)?;
        } else {
            let raw_version: i64 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
            let db_version = raw_version - BASE_DB_VERSION as i64;

            if db_version < 1 {
                anyhow::bail!(
                    "Music database version {} is invalid (expected >= 1)",
                    db_version
                );
            }

            let current_schema_version = MUSIC_VERSIONED_SCHEMAS.last().unwrap().version as i64;

            let version_index = MUSIC_VERSIONED_SCHEMAS
                .iter()
                .position(|s| s.version == db_version as usize)
                .with_context(|| format!("Unknown music database version {}", db_version))?;
            MUSIC_VERSIONED_SCHEMAS[version_index]
                .validate(&conn)
                .with_context(|| {
                    format!(
                        "Music database schema validation failed for version {}",
                        db_version
                    )
                })?;

            if db_version < current_schema_version {
                info!(
                    "Migrating music database from version {} to {}",
                    db_version, current_schema_version
                );
                Self::migrate_if_needed(&mut conn, db_version as usize)?;
            }
        }

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn migrate_if_needed(conn: &mut Connection, from_version: usize) -> Result<()> {
        let tx = conn.transaction()?;
        let mut latest_from = from_version;
        for schema in MUSIC_VERSIONED_SCHEMAS.iter().skip(from_version) {
            if schema.version > from_version {
                info!(
                    "Running music database migration from version {} to {}",
                    latest_from, schema.version
                );
                if let Some(migration_fn) = schema.migration {
                    migration_fn(&tx).with_context(|| {
                        format!("Failed to run migration to version {}", schema.version)
                    })?;
                }
                latest_from = schema.version;
            }
        }
        tx.execute(
            &format!("PRAGMA user_version = {}", BASE_DB_VERSION + latest_from),
            [],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get("id")?,
            name: row.get("name")?,
            city: row.get("city")?,
        })
    }

    fn row_to_song(row: &rusqlite::Row) -> rusqlite::Result<Song> {
        Ok(Song {
            id: row.get("id")?,
            title: row.get("title")?,
            artist: row.get("artist")?,
            genre: row.get("genre")?,
        })
    }

    fn row_to_listen(row: &rusqlite::Row) -> rusqlite::Result<ListenEvent> {
        let date_str: String = row.get("listen_date")?;
        let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                1,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?;

        Ok(ListenEvent {
            user_id: row.get("user_id")?,
            date,
            song_id: row.get("song_id")?,
        })
    }

    fn count_rows(conn: &Connection, table: &str) -> Result<usize> {
        let count: i64 =
            conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })?;
        Ok(count as usize)
    }
}

impl MusicStore for SqliteMusicStore {
    fn add_user(&self, user: &User) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO users (id, name, city) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET name = ?2, city = ?3",
            params![user.id, user.name, user.city],
        )?;
        Ok(())
    }

    fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT id, name, city FROM users WHERE id = ?1")?;
        let user = stmt.query_row(params![id], Self::row_to_user).optional()?;
        Ok(user)
    }

    fn get_all_users(&self) -> Result<Vec<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT id, name, city FROM users ORDER BY id")?;
        let users = stmt
            .query_map([], Self::row_to_user)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    fn get_users_count(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        Self::count_rows(&conn, "users")
    }

    fn add_song(&self, song: &Song) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO songs (id, title, artist, genre) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET title = ?2, artist = ?3, genre = ?4",
            params![song.id, song.title, song.artist, song.genre],
        )?;
        Ok(())
    }

    fn get_song(&self, id: i64) -> Result<Option<Song>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT id, title, artist, genre FROM songs WHERE id = ?1")?;
        let song = stmt.query_row(params![id], Self::row_to_song).optional()?;
        Ok(song)
    }

    fn get_all_songs(&self) -> Result<Vec<Song>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT id, title, artist, genre FROM songs ORDER BY id")?;
        let songs = stmt
            .query_map([], Self::row_to_song)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(songs)
    }

    fn get_songs_count(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        Self::count_rows(&conn, "songs")
    }

    fn add_listen(&self, listen: &ListenEvent) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO listens (user_id, listen_date, song_id) VALUES (?1, ?2, ?3)",
            params![
                listen.user_id,
                listen.date.format(DATE_FORMAT).to_string(),
                listen.song_id
            ],
        )?;
        Ok(inserted > 0)
    }

    fn get_user_listens(&self, user_id: i64) -> Result<Vec<ListenEvent>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT user_id, listen_date, song_id FROM listens WHERE user_id = ?1 ORDER BY id",
        )?;
        let listens = stmt
            .query_map(params![user_id], Self::row_to_listen)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(listens)
    }

    fn get_all_listens(&self) -> Result<Vec<ListenEvent>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT user_id, listen_date, song_id FROM listens ORDER BY id")?;
        let listens = stmt
            .query_map([], Self::row_to_listen)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(listens)
    }

    fn get_listens_count(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        Self::count_rows(&conn, "listens")
    }

    fn song_genres(&self) -> Result<HashMap<i64, String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT id, genre FROM songs")?;
        let genres = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<HashMap<_, _>>>()?;
        Ok(genres)
    }

    fn user_cities(&self) -> Result<HashMap<i64, String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT id, city FROM users")?;
        let cities = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<HashMap<_, _>>>()?;
        Ok(cities)
    }
}
