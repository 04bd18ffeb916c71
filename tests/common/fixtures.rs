//! Seeded test data
//!
//! This module creates a small but deliberately shaped dataset:
//!
//! - Bogota (Ana, Luis) listens mostly to Rock, with "Neon Nights" the
//!   clear city favorite and a tail of single-listen songs.
//! - Lima (Marta, Jorge) listens mostly to Jazz, so Marta's favorite
//!   genre resolves to Jazz and "Blue Horizon" tops the genre ranking.
//! - Elena (Cusco) exists but has no listens at all.
//!
//! Listens are inserted in a fixed order; ranking ties resolve to the
//! earlier-inserted song, and tests rely on that.

use super::constants::*;
use chrono::NaiveDate;
use musicrec_server::music_store::{ListenEvent, MusicStore, Song, User};

fn user(id: i64, name: &str, city: &str) -> User {
    User {
        id,
        name: name.to_string(),
        city: city.to_string(),
    }
}

fn song(id: i64, title: &str, artist: &str, genre: &str) -> Song {
    Song {
        id,
        title: title.to_string(),
        artist: artist.to_string(),
        genre: genre.to_string(),
    }
}

fn listen(user_id: i64, date: &str, song_id: i64) -> ListenEvent {
    ListenEvent {
        user_id,
        date: date.parse::<NaiveDate>().expect("fixture date"),
        song_id,
    }
}

/// Inserts the full fixture dataset into an (empty) store.
pub fn seed_store(store: &dyn MusicStore) -> anyhow::Result<()> {
    let users = [
        user(USER_ANA_ID, "Ana", CITY_BOGOTA),
        user(USER_LUIS_ID, "Luis", CITY_BOGOTA),
        user(USER_MARTA_ID, "Marta", CITY_LIMA),
        user(USER_JORGE_ID, "Jorge", CITY_LIMA),
        user(USER_ELENA_ID, "Elena", CITY_CUSCO),
    ];
    for u in &users {
        store.add_user(u)?;
    }

    let songs = [
        song(SONG_NEON_NIGHTS_ID, "Neon Nights", "The Test Band", GENRE_ROCK),
        song(SONG_MIDNIGHT_RUN_ID, "Midnight Run", "The Test Band", GENRE_ROCK),
        song(SONG_BLUE_HORIZON_ID, "Blue Horizon", "Jazz Ensemble", GENRE_JAZZ),
        song(SONG_SMOOTH_LANDING_ID, "Smooth Landing", "Jazz Ensemble", GENRE_JAZZ),
        song(SONG_CUMBIA_DEL_RIO_ID, "Cumbia del Rio", "Los Andes", GENRE_CUMBIA),
        song(SONG_ALTURAS_ID, "Alturas", "Los Andes", GENRE_FOLK),
    ];
    for s in &songs {
        store.add_song(s)?;
    }

    // Bogota, all in January:
    //   Neon Nights x3, then one listen each for five other songs.
    let listens = [
        listen(USER_ANA_ID, "2024-01-05", SONG_NEON_NIGHTS_ID),
        listen(USER_ANA_ID, "2024-01-06", SONG_NEON_NIGHTS_ID),
        listen(USER_LUIS_ID, "2024-01-07", SONG_NEON_NIGHTS_ID),
        listen(USER_LUIS_ID, "2024-01-08", SONG_MIDNIGHT_RUN_ID),
        listen(USER_ANA_ID, "2024-01-09", SONG_BLUE_HORIZON_ID),
        listen(USER_LUIS_ID, "2024-01-10", SONG_CUMBIA_DEL_RIO_ID),
        listen(USER_ANA_ID, "2024-01-11", SONG_ALTURAS_ID),
        listen(USER_LUIS_ID, "2024-01-12", SONG_SMOOTH_LANDING_ID),
        // Lima: Marta's history makes Jazz her favorite genre.
        listen(USER_MARTA_ID, "2024-01-05", SONG_BLUE_HORIZON_ID),
        listen(USER_MARTA_ID, "2024-02-06", SONG_SMOOTH_LANDING_ID),
        listen(USER_MARTA_ID, "2024-02-07", SONG_BLUE_HORIZON_ID),
        listen(USER_MARTA_ID, "2024-02-08", SONG_CUMBIA_DEL_RIO_ID),
        listen(USER_JORGE_ID, "2024-02-09", SONG_BLUE_HORIZON_ID),
    ];
    for l in &listens {
        store.add_listen(l)?;
    }

    Ok(())
}

/// Number of listens inserted by [`seed_store`].
pub const SEEDED_LISTENS: usize = 13;
