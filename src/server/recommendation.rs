use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::error::ApiError;
use super::metrics::record_recommendation;
use super::state::GuardedMusicStore;
use crate::analytics::{count_listens, favorite_genre, EligibleUsers};
use crate::music_store::ListenEvent;

/// How many songs a recommendation response carries at most.
const TOP_SONGS: usize = 5;

#[derive(Deserialize, Debug)]
pub struct RecommendationQuery {
    pub user_id: i64,
    /// Absent means "city".
    pub mode: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct RecommendedSong {
    pub song_id: i64,
    pub title: String,
    pub artist: String,
    pub genre: String,
    pub listen_count: u64,
}

#[derive(Serialize, Debug)]
pub struct RecommendationResponse {
    pub recommendations: Vec<RecommendedSong>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite_genre: Option<String>,
}

pub async fn get_recommendation(
    State(store): State<GuardedMusicStore>,
    Query(query): Query<RecommendationQuery>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    let mode = query.mode.as_deref().unwrap_or("city");
    let response = match mode {
        "city" => recommend_by_city(&store, query.user_id)?,
        "genre" => recommend_by_genre(&store, query.user_id)?,
        other => return Err(ApiError::InvalidMode(other.to_string())),
    };
    record_recommendation(mode);
    Ok(Json(response))
}

/// Ranks the songs most listened to by users living in the requesting
/// user's city.
fn recommend_by_city(
    store: &GuardedMusicStore,
    user_id: i64,
) -> Result<RecommendationResponse, ApiError> {
    let user = store
        .get_user(user_id)?
        .ok_or(ApiError::EntityNotFound {
            kind: "user",
            id: user_id,
        })?;

    let cities = store.user_cities()?;
    let neighbors: HashSet<i64> = cities
        .iter()
        .filter(|(_, city)| **city == user.city)
        .map(|(id, _)| *id)
        .collect();

    let events = store.get_all_listens()?;
    let counts = count_listens(&events, &EligibleUsers::Only(&neighbors));

    Ok(RecommendationResponse {
        recommendations: resolve_songs(store, counts.top_n(TOP_SONGS))?,
        favorite_genre: None,
    })
}

/// Resolves the user's favorite genre from their own history, then ranks
/// that genre's songs by every user's listens.
fn recommend_by_genre(
    store: &GuardedMusicStore,
    user_id: i64,
) -> Result<RecommendationResponse, ApiError> {
    store
        .get_user(user_id)?
        .ok_or(ApiError::EntityNotFound {
            kind: "user",
            id: user_id,
        })?;

    let user_listens = store.get_user_listens(user_id)?;
    if user_listens.is_empty() {
        return Err(ApiError::NoListenHistory(user_id));
    }

    let genres = store.song_genres()?;
    let favorite = favorite_genre(&user_listens, &genres)
        .ok_or(ApiError::UndeterminedFavoriteGenre(user_id))?;

    let genre_events: Vec<ListenEvent> = store
        .get_all_listens()?
        .into_iter()
        .filter(|event| genres.get(&event.song_id) == Some(&favorite))
        .collect();
    let counts = count_listens(&genre_events, &EligibleUsers::All);

    Ok(RecommendationResponse {
        recommendations: resolve_songs(store, counts.top_n(TOP_SONGS))?,
        favorite_genre: Some(favorite),
    })
}

/// Joins ranked (song id, count) pairs against the songs table. Entries
/// whose song was never registered are dropped from the response.
fn resolve_songs(
    store: &GuardedMusicStore,
    ranked: Vec<(i64, u64)>,
) -> Result<Vec<RecommendedSong>, ApiError> {
    let mut songs = Vec::with_capacity(ranked.len());
    for (song_id, listen_count) in ranked {
        if let Some(song) = store.get_song(song_id)? {
            songs.push(RecommendedSong {
                song_id: song.id,
                title: song.title,
                artist: song.artist,
                genre: song.genre,
                listen_count,
            });
        }
    }
    Ok(songs)
}
