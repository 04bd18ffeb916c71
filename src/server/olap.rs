use axum::extract::State;
use axum::Json;
use serde::Serialize;

use super::error::ApiError;
use super::state::GuardedMusicStore;
use crate::analytics::{aggregate, OlapBucket};

#[derive(Serialize, Debug)]
pub struct OlapResponse {
    pub buckets: Vec<OlapBucket>,
}

/// GET /v1/olap/genre-month - listens bucketed by (genre, month)
pub async fn genre_month(
    State(store): State<GuardedMusicStore>,
) -> Result<Json<OlapResponse>, ApiError> {
    let events = store.get_all_listens()?;
    let genres = store.song_genres()?;

    let mut buckets = aggregate(&events, &genres, None);
    sort_buckets(&mut buckets);

    Ok(Json(OlapResponse { buckets }))
}

/// GET /v1/olap/genre-month-city - adds the listener's city dimension
pub async fn genre_month_city(
    State(store): State<GuardedMusicStore>,
) -> Result<Json<OlapResponse>, ApiError> {
    let events = store.get_all_listens()?;
    let genres = store.song_genres()?;
    let cities = store.user_cities()?;

    let mut buckets = aggregate(&events, &genres, Some(&cities));
    sort_buckets(&mut buckets);

    Ok(Json(OlapResponse { buckets }))
}

// Presentation order only; counts are not affected.
fn sort_buckets(buckets: &mut [OlapBucket]) {
    buckets.sort_by(|a, b| {
        a.month
            .cmp(&b.month)
            .then_with(|| a.genre.cmp(&b.genre))
            .then_with(|| a.city.cmp(&b.city))
    });
}
