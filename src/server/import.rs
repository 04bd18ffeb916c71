//! CSV bulk import for users, songs and listens.
//!
//! Files are plain comma-separated with a header row naming the entity
//! fields (any column order); no quoting or escaping is supported.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use super::error::ApiError;
use super::metrics::record_imported_rows;
use super::state::GuardedMusicStore;
use crate::music_store::{ListenEvent, Song, User};

#[derive(Serialize, Debug)]
pub struct ImportResponse {
    pub imported: usize,
}

pub async fn import_csv(
    State(store): State<GuardedMusicStore>,
    Path(kind): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, ApiError> {
    let mut data: Option<Vec<u8>> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let bytes = field
            .bytes()
            .await
            .map_err(|_| ApiError::MalformedCsv {
                line: 0,
                reason: "failed to read uploaded file".to_string(),
            })?;
        data = Some(bytes.to_vec());
    }

    let data = data.ok_or(ApiError::MalformedCsv {
        line: 0,
        reason: "no file in upload".to_string(),
    })?;
    let text = String::from_utf8(data).map_err(|_| ApiError::MalformedCsv {
        line: 0,
        reason: "file is not valid UTF-8".to_string(),
    })?;

    let imported = match kind.as_str() {
        "users" => import_users(&store, &text)?,
        "songs" => import_songs(&store, &text)?,
        "listens" => import_listens(&store, &text)?,
        other => {
            return Err(ApiError::InvalidIdentifier(format!(
                "unknown import kind '{}'",
                other
            )))
        }
    };

    info!("Imported {} {} from CSV upload", imported, kind);
    record_imported_rows(&kind, imported);
    Ok(Json(ImportResponse { imported }))
}

/// Maps header names to column positions. Every expected field must be
/// present; extra columns are ignored.
fn header_positions(text: &str, expected: &[&str]) -> Result<Vec<usize>, ApiError> {
    let header = text.lines().next().ok_or(ApiError::MalformedCsv {
        line: 1,
        reason: "missing header row".to_string(),
    })?;
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();

    expected
        .iter()
        .map(|field| {
            columns
                .iter()
                .position(|c| c == field)
                .ok_or_else(|| ApiError::MalformedCsv {
                    line: 1,
                    reason: format!("missing column '{}'", field),
                })
        })
        .collect()
}

/// Splits data rows, pairing each with its 1-based line number. Blank
/// lines are skipped.
fn data_rows(text: &str) -> impl Iterator<Item = (usize, Vec<&str>)> {
    text.lines()
        .enumerate()
        .skip(1)
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| (i + 1, line.split(',').map(str::trim).collect()))
}

fn field<'a>(row: &[&'a str], position: usize, line: usize) -> Result<&'a str, ApiError> {
    row.get(position).copied().ok_or(ApiError::MalformedCsv {
        line,
        reason: "row has too few columns".to_string(),
    })
}

fn parse_id(value: &str, line: usize) -> Result<i64, ApiError> {
    value.parse().map_err(|_| ApiError::MalformedCsv {
        line,
        reason: format!("'{}' is not a numeric id", value),
    })
}

fn import_users(store: &GuardedMusicStore, text: &str) -> Result<usize, ApiError> {
    let positions = header_positions(text, &["id", "name", "city"])?;
    let mut imported = 0;
    for (line, row) in data_rows(text) {
        let user = User {
            id: parse_id(field(&row, positions[0], line)?, line)?,
            name: field(&row, positions[1], line)?.to_string(),
            city: field(&row, positions[2], line)?.to_string(),
        };
        store.add_user(&user)?;
        imported += 1;
    }
    Ok(imported)
}

fn import_songs(store: &GuardedMusicStore, text: &str) -> Result<usize, ApiError> {
    let positions = header_positions(text, &["id", "title", "artist", "genre"])?;
    let mut imported = 0;
    for (line, row) in data_rows(text) {
        let song = Song {
            id: parse_id(field(&row, positions[0], line)?, line)?,
            title: field(&row, positions[1], line)?.to_string(),
            artist: field(&row, positions[2], line)?.to_string(),
            genre: field(&row, positions[3], line)?.to_string(),
        };
        store.add_song(&song)?;
        imported += 1;
    }
    Ok(imported)
}

fn import_listens(store: &GuardedMusicStore, text: &str) -> Result<usize, ApiError> {
    let positions = header_positions(text, &["user_id", "date", "song_id"])?;
    let mut imported = 0;
    for (line, row) in data_rows(text) {
        let date_str = field(&row, positions[1], line)?;
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| {
            ApiError::MalformedCsv {
                line,
                reason: format!("'{}' is not a YYYY-MM-DD date", date_str),
            }
        })?;
        let listen = ListenEvent {
            user_id: parse_id(field(&row, positions[0], line)?, line)?,
            date,
            song_id: parse_id(field(&row, positions[2], line)?, line)?,
        };
        store.add_listen(&listen)?;
        imported += 1;
    }
    Ok(imported)
}
