use anyhow::Result;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tower_http::services::ServeDir;
use tracing::info;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::metrics::{metrics_handler, record_listen};
use super::state::*;
use super::{import, log_requests, olap, recommendation, RequestsLoggingLevel, ServerConfig};
use crate::music_store::{ListenEvent, MusicStore, Song, User};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
    pub users: usize,
    pub songs: usize,
    pub listens: usize,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> Result<impl IntoResponse, ApiError> {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
        users: state.music_store.get_users_count()?,
        songs: state.music_store.get_songs_count()?,
        listens: state.music_store.get_listens_count()?,
    };
    Ok(Json(stats))
}

async fn health() -> &'static str {
    "OK"
}

async fn post_user(
    State(store): State<GuardedMusicStore>,
    Json(user): Json<User>,
) -> Result<impl IntoResponse, ApiError> {
    store.add_user(&user)?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_users(
    State(store): State<GuardedMusicStore>,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(store.get_all_users()?))
}

async fn get_user(
    State(store): State<GuardedMusicStore>,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    store
        .get_user(id)?
        .map(Json)
        .ok_or(ApiError::EntityNotFound { kind: "user", id })
}

async fn post_song(
    State(store): State<GuardedMusicStore>,
    Json(song): Json<Song>,
) -> Result<impl IntoResponse, ApiError> {
    store.add_song(&song)?;
    Ok((StatusCode::CREATED, Json(song)))
}

async fn get_songs(
    State(store): State<GuardedMusicStore>,
) -> Result<Json<Vec<Song>>, ApiError> {
    Ok(Json(store.get_all_songs()?))
}

async fn get_song(
    State(store): State<GuardedMusicStore>,
    Path(id): Path<i64>,
) -> Result<Json<Song>, ApiError> {
    store
        .get_song(id)?
        .map(Json)
        .ok_or(ApiError::EntityNotFound { kind: "song", id })
}

// Date comes in as a string so a bad value maps to our 400 instead of a
// deserialization rejection.
#[derive(Deserialize, Debug)]
struct ListenBody {
    pub user_id: i64,
    pub date: String,
    pub song_id: i64,
}

#[derive(Serialize)]
struct ListenResponse {
    pub created: bool,
}

async fn post_listen(
    State(store): State<GuardedMusicStore>,
    Json(body): Json<ListenBody>,
) -> Result<impl IntoResponse, ApiError> {
    let date = NaiveDate::parse_from_str(&body.date, "%Y-%m-%d")
        .map_err(|_| ApiError::InvalidDate(body.date.clone()))?;

    let listen = ListenEvent {
        user_id: body.user_id,
        date,
        song_id: body.song_id,
    };
    let created = store.add_listen(&listen)?;
    record_listen(created);

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(ListenResponse { created })))
}

async fn get_user_listens(
    State(store): State<GuardedMusicStore>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ListenEvent>>, ApiError> {
    Ok(Json(store.get_user_listens(id)?))
}

impl ServerState {
    fn new(config: ServerConfig, music_store: GuardedMusicStore, hash: String) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            music_store,
            hash,
        }
    }
}

pub fn make_app(
    config: ServerConfig,
    music_store: GuardedMusicStore,
    hash: String,
) -> Result<Router> {
    let state = ServerState::new(config.clone(), music_store, hash);

    let api_routes: Router = Router::new()
        .route("/users", post(post_user).get(get_users))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/listens", get(get_user_listens))
        .route("/songs", post(post_song).get(get_songs))
        .route("/songs/{id}", get(get_song))
        .route("/listens", post(post_listen))
        .route("/recommendation", get(recommendation::get_recommendation))
        .route("/olap/genre-month", get(olap::genre_month))
        .route("/olap/genre-month-city", get(olap::genre_month_city))
        .route("/import/{kind}", post(import::import_csv))
        .with_state(state.clone());

    let home_router: Router = match config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new()
            .route("/", get(home))
            .with_state(state.clone()),
    };

    let mut app: Router = home_router
        .route("/health", get(health))
        .nest("/v1", api_routes);

    app = app.layer(middleware::from_fn_with_state(state.clone(), log_requests));

    Ok(app)
}

pub async fn run_server(
    music_store: GuardedMusicStore,
    requests_logging_level: RequestsLoggingLevel,
    port: u16,
    metrics_port: u16,
    frontend_dir_path: Option<String>,
    hash: String,
) -> Result<()> {
    let config = ServerConfig {
        port,
        requests_logging_level,
        frontend_dir_path,
    };
    let app = make_app(config, music_store, hash)?;

    // Metrics are served on their own port so they stay off the public
    // surface.
    let metrics_app: Router = Router::new().route("/metrics", get(metrics_handler));
    let metrics_listener =
        tokio::net::TcpListener::bind(format!("127.0.0.1:{}", metrics_port)).await?;
    tokio::spawn(async move {
        if let Err(err) = axum::serve(metrics_listener, metrics_app).await {
            tracing::error!("Metrics server stopped: {}", err);
        }
    });

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    info!("Listening on port {}", port);

    Ok(axum::serve(listener, app).await?)
}
