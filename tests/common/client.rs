//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all musicrec-server endpoints.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde_json::json;
use std::time::Duration;

/// HTTP test client
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    // ========================================================================
    // System Endpoints
    // ========================================================================

    /// GET /
    pub async fn get_home(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Get home request failed")
    }

    /// GET /health
    pub async fn get_health(&self) -> Response {
        self.client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .expect("Get health request failed")
    }

    // ========================================================================
    // Entity Endpoints
    // ========================================================================

    /// POST /v1/users
    pub async fn post_user(&self, id: i64, name: &str, city: &str) -> Response {
        self.client
            .post(format!("{}/v1/users", self.base_url))
            .json(&json!({ "id": id, "name": name, "city": city }))
            .send()
            .await
            .expect("Post user request failed")
    }

    /// GET /v1/users
    pub async fn get_users(&self) -> Response {
        self.client
            .get(format!("{}/v1/users", self.base_url))
            .send()
            .await
            .expect("Get users request failed")
    }

    /// GET /v1/users/{id}
    pub async fn get_user(&self, id: i64) -> Response {
        self.client
            .get(format!("{}/v1/users/{}", self.base_url, id))
            .send()
            .await
            .expect("Get user request failed")
    }

    /// GET /v1/users/{id}/listens
    pub async fn get_user_listens(&self, id: i64) -> Response {
        self.client
            .get(format!("{}/v1/users/{}/listens", self.base_url, id))
            .send()
            .await
            .expect("Get user listens request failed")
    }

    /// POST /v1/songs
    pub async fn post_song(&self, id: i64, title: &str, artist: &str, genre: &str) -> Response {
        self.client
            .post(format!("{}/v1/songs", self.base_url))
            .json(&json!({ "id": id, "title": title, "artist": artist, "genre": genre }))
            .send()
            .await
            .expect("Post song request failed")
    }

    /// GET /v1/songs
    pub async fn get_songs(&self) -> Response {
        self.client
            .get(format!("{}/v1/songs", self.base_url))
            .send()
            .await
            .expect("Get songs request failed")
    }

    /// GET /v1/songs/{id}
    pub async fn get_song(&self, id: i64) -> Response {
        self.client
            .get(format!("{}/v1/songs/{}", self.base_url, id))
            .send()
            .await
            .expect("Get song request failed")
    }

    /// POST /v1/listens
    pub async fn post_listen(&self, user_id: i64, date: &str, song_id: i64) -> Response {
        self.client
            .post(format!("{}/v1/listens", self.base_url))
            .json(&json!({ "user_id": user_id, "date": date, "song_id": song_id }))
            .send()
            .await
            .expect("Post listen request failed")
    }

    // ========================================================================
    // Recommendation and OLAP Endpoints
    // ========================================================================

    /// GET /v1/recommendation?user_id={id}&mode={mode}
    pub async fn get_recommendation(&self, user_id: i64, mode: &str) -> Response {
        self.client
            .get(format!(
                "{}/v1/recommendation?user_id={}&mode={}",
                self.base_url, user_id, mode
            ))
            .send()
            .await
            .expect("Get recommendation request failed")
    }

    /// GET /v1/recommendation?user_id={id} (no mode parameter)
    pub async fn get_recommendation_without_mode(&self, user_id: i64) -> Response {
        self.client
            .get(format!(
                "{}/v1/recommendation?user_id={}",
                self.base_url, user_id
            ))
            .send()
            .await
            .expect("Get recommendation request failed")
    }

    /// GET /v1/olap/genre-month
    pub async fn get_olap_genre_month(&self) -> Response {
        self.client
            .get(format!("{}/v1/olap/genre-month", self.base_url))
            .send()
            .await
            .expect("Get OLAP genre-month request failed")
    }

    /// GET /v1/olap/genre-month-city
    pub async fn get_olap_genre_month_city(&self) -> Response {
        self.client
            .get(format!("{}/v1/olap/genre-month-city", self.base_url))
            .send()
            .await
            .expect("Get OLAP genre-month-city request failed")
    }

    // ========================================================================
    // CSV Import Endpoints
    // ========================================================================

    /// POST /v1/import/{kind} with a multipart CSV file
    pub async fn post_import(&self, kind: &str, csv: &str) -> Response {
        let part = Part::text(csv.to_string())
            .file_name(format!("{}.csv", kind))
            .mime_str("text/csv")
            .expect("Failed to build multipart part");
        let form = Form::new().part("file", part);

        self.client
            .post(format!("{}/v1/import/{}", self.base_url, kind))
            .multipart(form)
            .send()
            .await
            .expect("Post import request failed")
    }
}
