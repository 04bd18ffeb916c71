//! Common test infrastructure
//!
//! This module provides all the infrastructure needed for end-to-end tests.
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestClient, TestServer, USER_ANA_ID};
//! use reqwest::StatusCode;
//!
//! #[tokio::test]
//! async fn test_get_user() {
//!     let server = TestServer::spawn_seeded().await;
//!     let client = TestClient::new(server.base_url.clone());
//!
//!     let response = client.get_user(USER_ANA_ID).await;
//!     assert_eq!(response.status(), StatusCode::OK);
//! }
//! ```

mod client;
mod constants;
mod fixtures;
mod server;

// Public API - this is what tests import
#[allow(unused_imports)]
pub use client::TestClient;
#[allow(unused_imports)]
pub use constants::*;
#[allow(unused_imports)]
pub use fixtures::SEEDED_LISTENS;
#[allow(unused_imports)]
pub use server::TestServer;
