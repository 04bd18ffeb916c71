//! Shared constants for end-to-end tests
//!
//! This module contains all constants used across the test suite.
//! When the seeded fixture data changes, update only this file.

// ============================================================================
// Seeded Users
// ============================================================================

/// Ana, lives in Bogota
pub const USER_ANA_ID: i64 = 1;

/// Luis, lives in Bogota
pub const USER_LUIS_ID: i64 = 2;

/// Marta, lives in Lima
pub const USER_MARTA_ID: i64 = 3;

/// Jorge, lives in Lima
pub const USER_JORGE_ID: i64 = 4;

/// Elena, lives in Cusco; has no listen history
pub const USER_ELENA_ID: i64 = 5;

pub const CITY_BOGOTA: &str = "Bogota";
pub const CITY_LIMA: &str = "Lima";
pub const CITY_CUSCO: &str = "Cusco";

// ============================================================================
// Seeded Songs
// ============================================================================

/// "Neon Nights" (Rock) - the most listened song in Bogota
pub const SONG_NEON_NIGHTS_ID: i64 = 10;

/// "Midnight Run" (Rock)
pub const SONG_MIDNIGHT_RUN_ID: i64 = 11;

/// "Blue Horizon" (Jazz) - the most listened Jazz song overall
pub const SONG_BLUE_HORIZON_ID: i64 = 12;

/// "Smooth Landing" (Jazz)
pub const SONG_SMOOTH_LANDING_ID: i64 = 13;

/// "Cumbia del Rio" (Cumbia)
pub const SONG_CUMBIA_DEL_RIO_ID: i64 = 14;

/// "Alturas" (Folk)
pub const SONG_ALTURAS_ID: i64 = 15;

pub const GENRE_ROCK: &str = "Rock";
pub const GENRE_JAZZ: &str = "Jazz";
pub const GENRE_CUMBIA: &str = "Cumbia";
pub const GENRE_FOLK: &str = "Folk";

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
