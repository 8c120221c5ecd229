// ABOUTME: Fixed sizes of the persisted token columns and default filesystem locations
// ABOUTME: Shared by the codec, the store, and the configuration layer

use std::env;
use std::path::PathBuf;

/// Length of the indexable, non-secret prefix of a plaintext token
pub const TOKEN_KEY_LENGTH: usize = 8;

/// Length of a stored digest string
pub const DIGEST_LENGTH: usize = 128;

/// Shortest plaintext that can carry a prefix and a non-empty secret suffix
pub const MIN_TOKEN_LENGTH: usize = TOKEN_KEY_LENGTH + 1;

/// Longest service account name accepted by the store
pub const MAX_ACCOUNT_NAME_LENGTH: usize = 150;

/// Get the path to the Warden directory (~/.warden)
pub fn warden_dir() -> PathBuf {
    // HOME first so tests can redirect it
    if let Ok(home) = env::var("HOME") {
        return PathBuf::from(home).join(".warden");
    }

    dirs::home_dir()
        .unwrap_or_else(env::temp_dir)
        .join(".warden")
}

/// Get the default database path (~/.warden/warden.db)
pub fn default_database_path() -> PathBuf {
    warden_dir().join("warden.db")
}
