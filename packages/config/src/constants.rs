// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across Warden

// Database Configuration
pub const WARDEN_DATABASE_PATH: &str = "WARDEN_DATABASE_PATH";
pub const WARDEN_MAX_CONNECTIONS: &str = "WARDEN_MAX_CONNECTIONS";
pub const WARDEN_BUSY_TIMEOUT_SECS: &str = "WARDEN_BUSY_TIMEOUT_SECS";

// Digest Cost (Argon2id)
pub const WARDEN_HASH_MEMORY_KIB: &str = "WARDEN_HASH_MEMORY_KIB";
pub const WARDEN_HASH_ITERATIONS: &str = "WARDEN_HASH_ITERATIONS";
pub const WARDEN_HASH_PARALLELISM: &str = "WARDEN_HASH_PARALLELISM";

// Issuance
pub const WARDEN_ISSUE_MAX_ATTEMPTS: &str = "WARDEN_ISSUE_MAX_ATTEMPTS";

// CLI
pub const WARDEN_TOKEN: &str = "WARDEN_TOKEN";

// Logging
pub const RUST_LOG: &str = "RUST_LOG";
