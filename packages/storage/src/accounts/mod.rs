// ABOUTME: Service account management module
// ABOUTME: Minimal owner records whose deletion cascades to their tokens

pub mod storage;

pub use storage::ServiceAccountStorage;
