// ABOUTME: Service account token persistence module
// ABOUTME: Store trait plus the SQLite implementation

pub mod storage;


pub use storage::{delete_tokens_for_account, SqliteTokenStore, TokenStore};
