// ABOUTME: Shared plumbing for the warden command-line tool
// ABOUTME: Application context, logging setup, and table rendering

pub mod context;
pub mod logging;
pub mod output;

pub use context::{AppContext, ContextError};
