pub mod accounts;
pub mod tokens;
