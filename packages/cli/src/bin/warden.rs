// ABOUTME: Entry point for the warden command-line tool
// ABOUTME: Administers service accounts and their API tokens against the local database

use clap::{Parser, Subcommand};
use colored::*;
use std::process;

mod cli;

use cli::accounts::AccountCommands;
use cli::tokens::TokenCommands;
use warden_cli::logging::init_tracing;
use warden_cli::AppContext;

#[derive(Parser)]
#[command(name = "warden")]
#[command(about = "Warden - service account token management")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage service accounts
    #[command(subcommand)]
    Account(AccountCommands),
    /// Issue, list, revoke, and verify tokens
    #[command(subcommand)]
    Token(TokenCommands),
}

#[tokio::main]
async fn main() {
    // Load .env file
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match handle_command(cli.command).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}

async fn handle_command(command: Commands) -> anyhow::Result<i32> {
    let ctx = AppContext::from_env().await?;

    let code = match command {
        Commands::Account(cmd) => cli::accounts::handle_account_command(&ctx, cmd).await?,
        Commands::Token(cmd) => cli::tokens::handle_token_command(&ctx, cmd).await?,
    };

    ctx.pool.close().await;
    Ok(code)
}
