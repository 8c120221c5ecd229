// ABOUTME: CLI commands for service account tokens
// ABOUTME: Issued plaintext is printed exactly once; verification failures stay generic

use clap::Subcommand;
use colored::*;

use warden_cli::output::tokens_table;
use warden_cli::AppContext;
use warden_config::constants::WARDEN_TOKEN;
use warden_core::{ServiceAccountId, TokenId};
use warden_security::AuthError;

#[derive(Subcommand)]
pub enum TokenCommands {
    /// Issue a new token for a service account
    Issue {
        /// Service account ID
        account_id: ServiceAccountId,
        /// Print only the plaintext token
        #[arg(short, long)]
        quiet: bool,
    },
    /// List tokens owned by a service account
    List {
        /// Service account ID
        account_id: ServiceAccountId,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Revoke a token
    Revoke {
        /// Token ID
        token_id: TokenId,
    },
    /// Check whether a token authenticates
    Verify {
        /// Token to verify
        #[arg(long, env = WARDEN_TOKEN, hide_env_values = true)]
        token: String,
    },
}

pub async fn handle_token_command(ctx: &AppContext, command: TokenCommands) -> anyhow::Result<i32> {
    match command {
        TokenCommands::Issue { account_id, quiet } => issue_token(ctx, account_id, quiet).await,
        TokenCommands::List { account_id, json } => list_tokens(ctx, account_id, json).await,
        TokenCommands::Revoke { token_id } => revoke_token(ctx, token_id).await,
        TokenCommands::Verify { token } => verify_token(ctx, token.trim()).await,
    }
}

async fn issue_token(
    ctx: &AppContext,
    account_id: ServiceAccountId,
    quiet: bool,
) -> anyhow::Result<i32> {
    let issued = ctx.tokens.issue(account_id).await?;

    if quiet {
        println!("{}", issued.plaintext);
        return Ok(0);
    }

    println!("{} Issued token {}", "✓".green().bold(), issued.id().to_string().cyan());
    println!();
    println!("  {}", issued.plaintext.bold());
    println!();
    println!("{}", "⚠ Store this token now. It cannot be shown again.".yellow().bold());
    Ok(0)
}

async fn list_tokens(
    ctx: &AppContext,
    account_id: ServiceAccountId,
    json: bool,
) -> anyhow::Result<i32> {
    if !ctx.accounts.exists(account_id).await? {
        eprintln!("{} Service account {} not found", "✗".red().bold(), account_id);
        return Ok(1);
    }

    let tokens = ctx.tokens.list_tokens(account_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
        return Ok(0);
    }

    if tokens.is_empty() {
        println!("{}", "No tokens issued for this account".yellow());
        return Ok(0);
    }

    println!("{}", tokens_table(&tokens));
    let active = tokens.iter().filter(|t| !t.is_revoked()).count();
    println!(
        "Total: {} tokens ({} active)",
        tokens.len().to_string().cyan(),
        active.to_string().green()
    );
    Ok(0)
}

async fn revoke_token(ctx: &AppContext, token_id: TokenId) -> anyhow::Result<i32> {
    ctx.tokens.revoke(token_id).await?;
    println!("{} Token {} revoked", "✓".green().bold(), token_id);
    Ok(0)
}

async fn verify_token(ctx: &AppContext, token: &str) -> anyhow::Result<i32> {
    match ctx.tokens.authenticate(token).await {
        Ok(authenticated) => {
            println!(
                "{} Token {} belongs to service account {}",
                "✓".green().bold(),
                authenticated.token_id,
                authenticated.service_account_id
            );
            Ok(0)
        }
        Err(e @ AuthError::Rejected(_)) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            Ok(1)
        }
        Err(e) => Err(e.into()),
    }
}
